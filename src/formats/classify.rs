//! Partitions a stream catalog into presentation-friendly quality lists.

use std::collections::HashSet;

use serde::Serialize;

use super::{DEFAULT_AUDIO_BITRATE, MIN_VIDEO_HEIGHT};
use crate::extract::StreamFormat;
use crate::humanize::ByteSize;

/// One selectable video quality, deduplicated by resolution label.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOption {
    /// Resolution label, e.g. `"720p"`.
    pub quality: String,
    /// Handle of the backing stream descriptor.
    pub itag: String,
    /// True when the stream already carries audio and needs no merge.
    pub combined_with_audio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// One selectable audio quality, deduplicated by bitrate label.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioOption {
    /// Bitrate label, e.g. `"128kbps"`.
    pub quality: String,
    pub itag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

fn human_size(format: &StreamFormat) -> Option<String> {
    format.approx_size.map(|s| ByteSize(s).to_human_readable())
}

/// Builds the ordered video and audio quality lists for one video.
///
/// Combined mp4 streams are surfaced before video-only streams at equal
/// resolution (they need no merge downstream); deduplication is by quality
/// label across both passes, first descriptor wins. An empty catalog yields
/// two empty lists.
pub fn classify(formats: &[StreamFormat]) -> (Vec<VideoOption>, Vec<AudioOption>) {
    let mut seen = HashSet::new();
    let mut video: Vec<(u32, VideoOption)> = Vec::new();

    let mut combined: Vec<&StreamFormat> = formats
        .iter()
        .filter(|f| f.has_video && f.has_audio && f.container == "mp4")
        .collect();
    combined.sort_by(|a, b| b.height.cmp(&a.height));

    for format in combined {
        push_video_option(format, true, &mut seen, &mut video);
    }

    let mut video_only: Vec<&StreamFormat> = formats
        .iter()
        .filter(|f| f.has_video && !f.has_audio)
        .collect();
    video_only.sort_by(|a, b| b.height.cmp(&a.height));

    for format in video_only {
        push_video_option(format, false, &mut seen, &mut video);
    }

    // Authoritative ordering; the stable sort keeps combined entries ahead of
    // video-only entries at equal height.
    video.sort_by(|a, b| b.0.cmp(&a.0));

    let mut seen_audio = HashSet::new();
    let mut audio: Vec<(u32, AudioOption)> = Vec::new();

    let mut audio_only: Vec<&StreamFormat> = formats
        .iter()
        .filter(|f| f.has_audio && !f.has_video)
        .collect();
    audio_only.sort_by_key(|f| {
        std::cmp::Reverse(f.audio_bitrate.unwrap_or(DEFAULT_AUDIO_BITRATE))
    });

    for format in audio_only {
        let bitrate = format.audio_bitrate.unwrap_or(DEFAULT_AUDIO_BITRATE);
        let quality = format!("{bitrate}kbps");
        if seen_audio.insert(quality.clone()) {
            audio.push((
                bitrate,
                AudioOption {
                    quality,
                    itag: format.id.clone(),
                    size: human_size(format),
                },
            ));
        }
    }

    audio.sort_by(|a, b| b.0.cmp(&a.0));

    (
        video.into_iter().map(|(_, option)| option).collect(),
        audio.into_iter().map(|(_, option)| option).collect(),
    )
}

fn push_video_option(
    format: &StreamFormat,
    combined_with_audio: bool,
    seen: &mut HashSet<String>,
    out: &mut Vec<(u32, VideoOption)>,
) {
    let Some(height) = format.height else {
        return;
    };
    if height < MIN_VIDEO_HEIGHT {
        return;
    }

    let quality = format!("{height}p");
    if seen.insert(quality.clone()) {
        out.push((
            height,
            VideoOption {
                quality,
                itag: format.id.clone(),
                combined_with_audio,
                size: human_size(format),
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combined(id: &str, height: u32) -> StreamFormat {
        StreamFormat {
            id: id.to_string(),
            has_video: true,
            has_audio: true,
            container: "mp4".to_string(),
            height: Some(height),
            audio_bitrate: Some(96),
            approx_size: Some(10 * 1024 * 1024),
            url: format!("https://example.com/{id}"),
        }
    }

    fn video_only(id: &str, height: u32) -> StreamFormat {
        StreamFormat {
            id: id.to_string(),
            has_video: true,
            has_audio: false,
            container: "webm".to_string(),
            height: Some(height),
            audio_bitrate: None,
            approx_size: None,
            url: format!("https://example.com/{id}"),
        }
    }

    fn audio_only(id: &str, bitrate: Option<u32>) -> StreamFormat {
        StreamFormat {
            id: id.to_string(),
            has_video: false,
            has_audio: true,
            container: "webm".to_string(),
            height: None,
            audio_bitrate: bitrate,
            approx_size: Some(3 * 1024 * 1024),
            url: format!("https://example.com/{id}"),
        }
    }

    #[test]
    fn empty_catalog_yields_empty_lists() {
        let (video, audio) = classify(&[]);
        assert!(video.is_empty());
        assert!(audio.is_empty());
    }

    #[test]
    fn combined_streams_win_over_video_only_at_equal_height() {
        let formats = vec![video_only("vo720", 720), combined("c720", 720)];
        let (video, _) = classify(&formats);

        assert_eq!(video.len(), 1);
        assert_eq!(video[0].itag, "c720");
        assert!(video[0].combined_with_audio);
    }

    #[test]
    fn video_list_is_deduplicated_and_sorted_descending() {
        let formats = vec![
            video_only("vo1080", 1080),
            combined("c360", 360),
            combined("c720", 720),
            combined("c720dup", 720),
            video_only("vo720", 720),
            video_only("vo144", 144),
        ];
        let (video, _) = classify(&formats);

        let labels: Vec<&str> = video.iter().map(|v| v.quality.as_str()).collect();
        assert_eq!(labels, ["1080p", "720p", "360p", "144p"]);

        // First descriptor under the traversal order wins the label.
        assert_eq!(video[1].itag, "c720");

        let heights: Vec<u32> = labels
            .iter()
            .map(|l| l.trim_end_matches('p').parse().unwrap())
            .collect();
        assert!(heights.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn sub_144p_streams_are_filtered() {
        let formats = vec![combined("c90", 90), video_only("vo48", 48)];
        let (video, _) = classify(&formats);
        assert!(video.is_empty());
    }

    #[test]
    fn non_mp4_combined_streams_do_not_enter_the_combined_pass() {
        let mut f = combined("c720webm", 720);
        f.container = "webm".to_string();
        let (video, _) = classify(&[f]);
        assert!(video.is_empty());
    }

    #[test]
    fn audio_list_sorted_by_bitrate_with_default_for_missing() {
        let formats = vec![
            audio_only("a64", Some(64)),
            audio_only("amissing", None),
            audio_only("a160", Some(160)),
            audio_only("a160dup", Some(160)),
        ];
        let (_, audio) = classify(&formats);

        let labels: Vec<&str> = audio.iter().map(|a| a.quality.as_str()).collect();
        assert_eq!(labels, ["160kbps", "128kbps", "64kbps"]);
        assert_eq!(audio[0].itag, "a160");
        assert_eq!(audio[1].itag, "amissing");
    }

    #[test]
    fn sizes_are_humanized_when_present() {
        let (video, audio) = classify(&[combined("c720", 720), audio_only("a128", Some(128))]);
        assert_eq!(video[0].size.as_deref(), Some("10MB"));
        assert_eq!(audio[0].size.as_deref(), Some("3MB"));
    }

    #[test]
    fn classification_is_deterministic() {
        let formats = vec![
            combined("c720", 720),
            video_only("vo1080", 1080),
            audio_only("a128", Some(128)),
        ];
        let first = classify(&formats);
        let second = classify(&formats);
        assert_eq!(
            serde_json::to_value(&first.0).unwrap(),
            serde_json::to_value(&second.0).unwrap()
        );
        assert_eq!(
            serde_json::to_value(&first.1).unwrap(),
            serde_json::to_value(&second.1).unwrap()
        );
    }
}
