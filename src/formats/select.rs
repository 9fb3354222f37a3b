//! Tiered download format selection.

use super::DEFAULT_AUDIO_BITRATE;
use crate::extract::StreamFormat;

/// Outcome of video format selection, in strict tier order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSelection {
    /// A combined mp4 stream; exact height match or nearest by distance.
    Combined(StreamFormat),
    /// No combined stream exists: separate tracks, muxed by the transcoder.
    Merge {
        video: StreamFormat,
        audio: StreamFormat,
    },
    /// A video-only stream served alone (no audio pairing or no transcoder).
    VideoOnly(StreamFormat),
    /// Nothing selectable; defer to the extraction tool's own "highest"
    /// heuristic. The requested quality is deliberately ignored here.
    Fallback,
}

/// Picks the stream(s) to satisfy a video download at `requested_height`.
///
/// Tie-break on equal distance is traversal order: the first descriptor
/// encountered wins.
pub fn select_video(
    formats: &[StreamFormat],
    requested_height: u32,
    transcoder_available: bool,
) -> VideoSelection {
    let combined = formats
        .iter()
        .filter(|f| f.has_video && f.has_audio && f.container == "mp4");
    if let Some(best) = nearest_by_height(combined, requested_height) {
        return VideoSelection::Combined(best.clone());
    }

    let video_only = formats.iter().filter(|f| f.has_video && !f.has_audio);
    let Some(video) = nearest_by_height(video_only, requested_height) else {
        return VideoSelection::Fallback;
    };

    if transcoder_available {
        if let Some(audio) = best_audio(formats) {
            return VideoSelection::Merge {
                video: video.clone(),
                audio: audio.clone(),
            };
        }
    }

    VideoSelection::VideoOnly(video.clone())
}

fn nearest_by_height<'a>(
    formats: impl Iterator<Item = &'a StreamFormat>,
    target: u32,
) -> Option<&'a StreamFormat> {
    let mut best: Option<(&StreamFormat, u32)> = None;
    for format in formats {
        let Some(height) = format.height else {
            continue;
        };
        let distance = height.abs_diff(target);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((format, distance));
        }
    }
    best.map(|(format, _)| format)
}

/// The audio-only descriptor with the highest bitrate (first wins on ties).
/// Streams without a reported bitrate are assumed to be 128kbps.
pub fn best_audio(formats: &[StreamFormat]) -> Option<&StreamFormat> {
    let mut best: Option<(&StreamFormat, u32)> = None;
    for format in formats.iter().filter(|f| f.has_audio && !f.has_video) {
        let bitrate = format.audio_bitrate.unwrap_or(DEFAULT_AUDIO_BITRATE);
        if best.is_none_or(|(_, b)| bitrate > b) {
            best = Some((format, bitrate));
        }
    }
    best.map(|(format, _)| format)
}
