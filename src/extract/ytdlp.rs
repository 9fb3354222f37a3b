//! yt-dlp backed implementation of [`MediaExtractor`].
//!
//! Metadata comes from a `yt-dlp -J` JSON dump; stream bytes are fetched
//! directly from the format URLs with reqwest so they can be piped to the
//! HTTP response without buffering.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use super::{ExtractError, MediaExtractor, StreamFormat, VideoMetadata, watch_url};
use crate::streams::{ByteStream, ProcessStream};

pub struct YtDlpExtractor {
    bin: PathBuf,
    client: reqwest::Client,
}

impl YtDlpExtractor {
    pub fn new(bin: PathBuf, user_agent: &str) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { bin, client })
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn metadata(&self, video_id: &str) -> Result<VideoMetadata, ExtractError> {
        debug!(video_id, "fetching metadata dump");

        let output = Command::new(&self.bin)
            .arg("-J")
            .arg("--no-playlist")
            .arg(watch_url(video_id))
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Tool(
                stderr.lines().last().unwrap_or("unknown error").to_string(),
            ));
        }

        parse_dump(&output.stdout)
    }

    async fn open_stream(&self, format: &StreamFormat) -> Result<ByteStream, ExtractError> {
        let response = self
            .client
            .get(&format.url)
            .send()
            .await?
            .error_for_status()?;

        Ok(response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed())
    }

    async fn open_best(&self, video_id: &str) -> Result<ByteStream, ExtractError> {
        debug!(video_id, "streaming via tool-selected best format");

        let child = Command::new(&self.bin)
            .args(["-f", "best", "--no-playlist", "-o", "-"])
            .arg(watch_url(video_id))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        Ok(ProcessStream::new("yt-dlp", child)?.boxed())
    }
}

#[derive(Debug, Deserialize)]
struct RawDump {
    id: String,
    title: Option<String>,
    channel: Option<String>,
    uploader: Option<String>,
    thumbnail: Option<String>,
    duration: Option<f64>,
    view_count: Option<u64>,
    description: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_id: String,
    vcodec: Option<String>,
    acodec: Option<String>,
    ext: Option<String>,
    height: Option<u32>,
    abr: Option<f64>,
    filesize: Option<u64>,
    filesize_approx: Option<f64>,
    url: Option<String>,
}

impl RawFormat {
    fn has_video(&self) -> bool {
        self.vcodec.as_deref().is_some_and(|c| c != "none")
    }

    fn has_audio(&self) -> bool {
        self.acodec.as_deref().is_some_and(|c| c != "none")
    }
}

fn parse_dump(dump: &[u8]) -> Result<VideoMetadata, ExtractError> {
    let raw: RawDump = serde_json::from_slice(dump)?;

    let formats = raw
        .formats
        .into_iter()
        .filter_map(|f| {
            // Storyboards and other degenerate entries carry neither track.
            let (has_video, has_audio) = (f.has_video(), f.has_audio());
            if !has_video && !has_audio {
                return None;
            }
            let url = f.url?;

            Some(StreamFormat {
                id: f.format_id,
                has_video,
                has_audio,
                container: f.ext.unwrap_or_default(),
                height: f.height,
                audio_bitrate: f.abr.map(|b| b.round() as u32),
                approx_size: f.filesize.or(f.filesize_approx.map(|s| s as u64)),
                url,
            })
        })
        .collect();

    Ok(VideoMetadata {
        video_id: raw.id,
        title: raw.title.unwrap_or_else(|| "Untitled".to_string()),
        channel_name: raw.channel.or(raw.uploader).unwrap_or_default(),
        thumbnail: raw.thumbnail,
        duration_seconds: raw.duration.map(|d| d.round() as u64).unwrap_or(0),
        view_count: raw.view_count.unwrap_or(0),
        description: raw.description.unwrap_or_default(),
        formats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "id": "dQw4w9WgXcQ",
        "title": "Test Video",
        "channel": "Test Channel",
        "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hq720.jpg",
        "duration": 212.4,
        "view_count": 1234567,
        "description": "A description",
        "formats": [
            {
                "format_id": "sb0",
                "vcodec": "none",
                "acodec": "none",
                "ext": "mhtml",
                "url": "https://example.com/storyboard"
            },
            {
                "format_id": "18",
                "vcodec": "avc1.42001E",
                "acodec": "mp4a.40.2",
                "ext": "mp4",
                "height": 360,
                "abr": 96.0,
                "filesize": 10485760,
                "url": "https://example.com/18"
            },
            {
                "format_id": "137",
                "vcodec": "avc1.640028",
                "acodec": "none",
                "ext": "mp4",
                "height": 1080,
                "filesize_approx": 52428800.0,
                "url": "https://example.com/137"
            },
            {
                "format_id": "251",
                "vcodec": "none",
                "acodec": "opus",
                "ext": "webm",
                "abr": 139.8,
                "url": "https://example.com/251"
            },
            {
                "format_id": "urlless",
                "vcodec": "vp9",
                "acodec": "none",
                "ext": "webm",
                "height": 720
            }
        ]
    }"#;

    #[test]
    fn parses_details_and_formats() {
        let meta = parse_dump(DUMP.as_bytes()).unwrap();

        assert_eq!(meta.video_id, "dQw4w9WgXcQ");
        assert_eq!(meta.title, "Test Video");
        assert_eq!(meta.channel_name, "Test Channel");
        assert_eq!(meta.duration_seconds, 212);
        assert_eq!(meta.view_count, 1234567);

        // Storyboard and url-less entries are dropped.
        assert_eq!(meta.formats.len(), 3);

        let combined = &meta.formats[0];
        assert_eq!(combined.id, "18");
        assert!(combined.has_video && combined.has_audio);
        assert_eq!(combined.container, "mp4");
        assert_eq!(combined.height, Some(360));
        assert_eq!(combined.audio_bitrate, Some(96));
        assert_eq!(combined.approx_size, Some(10_485_760));

        let video_only = &meta.formats[1];
        assert!(video_only.has_video && !video_only.has_audio);
        assert_eq!(video_only.approx_size, Some(52_428_800));

        let audio_only = &meta.formats[2];
        assert!(!audio_only.has_video && audio_only.has_audio);
        assert_eq!(audio_only.audio_bitrate, Some(140));
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let meta = parse_dump(br#"{"id": "abcdefghijk"}"#).unwrap();
        assert_eq!(meta.video_id, "abcdefghijk");
        assert_eq!(meta.title, "Untitled");
        assert!(meta.formats.is_empty());
    }

    #[test]
    fn rejects_malformed_dump() {
        assert!(matches!(
            parse_dump(b"not json"),
            Err(ExtractError::Parse(_))
        ));
    }

    #[test]
    fn builds_watch_url() {
        assert_eq!(
            watch_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}
