//! API models for the vidrelay HTTP surface.
//!
//! Three endpoints share one query shape ([`MediaQuery`]): the target video
//! is named by either `url` or `videoId`, and downloads add `type`/`quality`.
//! Query values are validated once at the request boundary into a typed
//! [`DownloadRequest`]; handlers never coerce strings inline.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::config::DownloadsConfig;
use crate::formats::{AudioOption, VideoOption};
use crate::video_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Audio,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Video => write!(f, "video"),
            MediaType::Audio => write!(f, "audio"),
        }
    }
}

/// Raw query parameters accepted by `/api/info`, `/api/download`, and
/// `/api/get-url`.
#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    pub url: Option<String>,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
    pub quality: Option<u32>,
    /// Accepted for compatibility; never consulted by selection.
    #[allow(dead_code)]
    pub itag: Option<String>,
}

/// A validated download request. `quality` is a target height for video and
/// a target output bitrate (kbps) for audio.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub video_id: String,
    pub media_type: MediaType,
    pub quality: u32,
}

impl MediaQuery {
    /// Resolves the target video identifier from `url` or `videoId`.
    pub fn resolve_video_id(&self) -> Result<String, ApiError> {
        let target = self
            .url
            .as_deref()
            .or(self.video_id.as_deref())
            .ok_or_else(|| {
                ApiError::InvalidInput("Missing url or videoId parameter".to_string())
            })?;

        video_id::resolve(target).ok_or_else(ApiError::invalid_id)
    }

    /// Validates the full query into a [`DownloadRequest`], applying the
    /// configured defaults (`type=video`, `quality=720` for video / `192`
    /// for audio).
    pub fn to_download_request(
        &self,
        defaults: &DownloadsConfig,
    ) -> Result<DownloadRequest, ApiError> {
        let video_id = self.resolve_video_id()?;
        let media_type = self.media_type.unwrap_or(MediaType::Video);
        let quality = self.quality.unwrap_or(match media_type {
            MediaType::Video => defaults.default_video_height,
            MediaType::Audio => defaults.default_audio_bitrate,
        });

        Ok(DownloadRequest {
            video_id,
            media_type,
            quality,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub success: bool,
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
    pub thumbnail: Option<String>,
    /// Duration in seconds.
    pub duration: u64,
    pub duration_formatted: String,
    pub view_count: u64,
    pub view_count_formatted: String,
    /// Truncated to 500 characters.
    pub description: String,
    pub formats: FormatLists,
}

#[derive(Debug, Serialize)]
pub struct FormatLists {
    pub video: Vec<VideoOption>,
    pub audio: Vec<AudioOption>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetUrlResponse {
    pub success: bool,
    pub download_url: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceIndex {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: ServiceEndpoints,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoints {
    pub info: &'static str,
    pub download: &'static str,
    pub get_url: &'static str,
    pub health: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
