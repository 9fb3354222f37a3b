//! Data returned by the extraction collaborator.

/// Metadata for one video plus the catalog of its available streams.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub channel_name: String,
    pub thumbnail: Option<String>,
    pub duration_seconds: u64,
    pub view_count: u64,
    pub description: String,
    pub formats: Vec<StreamFormat>,
}

/// One available encoded stream variant of a video.
///
/// Sourced from the extraction collaborator and treated as read-only for the
/// lifetime of a request. At least one of `has_video`/`has_audio` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFormat {
    /// Opaque handle for this stream (yt-dlp `format_id`, i.e. the itag).
    pub id: String,
    pub has_video: bool,
    pub has_audio: bool,
    /// Container/extension tag, e.g. `"mp4"` or `"webm"`.
    pub container: String,
    /// Vertical resolution, present when `has_video`.
    pub height: Option<u32>,
    /// Average audio bitrate in kbps, present when `has_audio`.
    pub audio_bitrate: Option<u32>,
    /// Approximate size in bytes, may be absent.
    pub approx_size: Option<u64>,
    /// Direct media URL for fetching the stream bytes.
    pub url: String,
}
