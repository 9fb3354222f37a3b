//! Extraction collaborator: retrieves video metadata and stream bytes.

mod types;
mod ytdlp;

pub use types::{StreamFormat, VideoMetadata};
pub use ytdlp::YtDlpExtractor;

use async_trait::async_trait;
use thiserror::Error;

use crate::streams::ByteStream;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to run extraction tool: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("extraction tool failed: {0}")]
    Tool(String),

    #[error("could not parse extraction output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("stream fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
}

/// Interface to the external metadata/stream extraction tool.
///
/// Failures here are surfaced to callers as server errors; this layer does
/// not retry.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Fetch metadata and the full stream catalog for a video.
    async fn metadata(&self, video_id: &str) -> Result<VideoMetadata, ExtractError>;

    /// Open a live byte stream for one stream descriptor.
    async fn open_stream(&self, format: &StreamFormat) -> Result<ByteStream, ExtractError>;

    /// Open a byte stream using the tool's own "highest quality" heuristic,
    /// bypassing explicit format selection. Last-resort download tier.
    async fn open_best(&self, video_id: &str) -> Result<ByteStream, ExtractError>;
}

/// Canonical watch URL for a video identifier.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}
