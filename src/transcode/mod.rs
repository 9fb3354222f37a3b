//! Optional ffmpeg transcoding collaborator.
//!
//! The binary may be absent on the host. When it is, downloads degrade (no
//! merge of separate tracks, no audio bitrate control) but requests still
//! succeed; every call site branches on the capability explicitly.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::observability::Metrics;
use crate::streams::{ByteStream, ProcessStream};

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to spawn ffmpeg: {0}")]
    Spawn(#[from] std::io::Error),
}

pub struct FfmpegTranscoder {
    bin: PathBuf,
    metrics: Arc<Metrics>,
}

impl FfmpegTranscoder {
    /// Probes for a working ffmpeg binary. Returns `None` when the binary is
    /// missing or broken; the service then runs without merge/re-encode
    /// support.
    pub async fn detect(bin: &Path, metrics: Arc<Metrics>) -> Option<Self> {
        let probe = Command::new(bin)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match probe {
            Ok(status) if status.success() => {
                info!(bin = %bin.display(), "ffmpeg available, merge and re-encode enabled");
                Some(Self {
                    bin: bin.to_path_buf(),
                    metrics,
                })
            }
            _ => {
                warn!(
                    bin = %bin.display(),
                    "ffmpeg not available, downloads degrade to single-stream"
                );
                None
            }
        }
    }

    /// Muxes a video-only and an audio-only source into one fragmented MP4,
    /// copying the video codec and re-encoding audio to AAC. ffmpeg fetches
    /// both inputs itself so neither track is buffered in this process.
    pub fn merge(&self, video_url: &str, audio_url: &str) -> Result<ByteStream, TranscodeError> {
        debug!("merging separate video and audio tracks");

        let child = Command::new(&self.bin)
            .args(["-hide_banner", "-loglevel", "error"])
            .args(["-i", video_url])
            .args(["-i", audio_url])
            .args(["-map", "0:v:0", "-map", "1:a:0"])
            .args(["-c:v", "copy", "-c:a", "aac"])
            // Plain mp4 needs a seekable output; fragmenting keeps it pipeable.
            .args(["-movflags", "frag_keyframe+empty_moov"])
            .args(["-f", "mp4", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        Ok(ProcessStream::new("ffmpeg", child)?
            .with_metrics(self.metrics.clone())
            .boxed())
    }

    /// Re-encodes a live audio stream to MP3 at the target bitrate. The input
    /// is piped through ffmpeg's stdin chunk by chunk.
    pub fn audio_mp3(
        &self,
        mut input: ByteStream,
        bitrate_kbps: u32,
    ) -> Result<ByteStream, TranscodeError> {
        debug!(bitrate_kbps, "re-encoding audio to mp3");

        let mut child = Command::new(&self.bin)
            .args(["-hide_banner", "-loglevel", "error"])
            .args(["-i", "pipe:0"])
            .args(["-vn", "-c:a", "libmp3lame"])
            .args(["-b:a", &format!("{bitrate_kbps}k")])
            .args(["-f", "mp3", "pipe:1"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("ffmpeg stdin not captured"))?;

        tokio::spawn(async move {
            while let Some(chunk) = input.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        warn!(error = %err, "source stream failed during re-encode");
                        break;
                    }
                };
                if stdin.write_all(&bytes).await.is_err() {
                    // ffmpeg went away; the output side logs the exit.
                    break;
                }
            }
            // Dropping stdin signals EOF to ffmpeg.
        });

        Ok(ProcessStream::new("ffmpeg", child)?
            .with_metrics(self.metrics.clone())
            .boxed())
    }
}
