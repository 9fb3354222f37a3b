use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub downloads: DownloadsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:3000".parse().unwrap()
}

/// External tool binaries
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Extraction tool binary (resolved via PATH when bare)
    #[serde(default = "default_ytdlp_bin")]
    pub ytdlp_bin: PathBuf,
    /// Transcoder binary; probed at startup, optional at runtime
    #[serde(default = "default_ffmpeg_bin")]
    pub ffmpeg_bin: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_bin: default_ytdlp_bin(),
            ffmpeg_bin: default_ffmpeg_bin(),
        }
    }
}

fn default_ytdlp_bin() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_ffmpeg_bin() -> PathBuf {
    PathBuf::from("ffmpeg")
}

/// Download defaults applied at the request boundary
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadsConfig {
    /// Target height when a video download omits `quality`
    #[serde(default = "default_video_height")]
    pub default_video_height: u32,
    /// Output bitrate target (kbps) when an audio download omits `quality`
    #[serde(default = "default_audio_bitrate")]
    pub default_audio_bitrate: u32,
    /// User-Agent for direct media fetches
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            default_video_height: default_video_height(),
            default_audio_bitrate: default_audio_bitrate(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_video_height() -> u32 {
    720
}

fn default_audio_bitrate() -> u32 {
    192
}

fn default_user_agent() -> String {
    concat!("vidrelay/", env!("CARGO_PKG_VERSION")).to_string()
}
