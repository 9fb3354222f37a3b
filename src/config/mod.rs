//! Configuration management for vidrelay
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `VIDRELAY__<section>__<key>`
//!
//! Examples:
//! - `VIDRELAY__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `VIDRELAY__TOOLS__FFMPEG_BIN=/usr/local/bin/ffmpeg`
//! - `VIDRELAY__DOWNLOADS__DEFAULT_VIDEO_HEIGHT=1080`
//!
//! A bare `PORT` variable overrides just the listen port (default 3000).
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/vidrelay.toml`.
//! This can be overridden using the `VIDRELAY_CONFIG` environment variable.

mod models;
mod sources;

pub use models::{Config, DownloadsConfig, ServerConfig, ToolsConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`VIDRELAY__*`, plus bare `PORT`)
    /// 2. TOML file (default: `config/vidrelay.toml`)
    /// 3. Default values
    pub fn load() -> Result<Self, ConfigError> {
        Ok(sources::load()?)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        Ok(sources::load_from_sources(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:4000"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn test_full_config_example() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "0.0.0.0:3000"

[tools]
ytdlp_bin = "yt-dlp"
ffmpeg_bin = "/usr/bin/ffmpeg"

[downloads]
default_video_height = 720
default_audio_bitrate = 256
user_agent = "vidrelay-test/1.0"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(
            config.tools.ffmpeg_bin,
            std::path::PathBuf::from("/usr/bin/ffmpeg")
        );
        assert_eq!(config.downloads.default_audio_bitrate, 256);
        assert_eq!(config.downloads.user_agent, "vidrelay-test/1.0");
    }
}
