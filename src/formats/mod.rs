//! Format classification and selection over the extraction collaborator's
//! stream catalog.

mod classify;
mod select;

pub use classify::{AudioOption, VideoOption, classify};
pub use select::{VideoSelection, best_audio, select_video};

/// Streams below this height are thumbnail-grade and never presented.
pub const MIN_VIDEO_HEIGHT: u32 = 144;

/// Assumed bitrate for audio streams that do not report one.
pub const DEFAULT_AUDIO_BITRATE: u32 = 128;
