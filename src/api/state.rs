use std::sync::Arc;

use crate::config::Config;
use crate::extract::MediaExtractor;
use crate::observability::Metrics;
use crate::transcode::FfmpegTranscoder;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: Arc<dyn MediaExtractor>,
    /// Present only when ffmpeg was detected at startup.
    pub transcoder: Option<Arc<FfmpegTranscoder>>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: Config,
        extractor: Arc<dyn MediaExtractor>,
        transcoder: Option<FfmpegTranscoder>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            extractor,
            transcoder: transcoder.map(Arc::new),
            metrics,
        }
    }
}
