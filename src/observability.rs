//! Observability stubs (metrics, tracing)

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters/gauges
#[derive(Debug, Default)]
pub struct Metrics {
    infos_served: AtomicU64,
    downloads_started: AtomicU64,
    transcode_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info_served(&self) {
        self.infos_served.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "infos_served", "Metric incremented");
    }

    pub fn download_started(&self) {
        self.downloads_started.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "downloads_started", "Metric incremented");
    }

    pub fn transcode_failed(&self) {
        self.transcode_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "transcode_failures", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            infos_served: self.infos_served.load(Ordering::Relaxed),
            downloads_started: self.downloads_started.load(Ordering::Relaxed),
            transcode_failures: self.transcode_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub infos_served: u64,
    pub downloads_started: u64,
    pub transcode_failures: u64,
}
