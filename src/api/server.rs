use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use super::{
    services::{download, get_url, health, service_index, video_info},
    state::AppState,
};
use crate::config::Config;
use crate::extract::YtDlpExtractor;
use crate::observability::Metrics;
use crate::transcode::FfmpegTranscoder;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Builds the full application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_index))
        .route("/api/health", get(health))
        .route("/api/info", get(video_info))
        .route("/api/download", get(download))
        .route("/api/get-url", get(get_url))
        .with_state(state)
        // The relay serves a browser front-end on another origin
        .layer(CorsLayer::permissive())
}

pub async fn run(address: Option<SocketAddr>) -> Result<(), AnyError> {
    // Load config
    info!("Loading configuration");
    let mut config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;

    if let Some(address) = address {
        config.server.bind_addr = address;
    }

    let metrics = Arc::new(Metrics::new());

    let extractor = YtDlpExtractor::new(
        config.tools.ytdlp_bin.clone(),
        &config.downloads.user_agent,
    )
    .map_err(|e| format!("Failed to initialize extractor: {}", e))?;

    // Optional capability: absence degrades downloads but is not an error
    let transcoder = FfmpegTranscoder::detect(&config.tools.ffmpeg_bin, metrics.clone()).await;

    let address = config.server.bind_addr;
    let state = AppState::new(config, Arc::new(extractor), transcoder, metrics);
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "vidrelay API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
