use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use super::{
    models::{
        DownloadRequest, FormatLists, GetUrlResponse, HealthResponse, InfoResponse, MediaQuery,
        MediaType, ServiceEndpoints, ServiceIndex,
    },
    state::AppState,
    utils::{content_type_for, sanitize_filename, truncate_chars},
};
use crate::api::error::ApiError;
use crate::extract::{StreamFormat, VideoMetadata};
use crate::formats::{VideoSelection, best_audio, classify, select_video};
use crate::humanize::{format_count, format_duration};
use crate::streams::ByteStream;

const DESCRIPTION_LIMIT: usize = 500;

/// Service index (GET /)
pub async fn service_index() -> Json<ServiceIndex> {
    Json(ServiceIndex {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ServiceEndpoints {
            info: "/api/info?url=...|videoId=...",
            download: "/api/download?url=...|videoId=...&type=video|audio&quality=N",
            get_url: "/api/get-url?url=...|videoId=...&type=video|audio&quality=N",
            health: "/api/health",
        },
    })
}

/// Health check endpoint (GET /api/health)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Video metadata endpoint (GET /api/info)
///
/// Resolves the target identifier, fetches the stream catalog from the
/// extraction collaborator, and returns the classified quality lists along
/// with display metadata. Classification is pure, so repeated calls against
/// an unchanged upstream catalog return identical format lists.
pub async fn video_info(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> Result<Json<InfoResponse>, ApiError> {
    let video_id = query.resolve_video_id()?;
    debug!(video_id, "serving video info");

    let meta = state.extractor.metadata(&video_id).await?;
    let (video, audio) = classify(&meta.formats);

    state.metrics.info_served();

    Ok(Json(InfoResponse {
        success: true,
        video_id: meta.video_id,
        title: meta.title,
        channel_name: meta.channel_name,
        thumbnail: meta.thumbnail,
        duration: meta.duration_seconds,
        duration_formatted: format_duration(meta.duration_seconds),
        view_count: meta.view_count,
        view_count_formatted: format_count(meta.view_count),
        description: truncate_chars(&meta.description, DESCRIPTION_LIMIT),
        formats: FormatLists { video, audio },
    }))
}

/// Download endpoint (GET /api/download)
///
/// Streams the selected media directly to the response body; nothing is
/// buffered or written to disk. Errors after this function returns (stream
/// failures, transcoder exits) are logged server-side and truncate the
/// response, since headers are already sent.
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> Result<Response, ApiError> {
    let request = query.to_download_request(&state.config.downloads)?;
    info!(
        video_id = %request.video_id,
        media_type = %request.media_type,
        quality = request.quality,
        "starting download"
    );

    let meta = state.extractor.metadata(&request.video_id).await?;
    state.metrics.download_started();

    let stem = sanitize_filename(&meta.title);
    let (stream, content_type, filename) = match request.media_type {
        MediaType::Audio => audio_download(&state, &request, &meta, &stem).await?,
        MediaType::Video => video_download(&state, &request, &meta, &stem).await?,
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

async fn audio_download(
    state: &AppState,
    request: &DownloadRequest,
    meta: &VideoMetadata,
    stem: &str,
) -> Result<(ByteStream, &'static str, String), ApiError> {
    let format = best_audio(&meta.formats)
        .ok_or_else(|| ApiError::Upstream("no audio-only stream available".to_string()))?;
    let source = state.extractor.open_stream(format).await?;

    match &state.transcoder {
        Some(transcoder) => {
            let stream = transcoder.audio_mp3(source, request.quality)?;
            Ok((stream, "audio/mpeg", format!("{stem}.mp3")))
        }
        // Degraded path: the raw audio-only stream, untranscoded.
        None => Ok((
            source,
            content_type_for(&format.container, false),
            format!("{stem}.{}", format.container),
        )),
    }
}

async fn video_download(
    state: &AppState,
    request: &DownloadRequest,
    meta: &VideoMetadata,
    stem: &str,
) -> Result<(ByteStream, &'static str, String), ApiError> {
    match select_video(
        &meta.formats,
        request.quality,
        state.transcoder.is_some(),
    ) {
        VideoSelection::Combined(format) => {
            let stream = state.extractor.open_stream(&format).await?;
            Ok((stream, "video/mp4", format!("{stem}.mp4")))
        }
        VideoSelection::Merge { video, audio } => match &state.transcoder {
            Some(transcoder) => {
                let stream = transcoder.merge(&video.url, &audio.url)?;
                Ok((stream, "video/mp4", format!("{stem}.mp4")))
            }
            // Selection only proposes a merge when a transcoder was seen,
            // but degrade rather than fail if it has gone away.
            None => serve_raw_video(state, video, stem).await,
        },
        VideoSelection::VideoOnly(format) => serve_raw_video(state, format, stem).await,
        VideoSelection::Fallback => {
            debug!(video_id = %request.video_id, "no selectable format, deferring to extractor");
            let stream = state.extractor.open_best(&request.video_id).await?;
            Ok((stream, "video/mp4", format!("{stem}.mp4")))
        }
    }
}

async fn serve_raw_video(
    state: &AppState,
    format: StreamFormat,
    stem: &str,
) -> Result<(ByteStream, &'static str, String), ApiError> {
    let stream = state.extractor.open_stream(&format).await?;
    Ok((
        stream,
        content_type_for(&format.container, true),
        format!("{stem}.{}", format.container),
    ))
}

/// Download URL builder (GET /api/get-url)
///
/// Returns a link back at this server's own download endpoint with the
/// resolved `videoId` substituted for whatever target the caller passed.
pub async fn get_url(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MediaQuery>,
) -> Result<Json<GetUrlResponse>, ApiError> {
    let request = query.to_download_request(&state.config.downloads)?;

    let path = format!(
        "/api/download?videoId={}&type={}&quality={}",
        request.video_id, request.media_type, request.quality
    );
    let download_url = match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{host}{path}"),
        None => path,
    };

    Ok(Json(GetUrlResponse {
        success: true,
        download_url,
    }))
}
