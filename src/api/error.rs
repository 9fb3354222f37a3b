use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::extract::ExtractError;
use crate::transcode::TranscodeError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing video URL/ID; the caller must not retry.
    #[error("{0}")]
    InvalidInput(String),
    /// The extraction or transcoding collaborator failed before any bytes
    /// were sent.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn invalid_id() -> Self {
        ApiError::InvalidInput("Invalid video URL or ID".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = match self {
            ApiError::InvalidInput(message) => ErrorResponse {
                error: message,
                message: None,
            },
            // The upstream message is passed through for debuggability.
            ApiError::Upstream(message) => ErrorResponse {
                error: "Failed to process video".to_string(),
                message: Some(message),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ExtractError> for ApiError {
    fn from(value: ExtractError) -> Self {
        ApiError::Upstream(value.to_string())
    }
}

impl From<TranscodeError> for ApiError {
    fn from(value: TranscodeError) -> Self {
        ApiError::Upstream(value.to_string())
    }
}
