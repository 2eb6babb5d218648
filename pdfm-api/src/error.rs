use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdfm_core::Error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub error: String,
}

/// Application-specific error types for the API
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors raised by the domain services
    #[error(transparent)]
    Domain(#[from] Error),

    /// Request body that is not valid JSON for the endpoint
    #[error("Invalid request body: {0}")]
    Json(#[from] JsonRejection),

    /// Query string that does not fit the endpoint
    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),

    /// Malformed multipart upload
    #[error("Failed to read multipart field: {0}")]
    Multipart(#[from] MultipartError),

    /// Malformed request outside of body decoding
    #[error("{0}")]
    BadRequest(String),

    /// I/O errors (file operations, network, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Domain(e) => match e {
                Error::InvalidInput(_) | Error::InvalidId(_) => StatusCode::BAD_REQUEST,
                Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                Error::Forbidden(_) | Error::MergeLimitReached { .. } => StatusCode::FORBIDDEN,
                Error::NotFound(_) => StatusCode::NOT_FOUND,
                Error::Conflict(_) => StatusCode::CONFLICT,
                Error::Pdf(_) | Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Json(rejection) => too_large_or_bad_request(rejection.status()),
            AppError::Multipart(e) => too_large_or_bad_request(e.status()),
            AppError::Query(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Decode failures are all bad requests, except for bodies over the size limit
fn too_large_or_bad_request(status: StatusCode) -> StatusCode {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        status
    } else {
        StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let error_response = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}
