//! Request handlers, one module per area of the API

pub mod billing;
pub mod history;
pub mod merge;
pub mod notifications;
pub mod profile;
pub mod session;
pub mod users;

use crate::error::AppError;
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

/// JSON request body whose decode failures surface as [`AppError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Payload<T>(pub T);

/// Query string whose decode failures surface as [`AppError`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// Plain acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(message: impl Into<String>, id: impl ToString) -> Self {
        Self {
            message: message.into(),
            id: Some(id.to_string()),
        }
    }
}

/// Acknowledgement that repeats the HTTP status in the body
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: 200,
            message: message.into(),
            id: None,
        }
    }
}

/// Service banner served at `/`
pub async fn home() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "PDFM backend is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "PDFM API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::Domain(pdfm_core::Error::NotFound("Route".to_string()))
}
