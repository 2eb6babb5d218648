//! Cross-origin access for the browser front ends

use crate::error::ErrorResponse;
use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// Parsed origin allowlist
#[derive(Debug, Clone)]
pub struct AllowedOrigins(Arc<Vec<HeaderValue>>);

impl AllowedOrigins {
    pub fn new(origins: &[String]) -> Self {
        let parsed = origins
            .iter()
            .filter_map(|origin| {
                let trimmed = origin.trim().trim_end_matches('/');
                if trimmed.is_empty() {
                    None
                } else {
                    match HeaderValue::from_str(trimmed) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            tracing::warn!(origin = trimmed, "ignoring unparsable origin");
                            None
                        }
                    }
                }
            })
            .collect();
        Self(Arc::new(parsed))
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }

    /// CORS layer answering preflights for the listed origins
    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.0.iter().cloned()))
            .allow_credentials(true)
            .allow_methods([
                Method::POST,
                Method::GET,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                HeaderName::from_static("login"),
            ])
            .expose_headers([HeaderName::from_static("x-merge-info")])
            .max_age(PREFLIGHT_MAX_AGE)
    }
}

/// Reject requests whose `Origin` is not on the allowlist.
///
/// Requests without an `Origin` header (non-browser clients) pass through.
pub async fn reject_unknown_origin(
    State(allowed): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !allowed.contains(origin) {
            tracing::debug!(origin = ?origin, "rejected request from unknown origin");
            let body = ErrorResponse {
                error: "Origin not allowed".to_string(),
            };
            return (StatusCode::FORBIDDEN, Json(body)).into_response();
        }
    }
    next.run(request).await
}
