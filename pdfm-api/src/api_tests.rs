//! Tests for routing, CORS and error rendering

#[cfg(test)]
mod tests {
    use super::super::api::*;
    use crate::config::Settings;
    use crate::state::AppState;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = app();

        let response = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            app.oneshot(
                Request::builder()
                    .uri("/pdfm/health")
                    .method("GET")
                    .body(Body::empty())
                    .unwrap(),
            ),
        )
        .await
        .expect("Request timed out")
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "PDFM API");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn test_home_banner() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_404_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/pdfm/does-not-exist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Route not found");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/pdfm/login")
                    .method("GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/pdfm/register")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_origin_is_forbidden() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/pdfm/health")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"], "Origin not allowed");
    }

    #[tokio::test]
    async fn test_preflight_from_allowed_origin() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/pdfm/login")
                    .method("OPTIONS")
                    .header(header::ORIGIN, "https://pdfmulbi.github.io")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://pdfmulbi.github.io"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn test_configured_origins_replace_defaults() {
        let settings = Settings {
            allowed_origins: vec!["https://app.example".to_string()],
            ..Settings::default()
        };
        let app = router(AppState::in_memory(), &settings);

        let allowed = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/pdfm/health")
                    .header(header::ORIGIN, "https://app.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);

        let default_origin = app
            .oneshot(
                Request::builder()
                    .uri("/pdfm/health")
                    .header(header::ORIGIN, "https://pdfmulbi.github.io")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(default_origin.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/pdfm/history/all")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Unauthorized: missing token");
    }

    #[tokio::test]
    async fn test_body_limit_applies() {
        let settings = Settings {
            max_upload_mb: 1,
            ..Settings::default()
        };
        let app = router(AppState::in_memory(), &settings);
        let oversized = json!({ "name": "x".repeat(2 * 1024 * 1024) }).to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/pdfm/register")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(oversized))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
