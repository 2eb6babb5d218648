//! Registration, login, logout and token handling

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use common::{body_json, TestApp, PASSWORD};
use pdfm_core::models::Token;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_register_then_login_yields_usable_token() {
    let app = TestApp::new();
    assert_eq!(app.register("Test User", "test@example.com").await, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::POST,
            "/pdfm/login",
            None,
            Some(json!({ "email": "test@example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userName"], "Test User");
    assert_eq!(body["isAdmin"], false);
    let token = body["token"].as_str().unwrap();

    let (status, profile) = app
        .call(Method::GET, "/pdfm/getone/users", Some(token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "test@example.com");
    assert!(profile.get("password").is_none());
}

#[tokio::test]
async fn test_register_validation_and_duplicates() {
    let app = TestApp::new();

    let (status, body) = app
        .call(
            Method::POST,
            "/pdfm/register",
            None,
            Some(json!({ "name": "No Password", "email": "np@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert_eq!(app.register("First", "dup@example.com").await, StatusCode::OK);
    assert_eq!(app.register("Second", "dup@example.com").await, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_padded_email_logs_in_as_registered() {
    let app = TestApp::new();
    assert_eq!(app.register("Padded", "  padded@example.com ").await, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::POST,
            "/pdfm/login",
            None,
            Some(json!({ "email": " padded@example.com  ", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userName"], "Padded");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new();
    app.register("Test User", "test@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/pdfm/login",
            None,
            Some(json!({ "email": "test@example.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("incorrect"));
}

#[tokio::test]
async fn test_login_records_client_details() {
    let app = TestApp::new();
    app.register("Test User", "test@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/pdfm/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::USER_AGENT, "integration-test")
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .body(Body::from(
            json!({ "email": "test@example.com", "password": PASSWORD }).to_string(),
        ))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    // the log is written by a background task
    let mut logs = Vec::new();
    for _ in 0..50 {
        logs = app.state.db.login_logs.all().await;
        if !logs.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].ip_address, "203.0.113.7");
    assert_eq!(logs[0].user_agent, "integration-test");
}

#[tokio::test]
async fn test_missing_malformed_and_unknown_tokens_are_rejected() {
    let app = TestApp::new();

    let (status, _) = app.call(Method::GET, "/pdfm/getone/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/pdfm/getone/users")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Unauthorized: invalid token format");

    let (status, _) = app
        .call(Method::GET, "/pdfm/getone/users", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected_and_removed() {
    let app = TestApp::new();
    app.register("Test User", "test@example.com").await;
    app.state
        .db
        .tokens
        .insert(Token {
            token: "stale".to_string(),
            email: "test@example.com".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
        })
        .await;

    let (status, body) = app
        .call(Method::GET, "/pdfm/getone/users", Some("stale"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized: token expired");
    assert_eq!(app.state.db.tokens.count(|t| t.token == "stale").await, 0);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new();
    let token = app.user_token("Test User", "test@example.com").await;

    let (status, body) = app.call(Method::POST, "/pdfm/logout", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = app
        .call(Method::GET, "/pdfm/getone/users", Some(token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_header_errors() {
    let app = TestApp::new();

    let (status, _) = app.call(Method::POST, "/pdfm/logout", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/pdfm/logout")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(request).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_photo_roundtrip() {
    let app = TestApp::new();
    let token = app.user_token("Test User", "test@example.com").await;

    let (status, _) = app
        .call(
            Method::POST,
            "/pdfm/profile/photo",
            Some(token.as_str()),
            Some(json!({ "profilePhoto": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            Method::POST,
            "/pdfm/profile/photo",
            Some(token.as_str()),
            Some(json!({ "profilePhoto": "data:image/png;base64,iVBORw0KGgo=" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(Method::GET, "/pdfm/profile/photo", Some(token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profilePhoto"], "data:image/png;base64,iVBORw0KGgo=");
}
