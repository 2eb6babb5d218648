//! Shared helpers for the API integration tests
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use oxidize_pdf::{Document, Font, Page};
use pdfm_api::{router, AppState, Settings};
use serde_json::{json, Value};
use std::io::Write;
use tower::util::ServiceExt;

pub const PASSWORD: &str = "password123";

/// Router plus direct access to the state behind it
#[derive(Clone)]
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let state = AppState::in_memory_with(&settings);
        let app = router(state.clone(), &settings);
        Self { app, state }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Send a request with an optional JSON body and bearer token
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn register(&self, name: &str, email: &str) -> StatusCode {
        let (status, _) = self
            .call(
                Method::POST,
                "/pdfm/register",
                None,
                Some(json!({ "name": name, "email": email, "password": PASSWORD })),
            )
            .await;
        status
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/pdfm/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Register a regular account and return its token
    pub async fn user_token(&self, name: &str, email: &str) -> String {
        assert_eq!(self.register(name, email).await, StatusCode::OK);
        self.login(email).await
    }

    /// Bootstrap an administrator and return its token
    pub async fn admin_token(&self) -> String {
        self.state
            .users
            .ensure_admin("Admin", "admin@example.com", PASSWORD)
            .await;
        self.login("admin@example.com").await
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    }
}

/// Helper function to create a simple PDF for testing
pub fn create_test_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::new();
    let mut page = Page::a4();

    page.text()
        .set_font(Font::Helvetica, 24.0)
        .at(50.0, 750.0)
        .write(text)
        .unwrap();

    doc.add_page(page);

    let mut pdf_bytes = Vec::new();
    doc.write(&mut pdf_bytes).unwrap();
    pdf_bytes
}

/// Build a multipart merge request carrying `pdf_files`
pub fn merge_request(pdf_files: &[Vec<u8>], token: Option<&str>) -> Request<Body> {
    let boundary = "----WebKitFormBoundary7MA4YWxkTrZu0gW";
    let mut body = Vec::new();

    for (i, pdf_data) in pdf_files.iter().enumerate() {
        write!(body, "--{boundary}\r\n").unwrap();
        write!(
            body,
            "Content-Disposition: form-data; name=\"files\"; filename=\"test{}.pdf\"\r\n",
            i + 1
        )
        .unwrap();
        write!(body, "Content-Type: application/pdf\r\n\r\n").unwrap();
        body.extend_from_slice(pdf_data);
        write!(body, "\r\n").unwrap();
    }

    write!(body, "--{boundary}\r\n").unwrap();
    write!(
        body,
        "Content-Disposition: form-data; name=\"options\"\r\n\r\n"
    )
    .unwrap();
    let options = json!({
        "preserve_bookmarks": true,
        "optimize": false
    });
    write!(body, "{options}\r\n").unwrap();
    write!(body, "--{boundary}--\r\n").unwrap();

    let mut builder = Request::builder()
        .method("POST")
        .uri("/pdfm/merge")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}
