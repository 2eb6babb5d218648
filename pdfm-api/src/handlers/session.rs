use super::{MessageResponse, Payload};
use crate::auth::Client;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use pdfm_core::models::{Credentials, Registration};
use pdfm_core::services::{bearer_token, BearerError};
use serde::{Deserialize, Serialize};

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_name: String,
    pub is_admin: bool,
    pub message: String,
}

pub async fn register(
    State(state): State<AppState>,
    Payload(registration): Payload<Registration>,
) -> Result<Json<MessageResponse>, AppError> {
    state.sessions.register(registration).await?;
    Ok(Json(MessageResponse::new("Registration successful")))
}

pub async fn login(
    State(state): State<AppState>,
    Client(client): Client,
    Payload(credentials): Payload<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let outcome = state.sessions.login(credentials, client).await?;
    Ok(Json(LoginResponse {
        token: outcome.token.token,
        user_name: outcome.user.name,
        is_admin: outcome.user.is_admin,
        message: "Login successful".to_string(),
    }))
}

/// Revoke the caller's token. A missing header is a bad request rather than
/// an authentication failure.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let token = match bearer_token(header) {
        Ok(token) => token,
        Err(BearerError::Missing) => {
            return Err(AppError::BadRequest("Token not found".to_string()))
        }
        Err(e) => return Err(pdfm_core::Error::from(e).into()),
    };

    if !state.sessions.logout(token).await {
        tracing::debug!("logout with unknown token");
    }
    Ok(Json(MessageResponse::new("Logout successful")))
}
