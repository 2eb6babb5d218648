use super::{Payload, StatusResponse};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use pdfm_core::models::{NewNotification, Notification};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationList {
    pub status: u16,
    pub message: String,
    pub notifications: Vec<Notification>,
}

pub async fn list(State(state): State<AppState>, AuthUser(user): AuthUser) -> Json<NotificationList> {
    Json(NotificationList {
        status: 200,
        message: "Notifications retrieved successfully".to_string(),
        notifications: state.notifications.list(user.id).await,
    })
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(request): Payload<NewNotification>,
) -> Result<(StatusCode, Json<StatusResponse>), AppError> {
    let notification = state.notifications.create(user.id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(StatusResponse {
            status: StatusCode::CREATED.as_u16(),
            message: "Notification created successfully".to_string(),
            id: Some(notification.id.to_hex()),
        }),
    ))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<StatusResponse> {
    let updated = state.notifications.mark_all_read(user.id).await;
    tracing::debug!(user_id = %user.id, updated, "notifications marked read");
    Json(StatusResponse::ok("All notifications marked as read"))
}

pub async fn clear(State(state): State<AppState>, AuthUser(user): AuthUser) -> Json<StatusResponse> {
    let removed = state.notifications.clear(user.id).await;
    tracing::debug!(user_id = %user.id, removed, "notifications cleared");
    Json(StatusResponse::ok("All notifications cleared"))
}
