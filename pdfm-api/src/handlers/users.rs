use super::{MessageResponse, Payload, QueryParams};
use crate::auth::{AdminUser, AuthUser};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use pdfm_core::models::{NewUser, UserProfile, UserUpdate};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct UserLookup {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(default)]
    pub id: String,
}

/// The caller's own profile
pub async fn get_current(AuthUser(user): AuthUser) -> Json<UserProfile> {
    Json(UserProfile::from(user))
}

pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<Vec<UserProfile>> {
    let users = state.users.list().await;
    Json(users.iter().map(UserProfile::from).collect())
}

pub async fn get_one(
    State(state): State<AppState>,
    _admin: AdminUser,
    QueryParams(lookup): QueryParams<UserLookup>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .users
        .lookup(lookup.id.as_deref(), lookup.name.as_deref())
        .await?;
    Ok(Json(UserProfile::from(user)))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    Payload(new_user): Payload<NewUser>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let user = state.users.create(new_user).await?;
    Ok((StatusCode::CREATED, Json(UserProfile::from(user))))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    Payload(update): Payload<UserUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state.users.update(update).await?;
    Ok(Json(UserProfile::from(user)))
}

pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    Payload(request): Payload<DeleteUserRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.users.delete(&request.id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
