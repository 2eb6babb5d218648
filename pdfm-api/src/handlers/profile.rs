use super::{MessageResponse, Payload};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Base64 encoded profile photo
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePhoto {
    #[serde(default)]
    pub profile_photo: String,
}

pub async fn upload_photo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(photo): Payload<ProfilePhoto>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .users
        .set_profile_photo(user.id, photo.profile_photo)
        .await?;
    tracing::info!(user_id = %user.id, "profile photo updated");
    Ok(Json(MessageResponse::new("Profile photo updated successfully")))
}

pub async fn get_photo(AuthUser(user): AuthUser) -> Json<ProfilePhoto> {
    Json(ProfilePhoto {
        profile_photo: user.profile_photo,
    })
}
