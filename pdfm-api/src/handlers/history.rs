use super::{MessageResponse, Payload, StatusResponse};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use pdfm_core::models::{
    CompressHistory, CompressLog, ConvertHistory, ConvertLog, HistoryItem, HistoryKind,
    MergeHistory, MergeLog, SummaryHistory, SummaryLog,
};
use serde::{Deserialize, Serialize};

/// Unified timeline across all operation kinds
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub status: u16,
    pub message: String,
    pub history: Vec<HistoryItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteHistoryRequest {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

pub async fn log_merge(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(log): Payload<MergeLog>,
) -> Json<MessageResponse> {
    let record = state.history.log_merge(user.id, log).await;
    Json(MessageResponse::with_id("Merge log saved", record.id))
}

pub async fn list_merges(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<Vec<MergeHistory>> {
    Json(state.history.merges(user.id).await)
}

pub async fn log_compress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(log): Payload<CompressLog>,
) -> Json<MessageResponse> {
    let record = state.history.log_compress(user.id, log).await;
    Json(MessageResponse::with_id("Compress log saved", record.id))
}

pub async fn list_compressions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<Vec<CompressHistory>> {
    Json(state.history.compressions(user.id).await)
}

pub async fn log_convert(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(log): Payload<ConvertLog>,
) -> Json<MessageResponse> {
    let record = state.history.log_convert(user.id, log).await;
    Json(MessageResponse::with_id("Convert log saved", record.id))
}

pub async fn list_conversions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<Vec<ConvertHistory>> {
    Json(state.history.conversions(user.id).await)
}

pub async fn log_summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(log): Payload<SummaryLog>,
) -> Json<MessageResponse> {
    let record = state.history.log_summary(user.id, log).await;
    Json(MessageResponse::with_id("Summary log saved", record.id))
}

pub async fn list_summaries(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<Vec<SummaryHistory>> {
    Json(state.history.summaries(user.id).await)
}

pub async fn all(State(state): State<AppState>, AuthUser(user): AuthUser) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        status: 200,
        message: "History retrieved successfully".to_string(),
        history: state.history.all(user.id).await,
    })
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(request): Payload<DeleteHistoryRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    if request.id.is_empty() || request.kind.is_empty() {
        return Err(AppError::BadRequest("ID and type are required".to_string()));
    }
    let kind: HistoryKind = request.kind.parse()?;
    state.history.delete(user.id, kind, &request.id).await?;
    Ok(Json(StatusResponse::ok("History deleted successfully")))
}
