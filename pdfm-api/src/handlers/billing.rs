//! Support payments, invoices and feedback

use super::{MessageResponse, Payload};
use crate::auth::{AdminUser, AuthUser};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use pdfm_core::models::{Feedback, Invoice, NewFeedback, Payment};
use pdfm_core::ObjectId;
use serde::{Deserialize, Serialize};

/// Receipt for a confirmed payment
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub message: String,
    pub invoice_id: ObjectId,
    pub invoice_date: DateTime<Utc>,
    pub amount_paid: i64,
}

pub async fn confirm_payment(
    State(state): State<AppState>,
    Payload(payment): Payload<Payment>,
) -> Result<Json<PaymentReceipt>, AppError> {
    let invoice = state.billing.confirm_payment(payment).await?;
    Ok(Json(PaymentReceipt {
        message: "Payment received, thank you!".to_string(),
        invoice_id: invoice.id,
        invoice_date: invoice.created_at,
        amount_paid: invoice.amount,
    }))
}

pub async fn invoices(State(state): State<AppState>, AuthUser(user): AuthUser) -> Json<Vec<Invoice>> {
    Json(state.billing.invoices_for(&user).await)
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Payload(feedback): Payload<NewFeedback>,
) -> Result<Json<MessageResponse>, AppError> {
    let record = state.billing.submit_feedback(&user, feedback).await?;
    Ok(Json(MessageResponse::with_id(
        "Thank you for your feedback!",
        record.id,
    )))
}

pub async fn list_feedback(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<Vec<Feedback>> {
    Json(state.billing.all_feedback().await)
}
