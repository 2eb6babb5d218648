use crate::id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const INVOICE_STATUS_PAID: &str = "Paid";
pub const SUPPORT_PAYMENT_DETAILS: &str = "Support Payment";
pub const PAYMENT_METHOD_QRIS: &str = "QRIS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub amount: i64,
    pub status: String,
    pub details: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

/// A support payment made on behalf of the account named `name`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: i64,
}

/// Feedback submitted through the contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFeedback {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rating: Option<u8>,
}
