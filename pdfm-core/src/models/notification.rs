use crate::id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user activity notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: ObjectId,
    pub user_id: ObjectId,
    /// merge, compress, convert, summary or any client-defined category
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub icon: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub file_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewNotification {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub file_name: String,
}
