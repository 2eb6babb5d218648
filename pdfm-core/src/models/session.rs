use crate::id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bearer token issued at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// One successful login, kept for activity auditing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginLog {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub name: String,
    pub email: String,
    pub ip_address: String,
    pub user_agent: String,
    pub login_at: DateTime<Utc>,
}

/// Where a login request came from
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: String,
    pub user_agent: String,
}
