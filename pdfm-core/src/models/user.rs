use crate::id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored account.
///
/// The password is kept as submitted and compared by equality at login. It is
/// persisted with the rest of the document but never leaves the service: HTTP
/// responses go through [`UserProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_support: bool,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub merge_count: u32,
    #[serde(default)]
    pub last_merge_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profile_photo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
            is_admin: false,
            is_support: false,
            is_premium: false,
            merge_count: 0,
            last_merge_time: None,
            profile_photo: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Support and premium accounts bypass the merge quota
    pub fn has_unlimited_merges(&self) -> bool {
        self.is_support || self.is_premium
    }
}

/// Public view of a [`User`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_support: bool,
    pub is_premium: bool,
    pub merge_count: u32,
    pub last_merge_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            is_support: user.is_support,
            is_premium: user.is_premium,
            merge_count: user.merge_count,
            last_merge_time: user.last_merge_time,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Self-service registration payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Admin-side account creation payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_support: bool,
    #[serde(default)]
    pub is_premium: bool,
}

/// Full replacement of the editable account fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub is_support: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
