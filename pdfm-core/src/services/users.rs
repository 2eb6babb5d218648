//! Account administration and profile management

use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::models::{NewUser, User, UserUpdate};
use crate::store::{Database, Guarded};
use chrono::Utc;
use regex::RegexBuilder;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct UserService {
    db: Arc<Database>,
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Vec<User> {
        self.db.users.all().await
    }

    pub async fn get(&self, id: ObjectId) -> Result<User> {
        self.db
            .users
            .find_one(|u| u.id == id)
            .await
            .ok_or_else(|| Error::NotFound("User".to_string()))
    }

    /// Look a user up by id, or failing that by a case-insensitive name
    /// pattern. At least one of the two must be supplied.
    pub async fn lookup(&self, id: Option<&str>, name: Option<&str>) -> Result<User> {
        if let Some(id) = id.filter(|s| !s.is_empty()) {
            return self.get(ObjectId::parse_str(id)?).await;
        }

        let name = name
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidInput("missing user identifier".to_string()))?;
        let pattern = RegexBuilder::new(name)
            .case_insensitive(true)
            .size_limit(1 << 16)
            .build()
            .map_err(|e| Error::InvalidInput(format!("invalid name pattern: {e}")))?;

        self.db
            .users
            .find_one(|u| pattern.is_match(&u.name))
            .await
            .ok_or_else(|| Error::NotFound("User".to_string()))
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        if new_user.name.trim().is_empty() || new_user.email.trim().is_empty() {
            return Err(Error::InvalidInput(
                "name and email cannot be empty".to_string(),
            ));
        }
        let mut user = User::new(
            new_user.name.trim(),
            new_user.email.trim(),
            new_user.password,
        );
        user.is_admin = new_user.is_admin;
        user.is_support = new_user.is_support;
        user.is_premium = new_user.is_premium;

        let email = user.email.clone();
        if !self.db.users.insert_unless(user.clone(), |u| u.email == email).await {
            return Err(Error::Conflict("email already exists".to_string()));
        }
        info!(user_id = %user.id, "created user");
        Ok(user)
    }

    pub async fn update(&self, update: UserUpdate) -> Result<User> {
        if update.id.is_empty() {
            return Err(Error::InvalidInput("user ID is required".to_string()));
        }
        let id = ObjectId::parse_str(&update.id)?;
        if update.name.trim().is_empty() || update.email.trim().is_empty() {
            return Err(Error::InvalidInput(
                "name and email cannot be empty".to_string(),
            ));
        }

        let UserUpdate {
            name,
            email,
            password,
            is_support,
            ..
        } = update;
        let email = email.trim().to_string();
        let taken = email.clone();
        let outcome = self
            .db
            .users
            .update_one_unless(
                |u| u.id == id,
                |u| u.email == taken,
                move |u| {
                    u.name = name.trim().to_string();
                    u.email = email;
                    u.password = password;
                    u.is_support = is_support;
                    u.updated_at = Utc::now();
                    u.clone()
                },
            )
            .await;
        let updated = match outcome {
            Guarded::Applied(user) => user,
            Guarded::Conflict => {
                return Err(Error::Conflict("email already exists".to_string()));
            }
            Guarded::Missing => return Err(Error::NotFound("User".to_string())),
        };
        info!(user_id = %id, "updated user");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = ObjectId::parse_str(id)?;
        self.db
            .users
            .delete_one(|u| u.id == id)
            .await
            .ok_or_else(|| Error::NotFound("User".to_string()))?;
        info!(user_id = %id, "deleted user");
        Ok(())
    }

    /// Replace the base64 profile photo of `user_id`
    pub async fn set_profile_photo(&self, user_id: ObjectId, photo: String) -> Result<()> {
        if photo.is_empty() {
            return Err(Error::InvalidInput("profile photo is required".to_string()));
        }
        self.db
            .users
            .update_one(|u| u.id == user_id, move |u| {
                u.profile_photo = photo;
                u.updated_at = Utc::now();
            })
            .await
            .ok_or_else(|| Error::NotFound("User".to_string()))
    }

    /// Make sure an administrator account exists for `email`.
    ///
    /// An existing account with that email is promoted; otherwise one is
    /// created with the given password.
    pub async fn ensure_admin(&self, name: &str, email: &str, password: &str) -> User {
        let promoted = self
            .db
            .users
            .update_one(|u| u.email == email, |u| {
                u.is_admin = true;
                u.updated_at = Utc::now();
                u.clone()
            })
            .await;
        if let Some(user) = promoted {
            return user;
        }

        let mut admin = User::new(name, email, password);
        admin.is_admin = true;
        self.db.users.insert(admin.clone()).await;
        info!(user_id = %admin.id, "bootstrapped admin account");
        admin
    }
}
