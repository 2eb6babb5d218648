//! Registration, login and bearer-token sessions

use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::models::{ClientInfo, Credentials, LoginLog, Registration, Token, User};
use crate::store::Database;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const BEARER_PREFIX: &str = "Bearer ";

/// Default lifetime of a login token
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Extract the token from an `Authorization` header value.
///
/// A missing header and a malformed one are distinguished because logout
/// answers them with different statuses.
pub fn bearer_token(header: Option<&str>) -> std::result::Result<&str, BearerError> {
    let header = header.ok_or(BearerError::Missing)?;
    match header.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(BearerError::Malformed),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerError {
    Missing,
    Malformed,
}

impl From<BearerError> for Error {
    fn from(err: BearerError) -> Self {
        match err {
            BearerError::Missing => Error::Unauthorized("missing token".to_string()),
            BearerError::Malformed => Error::Unauthorized("invalid token format".to_string()),
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: Token,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct SessionService {
    db: Arc<Database>,
    token_ttl: Duration,
}

impl SessionService {
    pub fn new(db: Arc<Database>, token_ttl: Duration) -> Self {
        Self { db, token_ttl }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Create an account from the public sign-up form
    pub async fn register(&self, registration: Registration) -> Result<User> {
        let Registration {
            name,
            email,
            password,
        } = registration;
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(Error::InvalidInput(
                "name, email and password are required".to_string(),
            ));
        }

        let email = email.trim().to_string();
        let user = User::new(name.trim(), email.as_str(), password);
        if !self.db.users.insert_unless(user.clone(), |u| u.email == email).await {
            return Err(Error::Conflict("email already exists".to_string()));
        }
        info!(user_id = %user.id, "registered new user");
        Ok(user)
    }

    /// Check credentials and issue a token.
    ///
    /// The login log is written in the background so a slow store does not
    /// delay the response.
    pub async fn login(&self, credentials: Credentials, client: ClientInfo) -> Result<LoginOutcome> {
        let Credentials { email, password } = credentials;
        let email = email.trim();
        let user = self
            .db
            .users
            .find_one(|u| u.email == email && u.password == password)
            .await
            .ok_or_else(|| Error::Unauthorized("email or password is incorrect".to_string()))?;

        let token = Token {
            token: uuid::Uuid::new_v4().to_string(),
            email: user.email.clone(),
            expires_at: Utc::now() + self.token_ttl,
        };
        self.db.tokens.insert(token.clone()).await;

        let log = LoginLog {
            id: ObjectId::new(),
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            ip_address: client.ip_address,
            user_agent: client.user_agent,
            login_at: Utc::now(),
        };
        let db = Arc::clone(&self.db);
        tokio::spawn(async move {
            db.login_logs.insert(log).await;
        });

        info!(user_id = %user.id, "user logged in");
        Ok(LoginOutcome { token, user })
    }

    /// Revoke a token; returns whether it existed
    pub async fn logout(&self, token: &str) -> bool {
        let removed = self.db.tokens.delete_one(|t| t.token == token).await;
        debug!(found = removed.is_some(), "logout");
        removed.is_some()
    }

    /// Resolve a bearer token to its user
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let stored = self
            .db
            .tokens
            .find_one(|t| t.token == token)
            .await
            .ok_or_else(|| Error::Unauthorized("invalid token".to_string()))?;

        if stored.is_expired_at(Utc::now()) {
            self.db.tokens.delete_one(|t| t.token == token).await;
            return Err(Error::Unauthorized("token expired".to_string()));
        }

        self.db
            .users
            .find_one(|u| u.email == stored.email)
            .await
            .ok_or_else(|| {
                warn!(email = %stored.email, "token refers to a missing user");
                Error::Unauthorized("user not found".to_string())
            })
    }

    /// Delete every expired token; returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let removed = self.db.tokens.delete_many(|t| t.is_expired_at(now)).await;
        if removed > 0 {
            debug!(removed, "purged expired tokens");
        }
        removed
    }
}

/// Fail with `Forbidden` unless `user` is an administrator
pub fn require_admin(user: &User) -> Result<()> {
    if user.is_admin {
        Ok(())
    } else {
        Err(Error::Forbidden("admin access required".to_string()))
    }
}
