//! # pdfm-core
//!
//! Domain layer of the PDFM backend, a service behind a set of browser PDF
//! tools.
//!
//! ## Features
//!
//! - **Accounts**: registration, administration and profile photos
//! - **Sessions**: opaque bearer tokens with a fixed lifetime and a login audit log
//! - **History**: merge, compress, convert and summary logs with a unified timeline
//! - **Notifications**: per-user feed with read and clear operations
//! - **Billing**: support payments, invoices and feedback
//! - **Merging**: PDF merging through `oxidize-pdf`, gated by a per-window quota
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfm_core::models::{Credentials, Registration};
//! use pdfm_core::services::{SessionService, DEFAULT_TOKEN_TTL_HOURS};
//! use pdfm_core::store::Database;
//! use std::sync::Arc;
//!
//! # async fn run() -> pdfm_core::Result<()> {
//! let db = Arc::new(Database::in_memory());
//! let sessions = SessionService::new(db, chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS));
//!
//! sessions
//!     .register(Registration {
//!         name: "Ada".to_string(),
//!         email: "ada@example.com".to_string(),
//!         password: "secret".to_string(),
//!     })
//!     .await?;
//! let login = sessions
//!     .login(
//!         Credentials {
//!             email: "ada@example.com".to_string(),
//!             password: "secret".to_string(),
//!         },
//!         Default::default(),
//!     )
//!     .await?;
//! let user = sessions.authenticate(&login.token.token).await?;
//! assert_eq!(user.name, "Ada");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod id;
pub mod models;
pub mod services;
pub mod store;

pub use error::{Error, Result, StoreError};
pub use id::ObjectId;
