//! # pdfm-api
//!
//! REST API server for the PDFM tools, built on [`pdfm_core`]
//!

pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod state;

mod api;
pub use api::{app, router};
pub use config::Settings;
pub use error::{AppError, ErrorResponse};
pub use state::AppState;

#[cfg(test)]
mod api_tests;
