use clap::Parser;
use pdfm_core::services::{
    MergePolicy, DEFAULT_FREE_MERGE_LIMIT, DEFAULT_MERGE_WINDOW_SECS, DEFAULT_TOKEN_TTL_HOURS,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Front-end origins served by default
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 6] = [
    "https://www.bukupedia.co.id",
    "https://naskah.bukupedia.co.id",
    "https://bukupedia.co.id",
    "https://pdfmulbi.github.io",
    "http://127.0.0.1:5500",
    "http://localhost:5500",
];

pub const DEFAULT_SNAPSHOT_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 50;

/// Server settings, read from flags with environment fallbacks
#[derive(Debug, Clone, Parser)]
#[command(name = "pdfm-api")]
#[command(about = "REST API server for the PDFM tools", long_about = None)]
#[command(version)]
pub struct Settings {
    /// Address to listen on
    #[arg(long, env = "PDFM_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Comma separated list of origins allowed to call the API
    #[arg(
        long,
        env = "PDFM_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_values = DEFAULT_ALLOWED_ORIGINS
    )]
    pub allowed_origins: Vec<String>,

    /// JSON snapshot file; without it all data lives in memory only
    #[arg(long, env = "PDFM_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Seconds between snapshot writes and expired-token sweeps
    #[arg(long, env = "PDFM_SNAPSHOT_INTERVAL_SECS", default_value_t = DEFAULT_SNAPSHOT_INTERVAL_SECS)]
    pub snapshot_interval_secs: u64,

    /// Lifetime of a login token in hours
    #[arg(long, env = "PDFM_TOKEN_TTL_HOURS", default_value_t = DEFAULT_TOKEN_TTL_HOURS)]
    pub token_ttl_hours: i64,

    /// Merges a free account may run per window
    #[arg(long, env = "PDFM_FREE_MERGE_LIMIT", default_value_t = DEFAULT_FREE_MERGE_LIMIT)]
    pub free_merge_limit: u32,

    /// Length of the merge window in seconds
    #[arg(long, env = "PDFM_MERGE_WINDOW_SECS", default_value_t = DEFAULT_MERGE_WINDOW_SECS)]
    pub merge_window_secs: i64,

    /// Largest accepted request body in MiB
    #[arg(long, env = "PDFM_MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    pub max_upload_mb: usize,

    /// Email of an administrator account to ensure at startup
    #[arg(long, env = "PDFM_ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Password for a newly created administrator account
    #[arg(long, env = "PDFM_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Display name for a newly created administrator account
    #[arg(long, env = "PDFM_ADMIN_NAME", default_value = "Administrator")]
    pub admin_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.map(String::from).to_vec(),
            data_file: None,
            snapshot_interval_secs: DEFAULT_SNAPSHOT_INTERVAL_SECS,
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            free_merge_limit: DEFAULT_FREE_MERGE_LIMIT,
            merge_window_secs: DEFAULT_MERGE_WINDOW_SECS,
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            admin_email: None,
            admin_password: None,
            admin_name: "Administrator".to_string(),
        }
    }
}

impl Settings {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }

    pub fn merge_policy(&self) -> MergePolicy {
        MergePolicy {
            free_limit: self.free_merge_limit,
            window: chrono::Duration::seconds(self.merge_window_secs),
        }
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot_interval_secs.max(1))
    }

    pub fn body_limit(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Administrator to bootstrap, when both email and password are set
    pub fn admin_account(&self) -> Option<(&str, &str, &str)> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((self.admin_name.as_str(), email, password))
            }
            _ => None,
        }
    }
}
