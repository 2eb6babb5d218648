use thiserror::Error;

/// Errors raised by the domain services.
///
/// Each variant corresponds to one HTTP status class at the API edge, so the
/// message is written for the client.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Merge limit reached: {limit} merges per {window_secs}s window")]
    MergeLimitReached { limit: u32, window_secs: i64 },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Failures of the snapshot layer underneath the in-memory collections.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Failed to persist snapshot: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::NotFound("User".to_string()).to_string(),
            "User not found"
        );
        assert_eq!(
            Error::MergeLimitReached {
                limit: 3,
                window_secs: 3600
            }
            .to_string(),
            "Merge limit reached: 3 merges per 3600s window"
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error: Error = StoreError::from(io_error).into();
        assert!(matches!(error, Error::Storage(StoreError::Io(_))));
        assert!(error.to_string().contains("read-only"));
    }
}
