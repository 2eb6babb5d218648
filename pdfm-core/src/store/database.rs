use super::Collection;
use crate::error::StoreError;
use crate::models::{
    CompressHistory, ConvertHistory, Feedback, Invoice, LoginLog, MergeHistory, Notification,
    SummaryHistory, Token, User,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// The shared document store.
///
/// Holds one [`Collection`] per document type. When opened with a data file
/// the whole store is loaded from a JSON snapshot and [`Database::flush`]
/// writes it back.
#[derive(Debug)]
pub struct Database {
    pub users: Collection<User>,
    pub tokens: Collection<Token>,
    pub login_logs: Collection<LoginLog>,
    pub merge_history: Collection<MergeHistory>,
    pub compress_history: Collection<CompressHistory>,
    pub convert_history: Collection<ConvertHistory>,
    pub summary_history: Collection<SummaryHistory>,
    pub notifications: Collection<Notification>,
    pub feedback: Collection<Feedback>,
    pub invoices: Collection<Invoice>,
    data_file: Option<PathBuf>,
    flushed_revision: AtomicU64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    tokens: Vec<Token>,
    #[serde(default)]
    login_logs: Vec<LoginLog>,
    #[serde(default)]
    merge_history: Vec<MergeHistory>,
    #[serde(default)]
    compress_history: Vec<CompressHistory>,
    #[serde(default)]
    convert_history: Vec<ConvertHistory>,
    #[serde(default)]
    summary_history: Vec<SummaryHistory>,
    #[serde(default)]
    notifications: Vec<Notification>,
    #[serde(default)]
    feedback: Vec<Feedback>,
    #[serde(default)]
    invoices: Vec<Invoice>,
}

impl Database {
    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::from_snapshot(Snapshot::default(), None)
    }

    /// Open a store backed by `path`, loading it when the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = if path.exists() {
            let bytes = std::fs::read(&path)?;
            let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
            info!(
                path = %path.display(),
                users = snapshot.users.len(),
                "loaded document snapshot"
            );
            snapshot
        } else {
            info!(path = %path.display(), "no snapshot found, starting empty");
            Snapshot::default()
        };
        Ok(Self::from_snapshot(snapshot, Some(path)))
    }

    fn from_snapshot(snapshot: Snapshot, data_file: Option<PathBuf>) -> Self {
        Self {
            users: Collection::with_documents("users", snapshot.users),
            tokens: Collection::with_documents("tokens", snapshot.tokens),
            login_logs: Collection::with_documents("login_logs", snapshot.login_logs),
            merge_history: Collection::with_documents("merge_history", snapshot.merge_history),
            compress_history: Collection::with_documents(
                "compress_history",
                snapshot.compress_history,
            ),
            convert_history: Collection::with_documents(
                "convert_history",
                snapshot.convert_history,
            ),
            summary_history: Collection::with_documents(
                "summary_history",
                snapshot.summary_history,
            ),
            notifications: Collection::with_documents("notifications", snapshot.notifications),
            feedback: Collection::with_documents("feedback", snapshot.feedback),
            invoices: Collection::with_documents("invoices", snapshot.invoices),
            data_file,
            flushed_revision: AtomicU64::new(0),
        }
    }

    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    /// Sum of all collection revisions; changes whenever any document changes
    pub fn revision(&self) -> u64 {
        self.users.revision()
            + self.tokens.revision()
            + self.login_logs.revision()
            + self.merge_history.revision()
            + self.compress_history.revision()
            + self.convert_history.revision()
            + self.summary_history.revision()
            + self.notifications.revision()
            + self.feedback.revision()
            + self.invoices.revision()
    }

    /// Write the snapshot if anything changed since the last flush.
    ///
    /// Returns `true` when a file was written. Stores without a data file
    /// never write.
    pub async fn flush(&self) -> Result<bool, StoreError> {
        let Some(path) = self.data_file.clone() else {
            return Ok(false);
        };

        let revision = self.revision();
        if revision == self.flushed_revision.load(Ordering::Acquire) && path.exists() {
            return Ok(false);
        }

        let snapshot = Snapshot {
            users: self.users.all().await,
            tokens: self.tokens.all().await,
            login_logs: self.login_logs.all().await,
            merge_history: self.merge_history.all().await,
            compress_history: self.compress_history.all().await,
            convert_history: self.convert_history.all().await,
            summary_history: self.summary_history.all().await,
            notifications: self.notifications.all().await,
            feedback: self.feedback.all().await,
            invoices: self.invoices.all().await,
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;

        tokio::task::spawn_blocking(move || write_atomically(&path, &bytes))
            .await
            .map_err(|e| std::io::Error::other(format!("snapshot writer panicked: {e}")))??;

        self.flushed_revision.store(revision, Ordering::Release);
        debug!(revision, "document snapshot written");
        Ok(true)
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_in_memory_flush_is_noop() {
        let db = Database::in_memory();
        db.users.insert(User::new("A", "a@example.com", "pw")).await;
        assert!(!db.flush().await.unwrap());
        assert!(db.data_file().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdfm.json");

        let db = Database::open(&path).unwrap();
        let user = User::new("Test User", "test@example.com", "password123");
        let user_id = user.id;
        db.users.insert(user).await;
        assert!(db.flush().await.unwrap());
        // unchanged store is not rewritten
        assert!(!db.flush().await.unwrap());

        let reopened = Database::open(&path).unwrap();
        let loaded = reopened
            .users
            .find_one(|u| u.email == "test@example.com")
            .await
            .unwrap();
        assert_eq!(loaded.id, user_id);
        assert_eq!(loaded.password, "password123");
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(
            Database::open(&path),
            Err(StoreError::Encoding(_))
        ));
    }
}
