//! Quota-gated PDF merging
//!
//! Free accounts get a small number of merges per time window; support and
//! premium accounts are unlimited. The quota check and the counter update run
//! inside one store update so concurrent requests cannot both take the last
//! slot. The merge itself is done by `oxidize-pdf` through temporary files.

use super::NotificationService;
use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::models::User;
use crate::store::Database;
use chrono::{DateTime, Duration, Utc};
use oxidize_pdf::operations::{merge_pdfs, MergeInput, MergeOptions};
use oxidize_pdf::parser::{PdfDocument, PdfReader};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub const DEFAULT_FREE_MERGE_LIMIT: u32 = 3;
pub const DEFAULT_MERGE_WINDOW_SECS: i64 = 3600;

/// Minimum number of documents a merge needs
pub const MIN_MERGE_INPUTS: usize = 2;

/// Merge allowance for accounts without the support or premium flag
#[derive(Debug, Clone, Copy)]
pub struct MergePolicy {
    pub free_limit: u32,
    pub window: Duration,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            free_limit: DEFAULT_FREE_MERGE_LIMIT,
            window: Duration::seconds(DEFAULT_MERGE_WINDOW_SECS),
        }
    }
}

/// What is left of a user's allowance after a merge was admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allowance {
    Unlimited,
    Remaining(u32),
}

impl MergePolicy {
    /// Admit one merge for `user` at `now`, updating its counters.
    ///
    /// The counter restarts once `window` has passed since the previous merge.
    pub fn admit(&self, user: &mut User, now: DateTime<Utc>) -> Result<Allowance> {
        let window_elapsed = user
            .last_merge_time
            .map_or(true, |last| now - last >= self.window);
        if window_elapsed {
            user.merge_count = 0;
        }

        if user.has_unlimited_merges() {
            user.merge_count = user.merge_count.saturating_add(1);
            user.last_merge_time = Some(now);
            return Ok(Allowance::Unlimited);
        }

        if user.merge_count >= self.free_limit {
            return Err(Error::MergeLimitReached {
                limit: self.free_limit,
                window_secs: self.window.num_seconds(),
            });
        }

        user.merge_count += 1;
        user.last_merge_time = Some(now);
        Ok(Allowance::Remaining(self.free_limit - user.merge_count))
    }
}

/// A merge slot held by one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub allowance: Allowance,
    reserved_at: DateTime<Utc>,
    previous_merge: Option<DateTime<Utc>>,
}

/// A finished merge
#[derive(Debug, Clone)]
pub struct MergedPdf {
    pub bytes: Vec<u8>,
    pub files_merged: usize,
    pub total_pages: u32,
    pub allowance: Allowance,
}

#[derive(Debug, Clone)]
pub struct MergeService {
    db: Arc<Database>,
    notifications: NotificationService,
    policy: MergePolicy,
}

impl MergeService {
    pub fn new(db: Arc<Database>, policy: MergePolicy) -> Self {
        let notifications = NotificationService::new(Arc::clone(&db));
        Self {
            db,
            notifications,
            policy,
        }
    }

    /// Take one merge slot for `user_id`
    pub async fn reserve(&self, user_id: ObjectId) -> Result<Reservation> {
        let policy = self.policy;
        let now = Utc::now();
        self.db
            .users
            .update_one(|u| u.id == user_id, |u| {
                let previous_merge = u.last_merge_time;
                policy.admit(u, now).map(|allowance| Reservation {
                    allowance,
                    reserved_at: now,
                    previous_merge,
                })
            })
            .await
            .ok_or_else(|| Error::NotFound("User".to_string()))?
    }

    /// Hand back a slot taken by [`MergeService::reserve`].
    ///
    /// The window anchor moves back to the previous merge unless a later
    /// reservation has replaced it since.
    pub async fn release(&self, user_id: ObjectId, reservation: Reservation) {
        self.db
            .users
            .update_one(|u| u.id == user_id, |u| {
                u.merge_count = u.merge_count.saturating_sub(1);
                if u.last_merge_time == Some(reservation.reserved_at) {
                    u.last_merge_time = reservation.previous_merge;
                }
            })
            .await;
    }

    /// Validate, gate and merge `files` for `user`.
    ///
    /// Inputs are checked before a slot is taken so a bad upload never costs
    /// quota; a slot taken for a merge that then fails is released.
    pub async fn merge_for(
        &self,
        user: &User,
        files: Vec<Vec<u8>>,
        options: MergeOptions,
    ) -> Result<MergedPdf> {
        if files.len() < MIN_MERGE_INPUTS {
            return Err(Error::InvalidInput(format!(
                "at least {MIN_MERGE_INPUTS} PDF files are required for merging"
            )));
        }

        let files = Arc::new(files);
        let total_pages = {
            let files = Arc::clone(&files);
            run_blocking(move || count_pages(&files)).await?
        };

        let reservation = self.reserve(user.id).await?;
        debug!(user_id = %user.id, allowance = ?reservation.allowance, "merge slot reserved");

        let merged = {
            let files = Arc::clone(&files);
            run_blocking(move || merge_documents(&files, options)).await
        };
        let bytes = match merged {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "merge failed, releasing slot");
                self.release(user.id, reservation).await;
                return Err(e);
            }
        };

        let files_merged = files.len();
        self.notifications
            .notify(
                user.id,
                "merge",
                &format!("Merged {files_merged} PDF files"),
                "check-circle",
                "merged.pdf",
            )
            .await;
        info!(
            user_id = %user.id,
            files_merged,
            total_pages,
            output_size = bytes.len(),
            "PDFs merged"
        );

        Ok(MergedPdf {
            bytes,
            files_merged,
            total_pages,
            allowance: reservation.allowance,
        })
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| Error::Pdf(format!("merge worker failed: {e}")))?
}

/// Parse every input and return the total page count
fn count_pages(files: &[Vec<u8>]) -> Result<u32> {
    let mut total = 0u32;
    for (i, data) in files.iter().enumerate() {
        let reader = PdfReader::new(Cursor::new(data.as_slice()))
            .map_err(|e| Error::InvalidInput(format!("file {} is not a valid PDF: {e:?}", i + 1)))?;
        let document = PdfDocument::new(reader);
        let pages = document
            .page_count()
            .map_err(|e| Error::InvalidInput(format!("file {} is not a valid PDF: {e:?}", i + 1)))?;
        total = total.saturating_add(pages);
    }
    Ok(total)
}

/// Merge the inputs in order and return the resulting document bytes
fn merge_documents(files: &[Vec<u8>], options: MergeOptions) -> Result<Vec<u8>> {
    let mut temp_files = Vec::with_capacity(files.len());
    let mut inputs = Vec::with_capacity(files.len());

    for (i, data) in files.iter().enumerate() {
        let temp_file = NamedTempFile::new()
            .map_err(|e| Error::Pdf(format!("failed to create temp file {i}: {e}")))?;
        std::fs::write(temp_file.path(), data)
            .map_err(|e| Error::Pdf(format!("failed to write temp file {i}: {e}")))?;
        inputs.push(MergeInput::new(temp_file.path()));
        temp_files.push(temp_file);
    }

    let output = NamedTempFile::new()
        .map_err(|e| Error::Pdf(format!("failed to create output temp file: {e}")))?;
    merge_pdfs(inputs, output.path(), options)
        .map_err(|e| Error::Pdf(format!("failed to merge PDFs: {e}")))?;

    std::fs::read(output.path())
        .map_err(|e| Error::Pdf(format!("failed to read output file: {e}")))
}
