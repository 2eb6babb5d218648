//! Operation history: per-kind logs and the unified, newest-first view

use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::models::{
    CompressHistory, CompressLog, ConvertHistory, ConvertLog, HistoryItem, HistoryKind,
    MergeHistory, MergeLog, SummaryHistory, SummaryLog,
};
use crate::store::Database;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HistoryService {
    db: Arc<Database>,
}

impl HistoryService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn log_merge(&self, user_id: ObjectId, log: MergeLog) -> MergeHistory {
        let record = MergeHistory {
            id: ObjectId::new(),
            user_id,
            input_files: log.input_files,
            output_file: log.output_file,
            created_at: Utc::now(),
        };
        self.db.merge_history.insert(record.clone()).await;
        debug!(%user_id, id = %record.id, "merge logged");
        record
    }

    pub async fn log_compress(&self, user_id: ObjectId, log: CompressLog) -> CompressHistory {
        let record = CompressHistory {
            id: ObjectId::new(),
            user_id,
            file_name: log.file_name,
            original_size: log.original_size,
            compressed_size: log.compressed_size,
            status: log.status,
            created_at: Utc::now(),
        };
        self.db.compress_history.insert(record.clone()).await;
        debug!(%user_id, id = %record.id, "compress logged");
        record
    }

    pub async fn log_convert(&self, user_id: ObjectId, log: ConvertLog) -> ConvertHistory {
        let record = ConvertHistory {
            id: ObjectId::new(),
            user_id,
            file_name: log.file_name,
            source_format: log.source_format,
            target_format: log.target_format,
            created_at: Utc::now(),
        };
        self.db.convert_history.insert(record.clone()).await;
        debug!(%user_id, id = %record.id, "convert logged");
        record
    }

    pub async fn log_summary(&self, user_id: ObjectId, log: SummaryLog) -> SummaryHistory {
        let record = SummaryHistory {
            id: ObjectId::new(),
            user_id,
            file_name: log.file_name,
            summary_text: log.summary_text,
            language: log.language,
            created_at: Utc::now(),
        };
        self.db.summary_history.insert(record.clone()).await;
        debug!(%user_id, id = %record.id, "summary logged");
        record
    }

    pub async fn merges(&self, user_id: ObjectId) -> Vec<MergeHistory> {
        self.db.merge_history.find(|r| r.user_id == user_id).await
    }

    pub async fn compressions(&self, user_id: ObjectId) -> Vec<CompressHistory> {
        self.db.compress_history.find(|r| r.user_id == user_id).await
    }

    pub async fn conversions(&self, user_id: ObjectId) -> Vec<ConvertHistory> {
        self.db.convert_history.find(|r| r.user_id == user_id).await
    }

    pub async fn summaries(&self, user_id: ObjectId) -> Vec<SummaryHistory> {
        self.db.summary_history.find(|r| r.user_id == user_id).await
    }

    /// Every record of `user_id` across the four logs, newest first
    pub async fn all(&self, user_id: ObjectId) -> Vec<HistoryItem> {
        let mut items: Vec<HistoryItem> = Vec::new();
        items.extend(self.merges(user_id).await.iter().map(HistoryItem::from));
        items.extend(self.compressions(user_id).await.iter().map(HistoryItem::from));
        items.extend(self.conversions(user_id).await.iter().map(HistoryItem::from));
        items.extend(self.summaries(user_id).await.iter().map(HistoryItem::from));

        // stable sort: ties keep kind order then insertion order
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }

    /// Delete one record owned by `user_id`
    pub async fn delete(&self, user_id: ObjectId, kind: HistoryKind, id: &str) -> Result<()> {
        let id = ObjectId::parse_str(id)?;
        let deleted = match kind {
            HistoryKind::Merge => self
                .db
                .merge_history
                .delete_one(|r| r.id == id && r.user_id == user_id)
                .await
                .is_some(),
            HistoryKind::Compress => self
                .db
                .compress_history
                .delete_one(|r| r.id == id && r.user_id == user_id)
                .await
                .is_some(),
            HistoryKind::Convert => self
                .db
                .convert_history
                .delete_one(|r| r.id == id && r.user_id == user_id)
                .await
                .is_some(),
            HistoryKind::Summary => self
                .db
                .summary_history
                .delete_one(|r| r.id == id && r.user_id == user_id)
                .await
                .is_some(),
        };

        if deleted {
            debug!(%user_id, %id, %kind, "history item deleted");
            Ok(())
        } else {
            Err(Error::NotFound("History item".to_string()))
        }
    }
}
