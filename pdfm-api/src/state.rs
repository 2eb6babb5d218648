use crate::config::Settings;
use pdfm_core::services::{
    BillingService, HistoryService, MergeService, NotificationService, SessionService, UserService,
};
use pdfm_core::store::Database;
use std::sync::Arc;

/// Shared handler state: one database handle and the services built on it
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub sessions: SessionService,
    pub users: UserService,
    pub history: HistoryService,
    pub notifications: NotificationService,
    pub billing: BillingService,
    pub merge: MergeService,
}

impl AppState {
    pub fn new(db: Arc<Database>, settings: &Settings) -> Self {
        Self {
            sessions: SessionService::new(Arc::clone(&db), settings.token_ttl()),
            users: UserService::new(Arc::clone(&db)),
            history: HistoryService::new(Arc::clone(&db)),
            notifications: NotificationService::new(Arc::clone(&db)),
            billing: BillingService::new(Arc::clone(&db)),
            merge: MergeService::new(Arc::clone(&db), settings.merge_policy()),
            db,
        }
    }

    /// Fresh in-memory state with default settings
    pub fn in_memory() -> Self {
        Self::in_memory_with(&Settings::default())
    }

    pub fn in_memory_with(settings: &Settings) -> Self {
        Self::new(Arc::new(Database::in_memory()), settings)
    }
}
