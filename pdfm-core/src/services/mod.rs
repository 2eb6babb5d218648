//! Application services
//!
//! Each service wraps the shared [`Database`](crate::store::Database) and
//! carries the rules for one area of the backend. Services are cheap to clone.

mod billing;
mod history;
mod merge;
mod notifications;
mod sessions;
mod users;

pub use billing::BillingService;
pub use history::HistoryService;
pub use merge::{
    Allowance, MergePolicy, MergeService, MergedPdf, Reservation, DEFAULT_FREE_MERGE_LIMIT,
    DEFAULT_MERGE_WINDOW_SECS, MIN_MERGE_INPUTS,
};
pub use notifications::{NotificationService, NOTIFICATION_PAGE_SIZE};
pub use sessions::{
    bearer_token, require_admin, BearerError, LoginOutcome, SessionService, BEARER_PREFIX,
    DEFAULT_TOKEN_TTL_HOURS,
};
pub use users::UserService;
