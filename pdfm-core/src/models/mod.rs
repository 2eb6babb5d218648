//! Stored documents and request payloads

pub mod billing;
pub mod history;
pub mod notification;
pub mod session;
pub mod user;

pub use billing::{Feedback, Invoice, NewFeedback, Payment};
pub use history::{
    CompressHistory, CompressLog, ConvertHistory, ConvertLog, HistoryItem, HistoryKind,
    MergeHistory, MergeLog, SummaryHistory, SummaryLog,
};
pub use notification::{NewNotification, Notification};
pub use session::{ClientInfo, LoginLog, Token};
pub use user::{Credentials, NewUser, Registration, User, UserProfile, UserUpdate};
