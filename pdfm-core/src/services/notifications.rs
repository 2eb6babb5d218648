use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::models::{NewNotification, Notification};
use crate::store::Database;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Maximum number of notifications returned by a listing
pub const NOTIFICATION_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct NotificationService {
    db: Arc<Database>,
}

impl NotificationService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The newest notifications of `user_id`
    pub async fn list(&self, user_id: ObjectId) -> Vec<Notification> {
        let mut notifications = self.db.notifications.find(|n| n.user_id == user_id).await;
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(NOTIFICATION_PAGE_SIZE);
        notifications
    }

    /// Create a notification from a client request; type and message are required
    pub async fn create(&self, user_id: ObjectId, request: NewNotification) -> Result<Notification> {
        if request.kind.is_empty() || request.message.is_empty() {
            return Err(Error::InvalidInput(
                "type and message are required".to_string(),
            ));
        }
        Ok(self
            .notify(
                user_id,
                &request.kind,
                &request.message,
                &request.icon,
                &request.file_name,
            )
            .await)
    }

    /// Record a notification on behalf of the service itself
    pub async fn notify(
        &self,
        user_id: ObjectId,
        kind: &str,
        message: &str,
        icon: &str,
        file_name: &str,
    ) -> Notification {
        let notification = Notification {
            id: ObjectId::new(),
            user_id,
            kind: kind.to_string(),
            message: message.to_string(),
            icon: icon.to_string(),
            is_read: false,
            created_at: Utc::now(),
            file_name: file_name.to_string(),
        };
        self.db.notifications.insert(notification.clone()).await;
        debug!(%user_id, kind, "notification created");
        notification
    }

    pub async fn mark_all_read(&self, user_id: ObjectId) -> usize {
        self.db
            .notifications
            .update_many(|n| n.user_id == user_id, |n| n.is_read = true)
            .await
    }

    pub async fn clear(&self, user_id: ObjectId) -> usize {
        self.db
            .notifications
            .delete_many(|n| n.user_id == user_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn service() -> (Arc<Database>, NotificationService) {
        let db = Arc::new(Database::in_memory());
        (Arc::clone(&db), NotificationService::new(db))
    }

    #[tokio::test]
    async fn test_create_requires_type_and_message() {
        let (_, notifications) = service();
        let request = NewNotification {
            kind: "merge".to_string(),
            ..NewNotification::default()
        };
        assert!(matches!(
            notifications.create(ObjectId::new(), request).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_capped() {
        let (db, notifications) = service();
        let user = ObjectId::new();
        let start = Utc::now() - Duration::hours(2);
        for i in 0..60 {
            db.notifications
                .insert(Notification {
                    id: ObjectId::new(),
                    user_id: user,
                    kind: "info".to_string(),
                    message: format!("n{i}"),
                    icon: String::new(),
                    is_read: false,
                    created_at: start + Duration::minutes(i),
                    file_name: String::new(),
                })
                .await;
        }

        let listed = notifications.list(user).await;
        assert_eq!(listed.len(), NOTIFICATION_PAGE_SIZE);
        assert_eq!(listed[0].message, "n59");
        assert_eq!(listed[NOTIFICATION_PAGE_SIZE - 1].message, "n10");
    }

    #[tokio::test]
    async fn test_mark_read_and_clear_are_scoped_to_user() {
        let (_, notifications) = service();
        let alice = ObjectId::new();
        let bob = ObjectId::new();
        notifications.notify(alice, "merge", "merged", "check-circle", "a.pdf").await;
        notifications.notify(alice, "compress", "compressed", "", "").await;
        notifications.notify(bob, "merge", "merged", "", "").await;

        assert_eq!(notifications.mark_all_read(alice).await, 2);
        assert!(notifications.list(alice).await.iter().all(|n| n.is_read));
        assert!(!notifications.list(bob).await[0].is_read);

        assert_eq!(notifications.clear(alice).await, 2);
        assert!(notifications.list(alice).await.is_empty());
        assert_eq!(notifications.list(bob).await.len(), 1);
    }
}
