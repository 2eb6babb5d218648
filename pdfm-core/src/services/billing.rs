//! Support payments, invoices and user feedback

use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::models::billing::{INVOICE_STATUS_PAID, PAYMENT_METHOD_QRIS, SUPPORT_PAYMENT_DETAILS};
use crate::models::{Feedback, Invoice, NewFeedback, Payment, User};
use crate::store::Database;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct BillingService {
    db: Arc<Database>,
}

impl BillingService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record a support payment: flag the named account as a supporter and
    /// append a paid invoice.
    pub async fn confirm_payment(&self, payment: Payment) -> Result<Invoice> {
        if payment.amount < 1 {
            return Err(Error::InvalidInput("minimum payment is 1".to_string()));
        }

        let name = payment.name;
        let user = self
            .db
            .users
            .update_one(|u| u.name == name, |u| {
                u.is_support = true;
                u.updated_at = Utc::now();
                u.clone()
            })
            .await
            .ok_or_else(|| Error::NotFound("User".to_string()))?;

        if user.email.is_empty() {
            warn!(user_id = %user.id, "paying user has no email address");
        }

        let invoice = Invoice {
            id: ObjectId::new(),
            name: user.name,
            email: user.email,
            amount: payment.amount,
            status: INVOICE_STATUS_PAID.to_string(),
            details: SUPPORT_PAYMENT_DETAILS.to_string(),
            payment_method: PAYMENT_METHOD_QRIS.to_string(),
            created_at: Utc::now(),
        };
        self.db.invoices.insert(invoice.clone()).await;
        info!(invoice_id = %invoice.id, amount = invoice.amount, "payment confirmed");
        Ok(invoice)
    }

    /// Invoices matching the user's email, or their name when no email is set
    pub async fn invoices_for(&self, user: &User) -> Vec<Invoice> {
        if user.email.is_empty() {
            self.db.invoices.find(|i| i.name == user.name).await
        } else {
            self.db
                .invoices
                .find(|i| i.email == user.email || i.name == user.name)
                .await
        }
    }

    /// Store feedback from `user`; name and email default to the account's
    pub async fn submit_feedback(&self, user: &User, feedback: NewFeedback) -> Result<Feedback> {
        if feedback.message.trim().is_empty() {
            return Err(Error::InvalidInput("message cannot be empty".to_string()));
        }
        if let Some(rating) = feedback.rating {
            if !(1..=5).contains(&rating) {
                return Err(Error::InvalidInput("rating must be between 1 and 5".to_string()));
            }
        }

        let record = Feedback {
            id: ObjectId::new(),
            user_id: user.id,
            name: if feedback.name.is_empty() {
                user.name.clone()
            } else {
                feedback.name
            },
            email: if feedback.email.is_empty() {
                user.email.clone()
            } else {
                feedback.email
            },
            message: feedback.message,
            rating: feedback.rating,
            created_at: Utc::now(),
        };
        self.db.feedback.insert(record.clone()).await;
        info!(feedback_id = %record.id, user_id = %user.id, "feedback received");
        Ok(record)
    }

    pub async fn all_feedback(&self) -> Vec<Feedback> {
        self.db.feedback.all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn setup() -> (Arc<Database>, BillingService, User) {
        let db = Arc::new(Database::in_memory());
        let user = User::new("Test User", "test@example.com", "password123");
        db.users.insert(user.clone()).await;
        let billing = BillingService::new(Arc::clone(&db));
        (db, billing, user)
    }

    fn payment(name: &str, amount: i64) -> Payment {
        Payment {
            name: name.to_string(),
            amount,
        }
    }

    #[tokio::test]
    async fn test_payment_flags_supporter_and_creates_invoice() {
        let (db, billing, user) = setup().await;
        let invoice = billing.confirm_payment(payment("Test User", 100_000)).await.unwrap();
        assert_eq!(invoice.status, "Paid");
        assert_eq!(invoice.payment_method, "QRIS");
        assert_eq!(invoice.email, "test@example.com");

        let stored = db.users.find_one(|u| u.id == user.id).await.unwrap();
        assert!(stored.is_support);
        assert_eq!(billing.invoices_for(&stored).await.len(), 1);
    }

    #[tokio::test]
    async fn test_payment_validation() {
        let (_, billing, _) = setup().await;
        assert!(matches!(
            billing.confirm_payment(payment("Test User", 0)).await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            billing.confirm_payment(payment("Nobody", 10)).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invoices_for_user_without_email_match_by_name() {
        let (db, billing, _) = setup().await;
        let anonymous = User::new("Walk In", "", "pw");
        db.users.insert(anonymous.clone()).await;
        billing.confirm_payment(payment("Walk In", 5)).await.unwrap();
        billing.confirm_payment(payment("Test User", 5)).await.unwrap();

        let invoices = billing.invoices_for(&anonymous).await;
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].name, "Walk In");
    }

    #[tokio::test]
    async fn test_feedback_defaults_identity_from_account() {
        let (_, billing, user) = setup().await;
        let feedback = billing
            .submit_feedback(
                &user,
                NewFeedback {
                    message: "Great merge tool".to_string(),
                    rating: Some(5),
                    ..NewFeedback::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(feedback.name, "Test User");
        assert_eq!(feedback.email, "test@example.com");
        assert_eq!(billing.all_feedback().await.len(), 1);

        let empty = billing.submit_feedback(&user, NewFeedback::default()).await;
        assert!(matches!(empty, Err(Error::InvalidInput(_))));
    }
}
