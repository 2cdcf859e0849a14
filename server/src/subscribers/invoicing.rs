//! Invoicing subscriber.
//!
//! Generates the invoice for an approved payment. Safe to invoke any number
//! of times for the same payment: the invoice collection is keyed by payment
//! id and creation is a single conditional insert, so concurrent or repeated
//! deliveries produce exactly one invoice.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::db::{Database, Invoice, PaymentStatus};
use crate::events::{BusinessEvent, Subscriber, SubscriberError};

/// Creates invoices on `payment.approve`.
pub struct InvoicingSubscriber {
    db: Database,
}

impl InvoicingSubscriber {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Subscriber for InvoicingSubscriber {
    fn name(&self) -> &'static str {
        "invoicing"
    }

    async fn handle(&self, event: &BusinessEvent) -> Result<(), SubscriberError> {
        let payment_id: Uuid = event
            .entity_id
            .parse()
            .map_err(|_| SubscriberError::MalformedEvent(event.entity_id.clone()))?;

        let payment = self
            .db
            .payments
            .find(&payment_id)
            .ok_or_else(|| SubscriberError::EntityNotFound(event.entity_id.clone()))?;

        if payment.status != PaymentStatus::Approved {
            return Err(SubscriberError::MalformedEvent(format!(
                "payment {payment_id} is not approved"
            )));
        }

        let created = self.db.invoices.insert_if_absent(payment_id, || Invoice {
            id: Uuid::now_v7(),
            payment_id,
            // Derived from the payment id so re-generation is stable.
            number: format!("INV-{}", &payment_id.simple().to_string()[..12].to_uppercase()),
            amount_cents: payment.amount_cents,
            issued_at: Utc::now(),
        });

        match created {
            Some(invoice) => {
                tracing::info!(
                    payment_id = %payment_id,
                    invoice = %invoice.number,
                    "Invoice generated"
                );
            }
            None => {
                tracing::debug!(payment_id = %payment_id, "Invoice already exists, skipping");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mb_common::OperationKey;

    use crate::db::{Payment, PaymentMethod};

    fn approved_payment(db: &Database) -> Payment {
        let payment = Payment {
            id: Uuid::now_v7(),
            contract_id: None,
            amount_cents: 150_000,
            method: PaymentMethod::Transfer,
            status: PaymentStatus::Approved,
            created_at: Utc::now(),
            approved_at: Some(Utc::now()),
            approved_by: Some(Uuid::now_v7()),
            rejection_reason: None,
        };
        db.payments.insert(payment.id, payment.clone());
        payment
    }

    fn approve_event(payment: &Payment) -> BusinessEvent {
        BusinessEvent {
            id: Uuid::now_v7(),
            operation: OperationKey::parse("payment.approve").unwrap(),
            entity_type: "payment".to_string(),
            entity_id: payment.id.to_string(),
            payload: serde_json::json!({"amount_cents": payment.amount_cents}),
            acting_user_id: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_creates_invoice_for_approved_payment() {
        let db = Database::new();
        let payment = approved_payment(&db);
        let subscriber = InvoicingSubscriber::new(db.clone());

        subscriber.handle(&approve_event(&payment)).await.unwrap();

        let invoice = db.invoices.find(&payment.id).unwrap();
        assert_eq!(invoice.payment_id, payment.id);
        assert_eq!(invoice.amount_cents, 150_000);
        assert!(invoice.number.starts_with("INV-"));
    }

    #[tokio::test]
    async fn test_double_delivery_creates_one_invoice() {
        let db = Database::new();
        let payment = approved_payment(&db);
        let subscriber = InvoicingSubscriber::new(db.clone());

        subscriber.handle(&approve_event(&payment)).await.unwrap();
        subscriber.handle(&approve_event(&payment)).await.unwrap();

        assert_eq!(db.invoices.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_payment_fails() {
        let db = Database::new();
        let subscriber = InvoicingSubscriber::new(db);

        let event = BusinessEvent {
            id: Uuid::now_v7(),
            operation: OperationKey::parse("payment.approve").unwrap(),
            entity_type: "payment".to_string(),
            entity_id: Uuid::now_v7().to_string(),
            payload: serde_json::json!({}),
            acting_user_id: None,
            created_at: Utc::now(),
        };

        let result = subscriber.handle(&event).await;
        assert!(matches!(result, Err(SubscriberError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn test_unapproved_payment_rejected() {
        let db = Database::new();
        let mut payment = approved_payment(&db);
        payment.status = PaymentStatus::Pending;
        db.payments.insert(payment.id, payment.clone());

        let subscriber = InvoicingSubscriber::new(db);
        let result = subscriber.handle(&approve_event(&payment)).await;
        assert!(matches!(result, Err(SubscriberError::MalformedEvent(_))));
    }
}
