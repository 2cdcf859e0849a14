//! Audit log subscriber.
//!
//! Appends one audit entry per emitted event. Append-only and keyed by a
//! fresh id, so re-emission produces a second entry recording the
//! re-emission itself.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::db::{AuditLogEntry, Database};
use crate::events::{BusinessEvent, Subscriber, SubscriberError};

/// Writes the audit trail for every operation event.
pub struct AuditSubscriber {
    db: Database,
}

impl AuditSubscriber {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Subscriber for AuditSubscriber {
    fn name(&self) -> &'static str {
        "audit"
    }

    async fn handle(&self, event: &BusinessEvent) -> Result<(), SubscriberError> {
        let entry = AuditLogEntry {
            id: Uuid::now_v7(),
            actor_id: event.acting_user_id,
            operation: event.operation.to_string(),
            entity_type: event.entity_type.clone(),
            entity_id: event.entity_id.clone(),
            details: event.payload.clone(),
            created_at: Utc::now(),
        };
        self.db.audit_log.insert(entry.id, entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mb_common::OperationKey;

    fn event(key: &str, entity_id: &str) -> BusinessEvent {
        BusinessEvent {
            id: Uuid::now_v7(),
            operation: OperationKey::parse(key).unwrap(),
            entity_type: "payment".to_string(),
            entity_id: entity_id.to_string(),
            payload: serde_json::json!({"amount_cents": 2500}),
            acting_user_id: Some(Uuid::now_v7()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_appends_entry_per_event() {
        let db = Database::new();
        let subscriber = AuditSubscriber::new(db.clone());

        subscriber.handle(&event("payment.approve", "p1")).await.unwrap();
        subscriber.handle(&event("payment.reject", "p2")).await.unwrap();

        assert_eq!(db.audit_log.len(), 2);
        let operations: Vec<String> = db
            .audit_log
            .list()
            .into_iter()
            .map(|e| e.operation)
            .collect();
        assert!(operations.contains(&"payment.approve".to_string()));
        assert!(operations.contains(&"payment.reject".to_string()));
    }
}
