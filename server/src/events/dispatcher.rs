//! The dispatcher: subscription registry plus emission.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::OperationCatalog;
use crate::db::Database;

use super::error::EventError;
use super::types::{
    BusinessEvent, DeliveryStatus, EventRecord, Subscriber, SubscriptionPattern,
};

/// Process-wide operation event dispatcher.
///
/// Subscriptions are registered once at startup; after that the registry is
/// read-only. The dispatcher holds no locks across subscriber invocations
/// and provides no cross-entity consistency; each delivery is one attempt,
/// with no built-in retry.
pub struct EventDispatcher {
    catalog: Arc<OperationCatalog>,
    db: Database,
    subscriptions: RwLock<Vec<(SubscriptionPattern, Arc<dyn Subscriber>)>>,
}

impl EventDispatcher {
    /// Create a dispatcher with no subscriptions.
    #[must_use]
    pub fn new(catalog: Arc<OperationCatalog>, db: Database) -> Self {
        Self {
            catalog,
            db,
            subscriptions: RwLock::new(Vec::new()),
        }
    }

    /// Register a subscriber for a key, a family wildcard, or `*`.
    pub async fn subscribe(
        &self,
        pattern: &str,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<(), EventError> {
        let pattern = SubscriptionPattern::parse(pattern)?;
        self.subscriptions.write().await.push((pattern, subscriber));
        Ok(())
    }

    /// Emit an event, fire-and-forget.
    ///
    /// Validates the key, persists the event record, and hands delivery to a
    /// background task. Returns the event id as soon as the task is spawned;
    /// the calling handler never awaits subscriber completion.
    pub fn emit(
        self: &Arc<Self>,
        operation_key: &str,
        entity_type: &str,
        entity_id: &str,
        payload: serde_json::Value,
        acting_user_id: Option<Uuid>,
    ) -> Result<Uuid, EventError> {
        let event = self.record(operation_key, entity_type, entity_id, payload, acting_user_id)?;
        let event_id = event.id;

        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            let status = dispatcher.deliver(&event).await;
            dispatcher
                .db
                .events
                .update(&event.id, |r| r.status = status);
        });

        Ok(event_id)
    }

    /// Emit an event and await delivery.
    ///
    /// Used by out-of-band callers (the recovery sweep) where the point is
    /// that the side effect gets its attempt now; request handlers use
    /// [`emit`](Self::emit) instead.
    pub async fn emit_sync(
        self: &Arc<Self>,
        operation_key: &str,
        entity_type: &str,
        entity_id: &str,
        payload: serde_json::Value,
        acting_user_id: Option<Uuid>,
    ) -> Result<(Uuid, DeliveryStatus), EventError> {
        let event = self.record(operation_key, entity_type, entity_id, payload, acting_user_id)?;
        let status = self.deliver(&event).await;
        self.db.events.update(&event.id, |r| r.status = status);
        Ok((event.id, status))
    }

    /// Attempt delivery again for a persisted event.
    ///
    /// Re-delivers the same record rather than emitting a fresh one, so a
    /// persistently failing subscriber does not grow the event log on every
    /// sweep. Returns `None` if the event id is unknown.
    pub async fn redeliver(&self, event_id: &Uuid) -> Option<DeliveryStatus> {
        let record = self.db.events.find(event_id)?;
        let status = self.deliver(&record.event).await;
        self.db.events.update(event_id, |r| r.status = status);
        Some(status)
    }

    /// Validate the key and persist the pending event record.
    fn record(
        &self,
        operation_key: &str,
        entity_type: &str,
        entity_id: &str,
        payload: serde_json::Value,
        acting_user_id: Option<Uuid>,
    ) -> Result<BusinessEvent, EventError> {
        let operation = self.catalog.get(operation_key)?;
        let event = BusinessEvent {
            id: Uuid::now_v7(),
            operation: operation.key,
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            payload,
            acting_user_id,
            created_at: chrono::Utc::now(),
        };
        self.db.events.insert(
            event.id,
            EventRecord {
                event: event.clone(),
                status: DeliveryStatus::Pending,
            },
        );
        Ok(event)
    }

    /// Invoke every matching subscriber, independently.
    ///
    /// Each subscriber runs in its own task, so neither an `Err` return nor
    /// a panic stops siblings or reaches the emitting caller. A panic
    /// surfaces as a `JoinError` and counts as a failed delivery, keeping
    /// the persisted record visible to the recovery sweep.
    async fn deliver(&self, event: &BusinessEvent) -> DeliveryStatus {
        let matching: Vec<Arc<dyn Subscriber>> = self
            .subscriptions
            .read()
            .await
            .iter()
            .filter(|(pattern, _)| pattern.matches(&event.operation))
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();

        if matching.is_empty() {
            return DeliveryStatus::Delivered;
        }

        let attempts: Vec<(&'static str, tokio::task::JoinHandle<bool>)> = matching
            .into_iter()
            .map(|subscriber| {
                let name = subscriber.name();
                let event = event.clone();
                let handle = tokio::spawn(async move {
                    match subscriber.handle(&event).await {
                        Ok(()) => true,
                        Err(err) => {
                            tracing::error!(
                                subscriber = name,
                                operation = %event.operation,
                                entity_id = %event.entity_id,
                                error = %err,
                                "Subscriber failed"
                            );
                            false
                        }
                    }
                });
                (name, handle)
            })
            .collect();

        let outcomes =
            futures::future::join_all(attempts.into_iter().map(|(name, handle)| async move {
                match handle.await {
                    Ok(ok) => ok,
                    Err(err) => {
                        tracing::error!(
                            subscriber = name,
                            operation = %event.operation,
                            entity_id = %event.entity_id,
                            error = %err,
                            "Subscriber panicked"
                        );
                        false
                    }
                }
            }))
            .await;

        if outcomes.iter().all(|ok| *ok) {
            DeliveryStatus::Delivered
        } else {
            DeliveryStatus::Failed
        }
    }
}
