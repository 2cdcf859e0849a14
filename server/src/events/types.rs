//! Event types and the subscriber contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use mb_common::OperationKey;

use super::error::{EventError, SubscriberError};

/// Immutable record of an operation having happened on an entity.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessEvent {
    pub id: Uuid,
    pub operation: OperationKey,
    pub entity_type: String,
    pub entity_id: String,
    pub payload: serde_json::Value,
    /// `None` for events emitted by background jobs.
    pub acting_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Delivery outcome of one emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Handed to the background delivery task.
    Pending,
    /// Every matching subscriber completed without error.
    Delivered,
    /// At least one subscriber failed; candidate for the recovery sweep.
    Failed,
}

/// Persisted event plus its delivery status.
///
/// The event itself is never mutated; the status is the only field the
/// dispatcher (or the sweep) updates.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub event: BusinessEvent,
    pub status: DeliveryStatus,
}

/// A handler reacting to emitted events.
///
/// Implementations must be idempotent per `(operation, entity_id)`: the
/// recovery sweep may re-emit an event whose side effect did not land, so
/// every handler checks for its downstream artifact before creating it.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Stable name, used in logs.
    fn name(&self) -> &'static str;

    /// React to one event.
    async fn handle(&self, event: &BusinessEvent) -> Result<(), SubscriberError>;
}

/// What a subscriber listens to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionPattern {
    /// One exact operation key.
    Exact(OperationKey),
    /// Every operation in a family (`payment.*`).
    Family(String),
    /// Every operation (`*`).
    All,
}

impl SubscriptionPattern {
    /// Parse `payment.approve`, `payment.*`, or `*`.
    pub fn parse(raw: &str) -> Result<Self, EventError> {
        if raw == "*" {
            return Ok(Self::All);
        }
        if let Some(family) = raw.strip_suffix(".*") {
            if !family.is_empty() && !family.contains('.') && !family.contains('*') {
                return Ok(Self::Family(family.to_string()));
            }
            return Err(EventError::InvalidPattern(raw.to_string()));
        }
        if raw.contains('*') {
            return Err(EventError::InvalidPattern(raw.to_string()));
        }
        OperationKey::parse(raw)
            .map(Self::Exact)
            .map_err(|_| EventError::InvalidPattern(raw.to_string()))
    }

    /// Whether an operation key matches this pattern.
    #[must_use]
    pub fn matches(&self, operation: &OperationKey) -> bool {
        match self {
            Self::Exact(key) => key == operation,
            Self::Family(family) => operation.family() == family,
            Self::All => true,
        }
    }
}
