//! Store models shared across domain modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mb_common::Role;

/// Back-office user account.
///
/// Token issuance lives in an external identity provider; this record only
/// carries what the permission gate needs: the primitive role and the
/// assigned permission profiles.
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub profile_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Audit log entry, one per emitted business event.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub operation: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Payment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Registered, awaiting review.
    Pending,
    /// Approved; an invoice is expected downstream.
    Approved,
    /// Rejected with a reason.
    Rejected,
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

/// Rental payment record.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: Uuid,
    /// Rental contract this payment belongs to, if linked.
    pub contract_id: Option<Uuid>,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
}

/// Invoice generated for an approved payment.
///
/// Stored keyed by `payment_id`, which is what makes invoice generation
/// idempotent: the conditional insert on that key either creates the one
/// invoice or observes it already exists.
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub number: String,
    pub amount_cents: i64,
    pub issued_at: DateTime<Utc>,
}
