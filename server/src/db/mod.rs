//! In-memory data store.
//!
//! The relational engine behind the original back office is an external
//! collaborator; the core only consumes a narrow read/write contract. This
//! module provides that contract over concurrent in-memory collections.

pub mod collection;
pub mod models;

use chrono::Utc;
use uuid::Uuid;

use mb_common::Role;

use crate::events::types::EventRecord;
use crate::permissions::models::PermissionProfile;

pub use collection::Collection;
pub use models::{AuditLogEntry, Invoice, Payment, PaymentMethod, PaymentStatus, UserRecord};

/// All store collections. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct Database {
    pub users: Collection<UserRecord>,
    pub profiles: Collection<PermissionProfile>,
    pub payments: Collection<Payment>,
    /// Keyed by payment id (one invoice per payment).
    pub invoices: Collection<Invoice>,
    pub audit_log: Collection<AuditLogEntry>,
    pub events: Collection<EventRecord>,
}

impl Database {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a user and return the stored record.
    pub fn create_user(&self, username: &str, role: Role, profile_ids: Vec<Uuid>) -> UserRecord {
        let user = UserRecord {
            id: Uuid::now_v7(),
            username: username.to_string(),
            role,
            profile_ids,
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        user
    }

    /// Find a user by id.
    #[must_use]
    pub fn find_user_by_id(&self, id: &Uuid) -> Option<UserRecord> {
        self.users.find(id)
    }

    /// Load the permission profiles behind a set of assignment ids.
    #[must_use]
    pub fn profiles_for(&self, profile_ids: &[Uuid]) -> Vec<PermissionProfile> {
        profile_ids
            .iter()
            .filter_map(|id| self.profiles.find(id))
            .collect()
    }
}
