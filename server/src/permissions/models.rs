//! Permission profile models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use mb_common::{OperationKey, PermissionTypes};

/// One grant row: an operation key and the permission types it allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionGrant {
    pub operation: OperationKey,
    pub types: PermissionTypes,
}

/// Named bundle of grants assigned to users.
///
/// A user may hold several profiles; effective permission for an operation is
/// the union of grant types across all of them. Absence of a grant in one
/// profile never narrows what another profile allows.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionProfile {
    pub id: Uuid,
    pub name: String,
    pub grants: Vec<PermissionGrant>,
    pub created_at: DateTime<Utc>,
}

impl PermissionProfile {
    /// Build a profile from grant rows.
    #[must_use]
    pub fn new(name: impl Into<String>, grants: Vec<PermissionGrant>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            grants,
            created_at: Utc::now(),
        }
    }

    /// Types this profile grants for an operation key.
    #[must_use]
    pub fn granted_types(&self, operation: &OperationKey) -> PermissionTypes {
        self.grants
            .iter()
            .filter(|g| &g.operation == operation)
            .fold(PermissionTypes::empty(), |acc, g| acc | g.types)
    }
}
