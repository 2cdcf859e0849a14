//! Operation identifiers and catalog metadata.
//!
//! An operation is a named, permission-checked business action. Keys are
//! hierarchical dotted strings (`payment.approve`, `admin.operations.register`)
//! where the first segment is the family and the last is the action.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::permission::PermissionTypes;

/// A validated dotted operation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationKey(String);

impl OperationKey {
    /// Parse and validate an operation key.
    ///
    /// Keys must have at least two non-empty, lowercase, dot-separated
    /// segments (letters, digits, `_`, `-`).
    pub fn parse(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() < 2 {
            return Err(Error::InvalidOperationKey(raw));
        }
        let valid_segment = |s: &&str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        };
        if !segments.iter().all(valid_segment) {
            return Err(Error::InvalidOperationKey(raw));
        }
        Ok(Self(raw))
    }

    /// The full dotted key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First segment of the key (e.g. `payment` in `payment.approve`).
    #[must_use]
    pub fn family(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// Last segment of the key (e.g. `approve` in `payment.approve`).
    #[must_use]
    pub fn action(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for OperationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog entry for a registered operation.
///
/// Immutable once registered; the catalog rejects duplicate keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Stable dotted identifier.
    pub key: OperationKey,
    /// Business family (`payment`, `fleet`, ...).
    pub family: String,
    /// Entity type the operation acts on.
    pub entity: String,
    /// Action name.
    pub action: String,
    /// Permission type a caller must hold for this operation.
    pub required: PermissionTypes,
}

impl Operation {
    /// Build an operation from a raw key, entity type, and required type.
    ///
    /// Family and action are derived from the key segments.
    pub fn new(
        key: impl Into<String>,
        entity: impl Into<String>,
        required: PermissionTypes,
    ) -> Result<Self, Error> {
        let key = OperationKey::parse(key)?;
        let family = key.family().to_string();
        let action = key.action().to_string();
        Ok(Self {
            key,
            family,
            entity: entity.into(),
            action,
            required,
        })
    }
}
