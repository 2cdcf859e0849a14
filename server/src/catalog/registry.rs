//! Operation registry.

use dashmap::DashMap;

use mb_common::{Operation, OperationKey};

use super::builtin::builtin_operations;

/// Catalog lookup and registration errors.
///
/// An unknown key is a programmer error at the call site and must fail
/// loudly; there is no allow-by-default path anywhere in the gate or the
/// dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Operation key was never registered.
    #[error("Unknown operation: {0}")]
    Unknown(String),

    /// Operation key is already registered.
    #[error("Operation already registered: {0}")]
    Duplicate(String),

    /// Key does not parse as a dotted operation key.
    #[error(transparent)]
    InvalidKey(#[from] mb_common::Error),
}

/// Registry of named, permission-checked business operations.
///
/// Explicitly constructed and dependency-injected (never ambient global
/// state) so tests can build isolated catalogs.
#[derive(Debug, Default)]
pub struct OperationCatalog {
    ops: DashMap<OperationKey, Operation>,
}

impl OperationCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog populated with the builtin operation table.
    #[must_use]
    pub fn with_builtins() -> Self {
        let catalog = Self::new();
        for op in builtin_operations() {
            // Builtin keys are distinct by construction.
            let _ = catalog.register(op);
        }
        catalog
    }

    /// Register an operation, rejecting duplicate keys.
    pub fn register(&self, op: Operation) -> Result<(), CatalogError> {
        match self.ops.entry(op.key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(existing) => {
                Err(CatalogError::Duplicate(existing.key().to_string()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(op);
                Ok(())
            }
        }
    }

    /// Look up an operation by its raw dotted key.
    pub fn get(&self, key: &str) -> Result<Operation, CatalogError> {
        let key = OperationKey::parse(key)?;
        self.ops
            .get(&key)
            .map(|r| r.value().clone())
            .ok_or_else(|| CatalogError::Unknown(key.to_string()))
    }

    /// Whether a key is registered.
    #[must_use]
    pub fn contains(&self, key: &OperationKey) -> bool {
        self.ops.contains_key(key)
    }

    /// All registered operations, sorted by key.
    #[must_use]
    pub fn list(&self) -> Vec<Operation> {
        let mut ops: Vec<Operation> = self.ops.iter().map(|r| r.value().clone()).collect();
        ops.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        ops
    }

    /// Number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
