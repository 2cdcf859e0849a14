//! Event Error Types

use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors surfaced to `emit`/`subscribe` callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// Emitted key was never registered in the catalog.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Subscription pattern is neither a key, a family wildcard, nor `*`.
    #[error("Invalid subscription pattern: {0}")]
    InvalidPattern(String),
}

impl From<CatalogError> for EventError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unknown(key) => Self::UnknownOperation(key),
            CatalogError::Duplicate(key) => Self::UnknownOperation(key),
            CatalogError::InvalidKey(e) => Self::UnknownOperation(e.to_string()),
        }
    }
}

/// A subscriber's failure, isolated per subscriber.
///
/// Never propagated to the emitting request; logged with operation key and
/// entity id so the sweep (or an operator) can re-emit.
#[derive(Debug, Error)]
pub enum SubscriberError {
    /// Event payload or entity reference was not usable.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Referenced entity missing from the store.
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Anything else the side effect ran into.
    #[error("{0}")]
    Other(String),
}
