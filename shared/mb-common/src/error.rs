//! Common Error Type

use thiserror::Error;

/// Errors shared between server and clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Operation key does not follow the `family.action` dotted form.
    #[error("Invalid operation key: {0}")]
    InvalidOperationKey(String),

    /// Unknown permission type name.
    #[error("Unknown permission type: {0}")]
    UnknownPermissionType(String),

    /// Unknown role name.
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Result type for common operations.
pub type Result<T> = std::result::Result<T, Error>;
