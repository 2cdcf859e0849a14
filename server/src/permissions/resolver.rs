//! Effective permission resolution.
//!
//! Computes the union of grant types a user's profiles give for one
//! operation key.

use mb_common::{OperationKey, PermissionTypes};

use super::models::PermissionProfile;

/// Compute the effective permission types for an operation.
///
/// The result is the union of grants across all assigned profiles. There is
/// no deny concept: a profile that omits an operation contributes nothing,
/// it never subtracts from what another profile grants.
#[must_use]
pub fn compute_effective_permissions(
    profiles: &[PermissionProfile],
    operation: &OperationKey,
) -> PermissionTypes {
    profiles
        .iter()
        .fold(PermissionTypes::empty(), |acc, profile| {
            acc | profile.granted_types(operation)
        })
}

/// Permission check errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// Identity resolved but lacks the required permission type.
    MissingPermission {
        operation: OperationKey,
        required: PermissionTypes,
    },

    /// Operation key was never registered in the catalog.
    ///
    /// Programmer error at the call site; surfaces loudly instead of
    /// passing as a deny or an allow.
    UnknownOperation(String),
}

impl std::fmt::Display for PermissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPermission {
                operation,
                required,
            } => write!(f, "Missing permission {required:?} for {operation}"),
            Self::UnknownOperation(key) => write!(f, "Unknown operation: {key}"),
        }
    }
}

impl std::error::Error for PermissionError {}
