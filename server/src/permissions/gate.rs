//! Permission gate.
//!
//! Decides, before any handler logic runs, whether an operation may proceed.
//! Both authorization paths (granular grants and legacy role lists) flow
//! through one `evaluate` function so they stay auditable together.

use std::sync::Arc;

use mb_common::{OperationKey, PermissionTypes, Role};

use crate::catalog::{CatalogError, OperationCatalog};

use super::models::PermissionProfile;
use super::resolver::{compute_effective_permissions, PermissionError};

/// One authorization rule, tagged by which path it takes.
#[derive(Debug, Clone)]
pub enum AccessRule {
    /// Granular, catalog-backed check: the caller needs `required` types
    /// granted for `operation`.
    Granular {
        operation: OperationKey,
        required: PermissionTypes,
    },
    /// Legacy allow-list of primitive roles.
    RoleList { roles: Vec<Role> },
}

/// Outcome of a permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Denial reason, for logs and error bodies. `None` when allowed.
    pub reason: Option<String>,
}

impl Decision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// The gate itself: catalog-aware permission decisions.
///
/// Dependency-injected wherever checks happen; tests construct isolated
/// gates over isolated catalogs.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    catalog: Arc<OperationCatalog>,
}

impl PermissionGate {
    /// Create a gate over a catalog.
    #[must_use]
    pub fn new(catalog: Arc<OperationCatalog>) -> Self {
        Self { catalog }
    }

    /// Evaluate one access rule.
    ///
    /// Granular rules fail fast with `UnknownOperation` if the key is not in
    /// the catalog; an unregistered key is never a silent deny or allow.
    pub fn evaluate(
        &self,
        role: Role,
        profiles: &[PermissionProfile],
        rule: &AccessRule,
    ) -> Result<Decision, PermissionError> {
        match rule {
            AccessRule::Granular {
                operation,
                required,
            } => {
                if !self.catalog.contains(operation) {
                    return Err(PermissionError::UnknownOperation(operation.to_string()));
                }
                let effective = compute_effective_permissions(profiles, operation);
                if effective.has(*required) {
                    Ok(Decision::allow())
                } else {
                    Ok(Decision::deny(format!(
                        "Missing permission {required:?} for {operation}"
                    )))
                }
            }
            AccessRule::RoleList { roles } => {
                if roles.contains(&role) {
                    Ok(Decision::allow())
                } else {
                    Ok(Decision::deny(format!("Role {role} is not allowed")))
                }
            }
        }
    }

    /// Granular check for one operation key.
    pub fn check_permission(
        &self,
        role: Role,
        profiles: &[PermissionProfile],
        operation_key: &str,
        required: PermissionTypes,
    ) -> Result<Decision, PermissionError> {
        let operation = self.resolve_key(operation_key)?;
        self.evaluate(
            role,
            profiles,
            &AccessRule::Granular {
                operation,
                required,
            },
        )
    }

    /// Entry-point guard: granular grant OR fallback-role membership allows.
    ///
    /// The catalog is consulted first, so a typo'd operation key fails with
    /// `UnknownOperation` even for callers whose role is in the fallback
    /// list.
    pub fn require_permission(
        &self,
        role: Role,
        profiles: &[PermissionProfile],
        operation_key: &str,
        required: PermissionTypes,
        fallback_roles: &[Role],
    ) -> Result<(), PermissionError> {
        let operation = self.resolve_key(operation_key)?;

        let granular = self.evaluate(
            role,
            profiles,
            &AccessRule::Granular {
                operation: operation.clone(),
                required,
            },
        )?;
        if granular.allowed {
            return Ok(());
        }

        let fallback = self.evaluate(
            role,
            profiles,
            &AccessRule::RoleList {
                roles: fallback_roles.to_vec(),
            },
        )?;
        if fallback.allowed {
            return Ok(());
        }

        Err(PermissionError::MissingPermission {
            operation,
            required,
        })
    }

    fn resolve_key(&self, operation_key: &str) -> Result<OperationKey, PermissionError> {
        match self.catalog.get(operation_key) {
            Ok(op) => Ok(op.key),
            Err(CatalogError::Unknown(key)) => Err(PermissionError::UnknownOperation(key)),
            Err(e) => Err(PermissionError::UnknownOperation(e.to_string())),
        }
    }
}
