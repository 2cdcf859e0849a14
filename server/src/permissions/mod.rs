//! Permission system.
//!
//! Two authorization paths evaluated by one decision function:
//! - Granular: permission profiles grant typed access to catalog operations.
//! - Role list: legacy allow-list of primitive roles, kept for endpoints not
//!   yet migrated to the granular model.

pub mod gate;
pub mod models;
pub mod resolver;

pub use gate::{AccessRule, Decision, PermissionGate};
pub use models::{PermissionGrant, PermissionProfile};
pub use resolver::{compute_effective_permissions, PermissionError};
