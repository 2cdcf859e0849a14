//! Shared Type Definitions

pub mod operation;
pub mod permission;
pub mod user;

pub use operation::{Operation, OperationKey};
pub use permission::PermissionTypes;
pub use user::Role;
