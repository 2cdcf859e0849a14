//! Operation catalog.
//!
//! Central registry mapping dotted operation keys to their metadata and
//! required permission type. Populated from the builtin table at startup;
//! runtime additions go through the same `register` path and are rejected
//! on key collision.

pub mod builtin;
pub mod registry;

pub use builtin::builtin_operations;
pub use registry::{CatalogError, OperationCatalog};
