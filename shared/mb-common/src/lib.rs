//! Motora Common Library
//!
//! Shared types used by the back-office server and its clients: operation
//! keys, permission flags, roles, and the common error type.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
