//! Authentication.
//!
//! Token issuance lives in an external identity provider; this module only
//! validates bearer tokens, resolves the user record, and injects `AuthUser`
//! into the request. Scheduled jobs authenticate with a shared secret header
//! instead of a session.

pub mod error;
pub mod jwt;
pub mod middleware;

pub use error::{AuthError, AuthResult};
pub use middleware::{require_auth, require_scheduler_secret, AuthUser};
