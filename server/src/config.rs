//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// JWT signing secret shared with the identity provider
    pub jwt_secret: String,

    /// JWT access token expiry in seconds (default: 900 = 15 min)
    pub jwt_access_expiry: i64,

    /// Shared secret for scheduler-triggered job endpoints
    pub scheduler_secret: String,

    /// Seconds between recovery sweep cycles (default: 3600)
    pub recovery_interval_secs: u64,

    /// Grace period before an approved payment without an invoice is
    /// considered missed (default: 300)
    pub recovery_grace_secs: i64,

    /// Username of the bootstrap admin account (default: "admin")
    pub bootstrap_admin_username: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_access_expiry: env::var("JWT_ACCESS_EXPIRY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900),
            scheduler_secret: env::var("SCHEDULER_SECRET")
                .context("SCHEDULER_SECRET must be set")?,
            recovery_interval_secs: env::var("RECOVERY_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            recovery_grace_secs: env::var("RECOVERY_GRACE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            bootstrap_admin_username: env::var("BOOTSTRAP_ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".into()),
        })
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            jwt_secret: "test-secret".into(),
            jwt_access_expiry: 900,
            scheduler_secret: "test-scheduler-secret".into(),
            recovery_interval_secs: 3600,
            recovery_grace_secs: 0,
            bootstrap_admin_username: "admin".into(),
        }
    }
}
