//! Admin endpoints: catalog registration, permission profiles, users, audit.

pub mod handlers;
pub mod types;

use axum::routing::{get, post, put};
use axum::Router;

use crate::api::AppState;

/// Admin routes, nested under `/api/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/operations",
            get(handlers::list_operations).post(handlers::register_operation),
        )
        .route(
            "/profiles",
            get(handlers::list_profiles).post(handlers::create_profile),
        )
        .route("/users", post(handlers::create_user))
        .route("/users/{id}/profiles", put(handlers::assign_profiles))
        .route("/audit-log", get(handlers::list_audit_log))
}
