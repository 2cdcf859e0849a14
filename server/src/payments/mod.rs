//! Payment endpoints.
//!
//! The worked business surface: every handler runs the permission gate
//! first, mutates the store, then emits the operation event for decoupled
//! side effects (audit, invoicing).

pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;

use crate::api::AppState;

/// Payment routes, nested under `/api/payments`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_payments).post(handlers::create_payment))
        .route("/{id}", get(handlers::get_payment))
        .route("/{id}/approve", post(handlers::approve_payment))
        .route("/{id}/reject", post(handlers::reject_payment))
        .route("/{id}/invoice", get(handlers::get_invoice))
}
