//! API Router and Application State
//!
//! Central routing configuration and shared state.

pub mod error;

use std::sync::Arc;

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use mb_common::{PermissionTypes, Role};

use crate::{
    admin,
    auth::{self, AuthUser},
    catalog::OperationCatalog,
    config::Config,
    db::Database,
    events::EventDispatcher,
    payments,
    permissions::PermissionGate,
    recovery,
};

pub use error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// In-memory data store
    pub db: Database,
    /// Server configuration
    pub config: Arc<Config>,
    /// Operation catalog
    pub catalog: Arc<OperationCatalog>,
    /// Permission gate over the catalog
    pub gate: PermissionGate,
    /// Operation event dispatcher
    pub dispatcher: Arc<EventDispatcher>,
}

impl AppState {
    /// Create new application state.
    ///
    /// The gate and the dispatcher share the injected catalog; tests can
    /// build fully isolated states.
    #[must_use]
    pub fn new(db: Database, config: Config, catalog: Arc<OperationCatalog>) -> Self {
        let gate = PermissionGate::new(Arc::clone(&catalog));
        let dispatcher = Arc::new(EventDispatcher::new(Arc::clone(&catalog), db.clone()));
        Self {
            db,
            config: Arc::new(config),
            catalog,
            gate,
            dispatcher,
        }
    }

    /// Guard a protected handler: granular check with role-list fallback.
    ///
    /// Loads the caller's profiles and delegates to the gate; the returned
    /// error already carries the right HTTP status.
    pub fn require_permission(
        &self,
        user: &AuthUser,
        operation_key: &str,
        required: PermissionTypes,
        fallback_roles: &[Role],
    ) -> Result<(), ApiError> {
        let profiles = self.db.profiles_for(&user.profile_ids);
        self.gate
            .require_permission(user.role, &profiles, operation_key, required, fallback_roles)
            .map_err(ApiError::from)
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health
async fn health(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Scheduler-triggered jobs authenticate with a shared secret header
    let job_routes = Router::new()
        .route("/api/jobs/recovery", post(recovery::run_recovery))
        .layer(from_fn_with_state(
            state.clone(),
            auth::require_scheduler_secret,
        ));

    // Routes that require an authenticated user
    let protected_routes = Router::new()
        .nest("/api/payments", payments::router())
        .nest("/api/admin", admin::router())
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .route("/health", get(health))
        .merge(protected_routes)
        .merge(job_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
