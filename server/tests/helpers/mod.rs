//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full
//! axum router, plus utilities for user creation, grants, and JWT
//! generation. Every test gets a fully isolated state: its own store,
//! catalog, gate, and dispatcher.
#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use mb_common::{OperationKey, PermissionTypes, Role};
use mb_server::api::{create_router, AppState};
use mb_server::auth::jwt;
use mb_server::catalog::OperationCatalog;
use mb_server::config::Config;
use mb_server::db::Database;
use mb_server::permissions::{PermissionGrant, PermissionProfile};
use mb_server::subscribers::register_default_subscribers;

/// A fully wired application over isolated in-memory state.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    /// Build a fresh app with builtin catalog and default subscribers.
    pub async fn spawn() -> Self {
        let config = Config::default_for_test();
        let db = Database::new();
        let catalog = std::sync::Arc::new(OperationCatalog::with_builtins());
        let state = AppState::new(db.clone(), config, catalog);
        register_default_subscribers(&state.dispatcher, db)
            .await
            .expect("subscriber registration");
        let router = create_router(state.clone());
        Self { state, router }
    }

    /// Start a request builder.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send one request through the router.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<axum::body::Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router oneshot")
    }

    /// Convenience: authenticated JSON request.
    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        body: serde_json::Value,
    ) -> Response<axum::body::Body> {
        let request = Self::request(method, uri)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request build");
        self.oneshot(request).await
    }

    /// Convenience: authenticated request without a body.
    pub async fn send(&self, method: Method, uri: &str, token: &str) -> Response<axum::body::Body> {
        let request = Self::request(method, uri)
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request build");
        self.oneshot(request).await
    }
}

/// Collect a response body into JSON.
pub async fn body_to_json(response: Response<axum::body::Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is json")
}

/// Create a user with a role and optional profile assignments.
pub fn create_test_user(app: &TestApp, role: Role, profile_ids: Vec<Uuid>) -> Uuid {
    let username = format!("user-{}", Uuid::now_v7().simple());
    app.state.db.create_user(&username, role, profile_ids).id
}

/// Create a profile granting `types` for one operation key.
pub fn create_grant_profile(app: &TestApp, operation: &str, types: PermissionTypes) -> Uuid {
    let profile = PermissionProfile::new(
        format!("profile-{operation}"),
        vec![PermissionGrant {
            operation: OperationKey::parse(operation).expect("valid key"),
            types,
        }],
    );
    app.state.db.profiles.insert(profile.id, profile.clone());
    profile.id
}

/// Generate a valid access token for a user.
pub fn generate_access_token(app: &TestApp, user_id: Uuid) -> String {
    jwt::generate_access_token(
        user_id,
        &app.state.config.jwt_secret,
        app.state.config.jwt_access_expiry,
    )
    .expect("token generation")
}

/// Poll until `check` passes or the timeout elapses.
///
/// Used for fire-and-forget deliveries: the HTTP response returns before
/// subscribers run, so tests wait for the side effect instead of the
/// response.
pub async fn wait_for(check: impl Fn() -> bool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}
