//! Authentication Middleware

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use mb_common::Role;

use crate::api::AppState;
use crate::db::UserRecord;

use super::error::AuthError;
use super::jwt::validate_access_token;

/// Header carrying the shared secret for scheduled job triggers.
pub const SCHEDULER_TOKEN_HEADER: &str = "x-scheduler-token";

/// Authenticated user injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Primitive role.
    pub role: Role,
    /// Assigned permission profile ids.
    pub profile_ids: Vec<Uuid>,
}

impl From<UserRecord> for AuthUser {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            profile_ids: user.profile_ids,
        }
    }
}

/// Middleware to require authentication.
///
/// Extracts the Bearer token, validates it, loads the user from the store,
/// and injects `AuthUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    let claims = validate_access_token(token, &state.config.jwt_secret)?;

    let user_id: Uuid = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

    let user = state
        .db
        .find_user_by_id(&user_id)
        .ok_or(AuthError::UserNotFound)?;

    request.extensions_mut().insert(AuthUser::from(user));

    Ok(next.run(request).await)
}

/// Middleware for scheduler-triggered job endpoints.
///
/// Scheduled sweeps authenticate with a shared secret header, not a user
/// session; there is no `AuthUser` on these requests.
pub async fn require_scheduler_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let provided = request
        .headers()
        .get(SCHEDULER_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::InvalidSchedulerSecret)?;

    if provided != state.config.scheduler_secret {
        return Err(AuthError::InvalidSchedulerSecret);
    }

    Ok(next.run(request).await)
}

/// Extractor for the authenticated user in handlers.
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}
