//! Admin HTTP Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use mb_common::{Operation, OperationKey, PermissionTypes, Role};

use crate::api::{ApiError, AppState};
use crate::auth::AuthUser;
use crate::db::{AuditLogEntry, UserRecord};
use crate::permissions::{PermissionGrant, PermissionProfile};

use super::types::{
    AssignProfilesRequest, CreateProfileRequest, CreateUserRequest, RegisterOperationRequest,
};

/// List the operation catalog.
///
/// GET /api/admin/operations
#[tracing::instrument(skip(state))]
pub async fn list_operations(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Operation>>, ApiError> {
    state.require_permission(
        &auth_user,
        "admin.operations.view",
        PermissionTypes::VIEW,
        &[Role::Admin],
    )?;
    Ok(Json(state.catalog.list()))
}

/// Register a custom operation at runtime.
///
/// POST /api/admin/operations
///
/// The only mutation path into the catalog; duplicate keys come back 409.
#[tracing::instrument(skip(state, request))]
pub async fn register_operation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<RegisterOperationRequest>,
) -> Result<(StatusCode, Json<Operation>), ApiError> {
    state.require_permission(
        &auth_user,
        "admin.operations.register",
        PermissionTypes::CREATE,
        &[Role::Admin],
    )?;
    request.validate()?;

    let required = PermissionTypes::parse(&request.required)?;
    let op = Operation::new(request.key, request.entity, required)?;
    state.catalog.register(op.clone())?;

    state.dispatcher.emit(
        "admin.operations.register",
        "operation",
        op.key.as_str(),
        serde_json::json!({ "required": request.required }),
        Some(auth_user.id),
    )?;

    Ok((StatusCode::CREATED, Json(op)))
}

/// List permission profiles.
///
/// GET /api/admin/profiles
#[tracing::instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<PermissionProfile>>, ApiError> {
    state.require_permission(
        &auth_user,
        "admin.profiles.view",
        PermissionTypes::VIEW,
        &[Role::Admin],
    )?;

    let mut profiles = state.db.profiles.list();
    profiles.sort_by_key(|p| p.created_at);
    Ok(Json(profiles))
}

/// Create a permission profile.
///
/// POST /api/admin/profiles
///
/// Every grant must reference a registered operation; a grant against an
/// unknown key is rejected at write time rather than discovered at check
/// time.
#[tracing::instrument(skip(state, request))]
pub async fn create_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<PermissionProfile>), ApiError> {
    state.require_permission(
        &auth_user,
        "admin.profiles.manage",
        PermissionTypes::EXECUTE,
        &[Role::Admin],
    )?;
    request.validate()?;

    let mut grants = Vec::with_capacity(request.grants.len());
    for grant in &request.grants {
        let operation = OperationKey::parse(grant.operation.clone())?;
        // Caller-supplied key, so a miss is a bad request rather than the
        // wiring failure UnknownOperation signals.
        if !state.catalog.contains(&operation) {
            return Err(ApiError::Validation(format!(
                "unknown operation key: {operation}"
            )));
        }
        let mut types = PermissionTypes::empty();
        for name in &grant.types {
            types |= PermissionTypes::parse(name)?;
        }
        grants.push(PermissionGrant { operation, types });
    }

    let profile = PermissionProfile::new(request.name, grants);
    state.db.profiles.insert(profile.id, profile.clone());

    state.dispatcher.emit(
        "admin.profiles.manage",
        "profile",
        &profile.id.to_string(),
        serde_json::json!({ "name": profile.name }),
        Some(auth_user.id),
    )?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Create a user.
///
/// POST /api/admin/users
#[tracing::instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserRecord>), ApiError> {
    state.require_permission(
        &auth_user,
        "admin.users.manage",
        PermissionTypes::EXECUTE,
        &[Role::Admin],
    )?;
    request.validate()?;

    let taken = !state
        .db
        .users
        .filter(|u| u.username == request.username)
        .is_empty();
    if taken {
        return Err(ApiError::InvalidState(format!(
            "username {} already taken",
            request.username
        )));
    }
    ensure_profiles_exist(&state, &request.profile_ids)?;

    let user = state
        .db
        .create_user(&request.username, request.role, request.profile_ids);

    state.dispatcher.emit(
        "admin.users.manage",
        "user",
        &user.id.to_string(),
        serde_json::json!({ "username": user.username, "role": user.role }),
        Some(auth_user.id),
    )?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Replace a user's profile assignments.
///
/// PUT /api/admin/users/{id}/profiles
#[tracing::instrument(skip(state, request))]
pub async fn assign_profiles(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignProfilesRequest>,
) -> Result<Json<UserRecord>, ApiError> {
    state.require_permission(
        &auth_user,
        "admin.users.manage",
        PermissionTypes::EXECUTE,
        &[Role::Admin],
    )?;
    ensure_profiles_exist(&state, &request.profile_ids)?;

    let user = state
        .db
        .users
        .update(&id, |u| u.profile_ids = request.profile_ids.clone())
        .ok_or(ApiError::NotFound("user"))?;

    state.dispatcher.emit(
        "admin.users.manage",
        "user",
        &user.id.to_string(),
        serde_json::json!({ "profile_ids": user.profile_ids }),
        Some(auth_user.id),
    )?;

    Ok(Json(user))
}

/// Read the audit trail.
///
/// GET /api/admin/audit-log
#[tracing::instrument(skip(state))]
pub async fn list_audit_log(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<AuditLogEntry>>, ApiError> {
    state.require_permission(
        &auth_user,
        "admin.audit.view",
        PermissionTypes::VIEW,
        &[Role::Admin],
    )?;

    let mut entries = state.db.audit_log.list();
    entries.sort_by_key(|e| e.created_at);
    Ok(Json(entries))
}

fn ensure_profiles_exist(state: &AppState, profile_ids: &[Uuid]) -> Result<(), ApiError> {
    for id in profile_ids {
        if state.db.profiles.find(id).is_none() {
            return Err(ApiError::NotFound("profile"));
        }
    }
    Ok(())
}
