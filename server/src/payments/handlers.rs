//! Payment HTTP Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use mb_common::{PermissionTypes, Role};

use crate::api::{ApiError, AppState};
use crate::auth::AuthUser;
use crate::db::{Invoice, Payment, PaymentStatus};

use super::types::{CreatePaymentRequest, RejectPaymentRequest};

/// List payments.
///
/// GET /api/payments
#[tracing::instrument(skip(state))]
pub async fn list_payments(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Payment>>, ApiError> {
    state.require_permission(
        &auth_user,
        "payment.view",
        PermissionTypes::VIEW,
        &[Role::Admin, Role::Manager, Role::Accountant],
    )?;

    let mut payments = state.db.payments.list();
    payments.sort_by_key(|p| p.created_at);
    Ok(Json(payments))
}

/// Register a payment.
///
/// POST /api/payments
#[tracing::instrument(skip(state, request))]
pub async fn create_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    state.require_permission(
        &auth_user,
        "payment.create",
        PermissionTypes::CREATE,
        &[Role::Admin, Role::Manager, Role::Operator],
    )?;
    request.validate()?;

    let payment = Payment {
        id: Uuid::now_v7(),
        contract_id: request.contract_id,
        amount_cents: request.amount_cents,
        method: request.method,
        status: PaymentStatus::Pending,
        created_at: Utc::now(),
        approved_at: None,
        approved_by: None,
        rejection_reason: None,
    };
    state.db.payments.insert(payment.id, payment.clone());

    state.dispatcher.emit(
        "payment.create",
        "payment",
        &payment.id.to_string(),
        serde_json::json!({ "amount_cents": payment.amount_cents }),
        Some(auth_user.id),
    )?;

    Ok((StatusCode::CREATED, Json(payment)))
}

/// Fetch one payment.
///
/// GET /api/payments/{id}
#[tracing::instrument(skip(state))]
pub async fn get_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Payment>, ApiError> {
    state.require_permission(
        &auth_user,
        "payment.view",
        PermissionTypes::VIEW,
        &[Role::Admin, Role::Manager, Role::Accountant],
    )?;

    let payment = state.db.payments.find(&id).ok_or(ApiError::NotFound("payment"))?;
    Ok(Json(payment))
}

/// Approve a pending payment.
///
/// POST /api/payments/{id}/approve
///
/// The response does not wait for downstream side effects: the invoice is
/// generated by the invoicing subscriber after the event is dispatched.
#[tracing::instrument(skip(state))]
pub async fn approve_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Payment>, ApiError> {
    state.require_permission(
        &auth_user,
        "payment.approve",
        PermissionTypes::EXECUTE,
        &[Role::Admin, Role::Manager],
    )?;

    // Check and transition under one lock so concurrent requests cannot
    // both observe Pending.
    let mut transitioned = false;
    let payment = state
        .db
        .payments
        .update(&id, |p| {
            if p.status == PaymentStatus::Pending {
                p.status = PaymentStatus::Approved;
                p.approved_at = Some(Utc::now());
                p.approved_by = Some(auth_user.id);
                transitioned = true;
            }
        })
        .ok_or(ApiError::NotFound("payment"))?;
    if !transitioned {
        return Err(ApiError::InvalidState(format!(
            "payment is already {:?}",
            payment.status
        )));
    }

    state.dispatcher.emit(
        "payment.approve",
        "payment",
        &payment.id.to_string(),
        serde_json::json!({ "amount_cents": payment.amount_cents }),
        Some(auth_user.id),
    )?;

    Ok(Json(payment))
}

/// Reject a pending payment.
///
/// POST /api/payments/{id}/reject
#[tracing::instrument(skip(state, request))]
pub async fn reject_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectPaymentRequest>,
) -> Result<Json<Payment>, ApiError> {
    state.require_permission(
        &auth_user,
        "payment.reject",
        PermissionTypes::EXECUTE,
        &[Role::Admin, Role::Manager],
    )?;
    request.validate()?;

    let mut transitioned = false;
    let payment = state
        .db
        .payments
        .update(&id, |p| {
            if p.status == PaymentStatus::Pending {
                p.status = PaymentStatus::Rejected;
                p.rejection_reason = Some(request.reason.clone());
                transitioned = true;
            }
        })
        .ok_or(ApiError::NotFound("payment"))?;
    if !transitioned {
        return Err(ApiError::InvalidState(format!(
            "payment is already {:?}",
            payment.status
        )));
    }

    state.dispatcher.emit(
        "payment.reject",
        "payment",
        &payment.id.to_string(),
        serde_json::json!({ "reason": request.reason }),
        Some(auth_user.id),
    )?;

    Ok(Json(payment))
}

/// Fetch the invoice generated for a payment.
///
/// GET /api/payments/{id}/invoice
#[tracing::instrument(skip(state))]
pub async fn get_invoice(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    state.require_permission(
        &auth_user,
        "invoice.view",
        PermissionTypes::VIEW,
        &[Role::Admin, Role::Manager, Role::Accountant],
    )?;

    if state.db.payments.find(&id).is_none() {
        return Err(ApiError::NotFound("payment"));
    }
    let invoice = state.db.invoices.find(&id).ok_or(ApiError::NotFound("invoice"))?;
    Ok(Json(invoice))
}
