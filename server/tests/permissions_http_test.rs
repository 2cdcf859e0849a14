//! HTTP tests for the permission gate on protected routes.

mod helpers;

use axum::body::Body;
use axum::http::{Method, StatusCode};
use serde_json::json;

use mb_common::{PermissionTypes, Role};

use helpers::{
    body_to_json, create_grant_profile, create_test_user, generate_access_token, TestApp,
};

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::spawn().await;

    let response = app
        .oneshot(
            TestApp::request(Method::GET, "/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unauthenticated_request_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .oneshot(
            TestApp::request(Method::GET, "/api/payments")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_to_json(response).await;
    assert_eq!(body["error"], "MISSING_AUTH");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .send(Method::GET, "/api/payments", "not-a-real-token")
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_operator_without_grant_gets_forbidden() {
    let app = TestApp::spawn().await;
    let user_id = create_test_user(&app, Role::Mechanic, vec![]);
    let token = generate_access_token(&app, user_id);

    let response = app
        .send_json(
            Method::POST,
            "/api/payments",
            &token,
            json!({
                "contract_id": uuid::Uuid::now_v7(),
                "amount_cents": 15_000,
                "method": "card"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_to_json(response).await;
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_granular_grant_allows_creation() {
    let app = TestApp::spawn().await;
    let profile_id = create_grant_profile(&app, "payment.create", PermissionTypes::CREATE);
    let user_id = create_test_user(&app, Role::Mechanic, vec![profile_id]);
    let token = generate_access_token(&app, user_id);

    let response = app
        .send_json(
            Method::POST,
            "/api/payments",
            &token,
            json!({
                "contract_id": uuid::Uuid::now_v7(),
                "amount_cents": 15_000,
                "method": "card"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["amount_cents"], 15_000);
}

#[tokio::test]
async fn test_fallback_role_allows_without_grant() {
    let app = TestApp::spawn().await;
    // Managers are on the fallback role list for payment creation.
    let user_id = create_test_user(&app, Role::Manager, vec![]);
    let token = generate_access_token(&app, user_id);

    let response = app
        .send_json(
            Method::POST,
            "/api/payments",
            &token,
            json!({
                "contract_id": uuid::Uuid::now_v7(),
                "amount_cents": 8_000,
                "method": "cash"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_operator_cannot_approve_without_grant() {
    let app = TestApp::spawn().await;
    let manager_id = create_test_user(&app, Role::Manager, vec![]);
    let manager_token = generate_access_token(&app, manager_id);
    let operator_id = create_test_user(&app, Role::Operator, vec![]);
    let operator_token = generate_access_token(&app, operator_id);

    let response = app
        .send_json(
            Method::POST,
            "/api/payments",
            &manager_token,
            json!({
                "contract_id": uuid::Uuid::now_v7(),
                "amount_cents": 30_000,
                "method": "transfer"
            }),
        )
        .await;
    let payment_id = body_to_json(response).await["id"].clone();

    let response = app
        .send(
            Method::POST,
            &format!("/api/payments/{}/approve", payment_id.as_str().unwrap()),
            &operator_token,
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_to_json(response).await;
    assert_eq!(body["error"], "FORBIDDEN");
    assert!(body["message"].as_str().unwrap().contains("payment.approve"));

    // The payment is untouched.
    let payment: uuid::Uuid = payment_id.as_str().unwrap().parse().unwrap();
    let stored = app.state.db.payments.find(&payment).unwrap();
    assert_eq!(
        serde_json::to_value(stored.status).unwrap(),
        json!("pending")
    );
}

#[tokio::test]
async fn test_grant_with_wrong_type_is_still_forbidden() {
    let app = TestApp::spawn().await;
    // VIEW on payment.create does not satisfy the CREATE requirement.
    let profile_id = create_grant_profile(&app, "payment.create", PermissionTypes::VIEW);
    let user_id = create_test_user(&app, Role::Mechanic, vec![profile_id]);
    let token = generate_access_token(&app, user_id);

    let response = app
        .send_json(
            Method::POST,
            "/api/payments",
            &token,
            json!({
                "contract_id": uuid::Uuid::now_v7(),
                "amount_cents": 8_000,
                "method": "cash"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_validation_error_returns_bad_request() {
    let app = TestApp::spawn().await;
    let user_id = create_test_user(&app, Role::Manager, vec![]);
    let token = generate_access_token(&app, user_id);

    let response = app
        .send_json(
            Method::POST,
            "/api/payments",
            &token,
            json!({
                "contract_id": uuid::Uuid::now_v7(),
                "amount_cents": 0,
                "method": "cash"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_can_register_operation_and_duplicate_conflicts() {
    let app = TestApp::spawn().await;
    let admin_id = create_test_user(&app, Role::Admin, vec![]);
    let token = generate_access_token(&app, admin_id);

    let request = json!({
        "key": "fleet.winterize",
        "entity": "vehicle",
        "required": "execute"
    });

    let response = app
        .send_json(Method::POST, "/api/admin/operations", &token, request.clone())
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .send_json(Method::POST, "/api/admin/operations", &token, request)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_to_json(response).await;
    assert_eq!(body["error"], "OPERATION_EXISTS");
}

#[tokio::test]
async fn test_non_admin_cannot_register_operation() {
    let app = TestApp::spawn().await;
    let user_id = create_test_user(&app, Role::Operator, vec![]);
    let token = generate_access_token(&app, user_id);

    let response = app
        .send_json(
            Method::POST,
            "/api/admin/operations",
            &token,
            json!({
                "key": "fleet.winterize",
                "entity": "vehicle",
                "required": "execute"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_creation_rejects_unknown_operation() {
    let app = TestApp::spawn().await;
    let admin_id = create_test_user(&app, Role::Admin, vec![]);
    let token = generate_access_token(&app, admin_id);

    let response = app
        .send_json(
            Method::POST,
            "/api/admin/profiles",
            &token,
            json!({
                "name": "ghost-profile",
                "grants": [{ "operation": "phantom.op", "types": ["view"] }]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_to_json(response).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("phantom.op"));
}
