//! Payment request types.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::db::PaymentMethod;

/// Body for POST /api/payments.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    /// Rental contract the payment belongs to, if any.
    pub contract_id: Option<Uuid>,
    /// Amount in cents; must be positive.
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    pub method: PaymentMethod,
}

/// Body for POST /api/payments/{id}/reject.
#[derive(Debug, Deserialize, Validate)]
pub struct RejectPaymentRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}
