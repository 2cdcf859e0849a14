//! Recovery sweep.
//!
//! Out-of-band job that re-emits events instead of mutating state directly:
//! approved payments past the grace period with no invoice get their
//! `payment.approve` event emitted again, and persisted events whose
//! delivery failed are re-delivered. Correctness under concurrent traffic
//! rests entirely on subscriber idempotence.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::api::AppState;
use crate::db::{Database, PaymentStatus};
use crate::events::{DeliveryStatus, EventDispatcher};

/// Counts from one sweep cycle.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RecoveryReport {
    /// Approved payments with a missing invoice whose event was re-emitted.
    pub payments_reemitted: usize,
    /// Previously failed events that delivered on this attempt.
    pub events_redelivered: usize,
    /// Events that failed again.
    pub events_still_failing: usize,
}

/// Execute one recovery cycle.
#[tracing::instrument(skip(db, dispatcher))]
pub async fn run_recovery_cycle(
    db: &Database,
    dispatcher: &Arc<EventDispatcher>,
    grace_secs: i64,
) -> RecoveryReport {
    let start = Instant::now();
    let mut report = RecoveryReport::default();
    let cutoff = Utc::now() - chrono::Duration::seconds(grace_secs);

    // Approved payments whose expected invoice never landed.
    let missed = db.payments.filter(|p| {
        p.status == PaymentStatus::Approved
            && p.approved_at.is_some_and(|at| at <= cutoff)
            && db.invoices.find(&p.id).is_none()
    });

    for payment in missed {
        let result = dispatcher
            .emit_sync(
                "payment.approve",
                "payment",
                &payment.id.to_string(),
                serde_json::json!({ "amount_cents": payment.amount_cents, "reemitted": true }),
                None,
            )
            .await;
        match result {
            Ok(_) => report.payments_reemitted += 1,
            Err(err) => {
                tracing::error!(payment_id = %payment.id, error = %err, "Re-emission failed");
            }
        }
    }

    // Events whose last delivery attempt failed. Re-delivered in place so
    // the event log does not grow on every sweep.
    let failed = db
        .events
        .filter(|r| r.status == DeliveryStatus::Failed);
    for record in failed {
        match dispatcher.redeliver(&record.event.id).await {
            Some(DeliveryStatus::Delivered) => report.events_redelivered += 1,
            Some(_) => report.events_still_failing += 1,
            None => {}
        }
    }

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        payments_reemitted = report.payments_reemitted,
        events_redelivered = report.events_redelivered,
        events_still_failing = report.events_still_failing,
        "Recovery cycle completed"
    );

    report
}

/// Start the periodic recovery background task.
///
/// The first tick is consumed immediately so a cycle does not run during
/// startup. The returned `JoinHandle` is stored alongside other background
/// task handles in `main`.
pub fn spawn_recovery_task(
    db: Database,
    dispatcher: Arc<EventDispatcher>,
    interval_secs: u64,
    grace_secs: i64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.tick().await; // consume immediate first tick
        loop {
            interval.tick().await;
            run_recovery_cycle(&db, &dispatcher, grace_secs).await;
        }
    })
}

/// Scheduler-triggered sweep.
///
/// POST /api/jobs/recovery
#[tracing::instrument(skip(state))]
pub async fn run_recovery(State(state): State<AppState>) -> Json<RecoveryReport> {
    let report = run_recovery_cycle(
        &state.db,
        &state.dispatcher,
        state.config.recovery_grace_secs,
    )
    .await;
    Json(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::catalog::OperationCatalog;
    use crate::db::{Payment, PaymentMethod};
    use crate::subscribers::register_default_subscribers;

    async fn setup() -> (Database, Arc<EventDispatcher>) {
        let db = Database::new();
        let catalog = Arc::new(OperationCatalog::with_builtins());
        let dispatcher = Arc::new(EventDispatcher::new(catalog, db.clone()));
        register_default_subscribers(&dispatcher, db.clone())
            .await
            .unwrap();
        (db, dispatcher)
    }

    fn approved_payment(db: &Database) -> Payment {
        let payment = Payment {
            id: Uuid::now_v7(),
            contract_id: None,
            amount_cents: 90_000,
            method: PaymentMethod::Cash,
            status: PaymentStatus::Approved,
            created_at: Utc::now(),
            approved_at: Some(Utc::now() - chrono::Duration::seconds(600)),
            approved_by: Some(Uuid::now_v7()),
            rejection_reason: None,
        };
        db.payments.insert(payment.id, payment.clone());
        payment
    }

    #[tokio::test]
    async fn test_sweep_creates_missing_invoice() {
        let (db, dispatcher) = setup().await;
        let payment = approved_payment(&db);
        assert!(db.invoices.find(&payment.id).is_none());

        let report = run_recovery_cycle(&db, &dispatcher, 300).await;

        assert_eq!(report.payments_reemitted, 1);
        assert!(db.invoices.find(&payment.id).is_some());
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let (db, dispatcher) = setup().await;
        let payment = approved_payment(&db);

        run_recovery_cycle(&db, &dispatcher, 300).await;
        let second = run_recovery_cycle(&db, &dispatcher, 300).await;

        assert_eq!(second.payments_reemitted, 0);
        assert_eq!(db.invoices.find(&payment.id).into_iter().count(), 1);
        assert_eq!(db.invoices.len(), 1);
    }

    #[tokio::test]
    async fn test_sweep_respects_grace_period() {
        let (db, dispatcher) = setup().await;
        let payment = Payment {
            approved_at: Some(Utc::now()),
            ..approved_payment(&db)
        };
        db.payments.insert(payment.id, payment.clone());

        let report = run_recovery_cycle(&db, &dispatcher, 3600).await;

        assert_eq!(report.payments_reemitted, 0);
        assert!(db.invoices.find(&payment.id).is_none());
    }

    #[tokio::test]
    async fn test_sweep_skips_pending_and_rejected() {
        let (db, dispatcher) = setup().await;
        let mut pending = approved_payment(&db);
        pending.status = PaymentStatus::Pending;
        db.payments.insert(pending.id, pending);

        let mut rejected = approved_payment(&db);
        rejected.status = PaymentStatus::Rejected;
        db.payments.insert(rejected.id, rejected);

        let report = run_recovery_cycle(&db, &dispatcher, 0).await;

        assert_eq!(report.payments_reemitted, 0);
        assert!(db.invoices.is_empty());
    }
}
