//! Default event subscribers.

pub mod audit;
pub mod invoicing;

use std::sync::Arc;

use crate::db::Database;
use crate::events::{EventDispatcher, EventError};

pub use audit::AuditSubscriber;
pub use invoicing::InvoicingSubscriber;

/// Wire the default subscribers: audit on everything, invoicing on payment
/// approval.
pub async fn register_default_subscribers(
    dispatcher: &EventDispatcher,
    db: Database,
) -> Result<(), EventError> {
    dispatcher
        .subscribe("*", Arc::new(AuditSubscriber::new(db.clone())))
        .await?;
    dispatcher
        .subscribe("payment.approve", Arc::new(InvoicingSubscriber::new(db)))
        .await?;
    Ok(())
}
