//! Operation event dispatcher.
//!
//! In-process publish mechanism: handlers record "operation X happened on
//! entity Y" and decoupled subscribers (audit, invoicing) react without
//! living inside the handler. Delivery is fire-and-forget relative to the
//! HTTP response; retries belong to the recovery sweep, not the dispatcher.

pub mod dispatcher;
pub mod error;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use error::{EventError, SubscriberError};
pub use types::{
    BusinessEvent, DeliveryStatus, EventRecord, Subscriber, SubscriptionPattern,
};
