//! Motora Server
//!
//! Back-office core for a motorcycle rental operation: operation catalog,
//! role/profile permission gate, and the operation event dispatcher that
//! decouples side effects (audit, invoicing) from request handlers.

pub mod admin;
pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod events;
pub mod payments;
pub mod permissions;
pub mod recovery;
pub mod subscribers;
