//! Display status derivation for orders and invoices.
//!
//! Persisted statuses only record lifecycle decisions (approved, completed,
//! cancelled). What users see additionally depends on the due date, the
//! amount paid and the current time, so it is recomputed on every read and
//! never stored.
//!
//! # Modules
//!
//! - `types` - Persisted and display status enums, badge tones
//! - `service` - The derivation rules

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::StatusDeriver;
pub use types::{BadgeTone, InvoiceDisplayStatus, InvoiceStatus, OrderDisplayStatus, OrderStatus};
