//! Orders and invoices: records and lifecycle transitions.

pub mod error;
pub mod service;
pub mod types;

pub use error::LifecycleError;
pub use service::{InvoiceLifecycle, OrderLifecycle, StatusChange};
pub use types::{Invoice, Order, OrderKind};
