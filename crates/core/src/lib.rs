//! Core business logic for Weft.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Callers load raw records, hand them to these functions, and persist whatever
//! validated mutation comes back.
//!
//! # Modules
//!
//! - `context` - Explicit request context (acting user, warehouse, clock)
//! - `finance` - Discount, GST and currency rounding math
//! - `status` - Display status derivation for orders and invoices
//! - `order` - Order and invoice records and their lifecycle transitions
//! - `payment` - Payment allocation against outstanding invoice balances
//! - `stock` - Append-only stock adjustment ledger
//! - `transfer` - Inter-warehouse transfer lifecycle

pub mod context;
pub mod finance;
pub mod order;
pub mod payment;
mod reason;
pub mod status;
pub mod stock;
pub mod transfer;

pub use context::{Clock, FixedClock, RequestContext, SystemClock};
