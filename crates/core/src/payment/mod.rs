//! Payment allocation against outstanding invoice balances.
//!
//! This module implements:
//! - Payment and allocation records
//! - The append-only allocation ledger, indexed by invoice and payment
//! - The allocation engine that validates a batch before it is committed
//!
//! An invoice's amount paid is never stored; it is the sum of its committed
//! `against_ref` allocations in the ledger.

pub mod engine;
pub mod error;
pub mod ledger;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::{AllocationEngine, InvoiceSource};
pub use error::PaymentError;
pub use ledger::AllocationLedger;
pub use types::{
    AllocationBatch, AllocationRequest, AllocationTarget, AllocationType, InvoiceBalance, Payment,
    PaymentAllocation, PaymentMode,
};
