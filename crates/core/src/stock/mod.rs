//! Stock units and their append-only adjustment ledger.
//!
//! A unit's quantity is never stored. It is the unit's base quantity plus
//! the sum of every adjustment posted against it, and no adjustment may take
//! it below zero.

pub mod error;
pub mod ledger;
pub mod types;
pub mod validation;

#[cfg(test)]
mod ledger_props;

pub use error::StockError;
pub use ledger::StockLedger;
pub use types::{
    AdjustmentDraft, AdjustmentSource, QuantityChange, StockAdjustment, StockType, StockUnit,
};
pub use validation::ReasonRules;
