//! Serializable image of the whole store.

use serde::{Deserialize, Serialize};
use weft_core::order::{Invoice, Order};
use weft_core::payment::{Payment, PaymentAllocation};
use weft_core::stock::{StockAdjustment, StockUnit};
use weft_core::transfer::Transfer;

use crate::error::StoreError;

/// Every record the store holds, in commit order where order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Sales and purchase orders.
    pub orders: Vec<Order>,
    /// Invoices.
    pub invoices: Vec<Invoice>,
    /// Payments.
    pub payments: Vec<Payment>,
    /// Allocation log, oldest first.
    pub allocations: Vec<PaymentAllocation>,
    /// Stock units.
    pub stock_units: Vec<StockUnit>,
    /// Adjustment log, oldest first.
    pub adjustments: Vec<StockAdjustment>,
    /// Transfers.
    pub transfers: Vec<Transfer>,
}

impl Snapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Renders the snapshot as pretty JSON.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
