//! Transfer records.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use weft_shared::types::{StockUnitId, TransferId, WarehouseId};

/// Transfer lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Shipped, not yet received.
    #[default]
    InTransit,
    /// Received at the destination.
    Completed,
    /// Called off; shipped stock returned.
    Cancelled,
}

impl TransferStatus {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InTransit => "in_transit",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if no further transition is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One shipped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferItem {
    /// Unit the stock was taken from.
    pub source_unit_id: StockUnitId,
    /// Quantity shipped.
    pub shipped_quantity: Decimal,
}

/// A movement of stock between two warehouses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Unique identifier.
    pub id: TransferId,
    /// Shipping warehouse.
    pub source_warehouse_id: WarehouseId,
    /// Receiving warehouse.
    pub destination_warehouse_id: WarehouseId,
    /// Lifecycle status.
    pub status: TransferStatus,
    /// Set when cancelled.
    pub cancelled_reason: Option<String>,
    /// Shipped lines.
    pub items: Vec<TransferItem>,
}

impl Transfer {
    /// The shipped line for a source unit.
    #[must_use]
    pub fn item(&self, source_unit_id: StockUnitId) -> Option<&TransferItem> {
        self.items
            .iter()
            .find(|item| item.source_unit_id == source_unit_id)
    }
}

/// One received line on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedItem {
    /// Which shipped line this receipt is for.
    pub source_unit_id: StockUnitId,
    /// Unit at the destination that takes the stock.
    pub destination_unit_id: StockUnitId,
    /// Quantity received, at most what was shipped.
    pub received_quantity: Decimal,
}
