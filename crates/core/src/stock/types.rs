//! Stock unit and adjustment records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use weft_shared::types::{AdjustmentId, StockUnitId, TransferId, UserId, WarehouseId};

/// How a stock unit is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockType {
    /// A roll of fabric, measured in metres.
    Roll,
    /// A dyed or woven batch.
    Batch,
    /// Counted pieces.
    Piece,
}

impl StockType {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roll => "roll",
            Self::Batch => "batch",
            Self::Piece => "piece",
        }
    }
}

/// A physical unit of stock in one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUnit {
    /// Unique identifier.
    pub id: StockUnitId,
    /// Owning warehouse.
    pub warehouse_id: WarehouseId,
    /// Roll, batch or piece.
    pub stock_type: StockType,
    /// Human-facing sequence within the warehouse.
    pub sequence_number: u32,
    /// Quantity at creation.
    pub base_quantity: Decimal,
}

/// What caused an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "transfer_id", rename_all = "snake_case")]
pub enum AdjustmentSource {
    /// Entered by hand: wastage, found stock, recount.
    #[default]
    Manual,
    /// Stock leaving a source unit on dispatch.
    TransferDispatch(TransferId),
    /// Stock arriving at a destination unit.
    TransferReceipt(TransferId),
    /// Shipped stock returned to its source unit.
    TransferCancellation(TransferId),
}

impl AdjustmentSource {
    /// The transfer behind this adjustment, if any.
    #[must_use]
    pub fn transfer_id(&self) -> Option<TransferId> {
        match self {
            Self::Manual => None,
            Self::TransferDispatch(id)
            | Self::TransferReceipt(id)
            | Self::TransferCancellation(id) => Some(*id),
        }
    }
}

/// A committed, immutable quantity correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// Unique identifier.
    pub id: AdjustmentId,
    /// Adjusted unit.
    pub stock_unit_id: StockUnitId,
    /// Signed change, never zero.
    pub quantity_adjusted: Decimal,
    /// Trimmed reason.
    pub reason: String,
    /// Business date of the adjustment.
    pub adjustment_date: NaiveDate,
    /// Who posted it.
    pub created_by: UserId,
    /// When it was posted.
    pub created_at: DateTime<Utc>,
    /// Manual or transfer-driven.
    pub source: AdjustmentSource,
}

/// An adjustment waiting to be validated and posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentDraft {
    /// Unit to adjust.
    pub stock_unit_id: StockUnitId,
    /// Signed change.
    pub quantity_adjusted: Decimal,
    /// Free-text reason, trimmed before validation.
    pub reason: String,
    /// Business date.
    pub adjustment_date: NaiveDate,
    /// Manual or transfer-driven.
    pub source: AdjustmentSource,
}

impl AdjustmentDraft {
    /// A hand-entered adjustment.
    #[must_use]
    pub fn manual(
        stock_unit_id: StockUnitId,
        quantity_adjusted: Decimal,
        reason: impl Into<String>,
        adjustment_date: NaiveDate,
    ) -> Self {
        Self {
            stock_unit_id,
            quantity_adjusted,
            reason: reason.into(),
            adjustment_date,
            source: AdjustmentSource::Manual,
        }
    }
}

/// One step of a unit's replayed audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantityChange {
    /// 1-based position in the unit's history.
    pub sequence: usize,
    /// The adjustment.
    pub adjustment_id: AdjustmentId,
    /// Quantity before the adjustment.
    pub quantity_before: Decimal,
    /// Signed change.
    pub quantity_adjusted: Decimal,
    /// Quantity after the adjustment.
    pub quantity_after: Decimal,
}

impl QuantityChange {
    /// The first step after the base quantity.
    #[must_use]
    pub fn first(base_quantity: Decimal, adjustment: &StockAdjustment) -> Self {
        Self {
            sequence: 1,
            adjustment_id: adjustment.id,
            quantity_before: base_quantity,
            quantity_adjusted: adjustment.quantity_adjusted,
            quantity_after: base_quantity + adjustment.quantity_adjusted,
        }
    }

    /// The step following `previous`.
    ///
    /// `quantity_before` always equals the previous `quantity_after`.
    #[must_use]
    pub fn next(previous: &Self, adjustment: &StockAdjustment) -> Self {
        Self {
            sequence: previous.sequence + 1,
            adjustment_id: adjustment.id,
            quantity_before: previous.quantity_after,
            quantity_adjusted: adjustment.quantity_adjusted,
            quantity_after: previous.quantity_after + adjustment.quantity_adjusted,
        }
    }
}
