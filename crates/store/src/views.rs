//! Derived read models.

use rust_decimal::Decimal;
use serde::Serialize;
use weft_core::finance::{FinancialWarning, OrderFinancials};
use weft_core::order::OrderKind;
use weft_core::status::OrderDisplayStatus;
use weft_core::stock::StockType;
use weft_shared::types::{OrderId, StockUnitId, WarehouseId};

/// An order as shown in lists: display status plus pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    /// The order.
    pub order_id: OrderId,
    /// Sales or purchase.
    pub kind: OrderKind,
    /// Derived display status.
    pub status: OrderDisplayStatus,
    /// Full-precision breakdown.
    pub financials: OrderFinancials,
    /// Out-of-range pricing inputs, if any.
    pub warnings: Vec<FinancialWarning>,
}

/// Current quantity of one stock unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockLevel {
    /// The unit.
    pub stock_unit_id: StockUnitId,
    /// Owning warehouse.
    pub warehouse_id: WarehouseId,
    /// Roll, batch or piece.
    pub stock_type: StockType,
    /// Sequence within the warehouse.
    pub sequence_number: u32,
    /// Base quantity plus adjustments.
    pub quantity: Decimal,
}
