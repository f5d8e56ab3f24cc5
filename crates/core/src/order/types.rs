//! Order and invoice records as loaded from persistence.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use weft_shared::types::{InvoiceId, OrderId, WarehouseId};

use crate::finance::{DiscountType, FinancialCalculator, OrderFinancials};
use crate::status::{InvoiceStatus, OrderStatus};

/// Whether an order sells to a customer or buys from a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// Sales order.
    Sales,
    /// Purchase order.
    Purchase,
}

impl OrderKind {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Purchase => "purchase",
        }
    }
}

/// A sales or purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier.
    pub id: OrderId,
    /// Sales or purchase.
    pub kind: OrderKind,
    /// Warehouse fulfilling or receiving the order.
    pub warehouse_id: WarehouseId,
    /// Persisted lifecycle status.
    pub status: OrderStatus,
    /// Expected delivery date; `None` means open-ended.
    pub due_date: Option<NaiveDate>,
    /// Sum of line amounts before discount and tax.
    pub item_total: Decimal,
    /// How the discount is expressed.
    #[serde(default)]
    pub discount_type: DiscountType,
    /// Percentage or flat amount, depending on `discount_type`.
    #[serde(default)]
    pub discount_value: Decimal,
    /// Flat GST rate in percent.
    pub gst_rate: Decimal,
    /// Present iff the order is cancelled.
    #[serde(default)]
    pub cancelled_reason: Option<String>,
}

impl Order {
    /// Full-precision pricing breakdown of this order.
    #[must_use]
    pub fn financials(&self) -> OrderFinancials {
        FinancialCalculator::compute_order_financials(
            self.item_total,
            self.discount_type,
            self.discount_value,
            self.gst_rate,
        )
    }
}

/// An invoice raised against an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Order the invoice was raised from.
    pub order_id: OrderId,
    /// Amount due; immutable once issued.
    pub total_amount: Decimal,
    /// Payment due date; `None` means no due date.
    pub due_date: Option<NaiveDate>,
    /// Persisted status.
    #[serde(default)]
    pub status: InvoiceStatus,
    /// Present iff the invoice is cancelled.
    #[serde(default)]
    pub cancelled_reason: Option<String>,
}

impl Invoice {
    /// Returns true if the invoice has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == InvoiceStatus::Cancelled
    }
}
