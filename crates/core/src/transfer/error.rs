//! Transfer error types.

use rust_decimal::Decimal;
use thiserror::Error;
use weft_shared::types::{StockUnitId, WarehouseId};
use weft_shared::{AppError, ErrorKind};

use crate::stock::StockError;

/// Errors that can occur during transfer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Transition not allowed from the current status.
    #[error("Invalid transfer transition from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current status.
        from: &'static str,
        /// Requested status.
        to: &'static str,
    },

    /// Cancellation without a reason.
    #[error("Cancellation reason is required")]
    ReasonRequired,

    /// Source and destination are the same warehouse.
    #[error("Transfer source and destination must differ")]
    SameWarehouse,

    /// A transfer must ship something.
    #[error("Transfer has no items")]
    NoItems,

    /// A unit appears on more than one shipped line.
    #[error("Stock unit {0} is shipped more than once")]
    DuplicateItem(StockUnitId),

    /// Shipped or received quantity out of range.
    #[error("Invalid quantity {quantity} for stock unit {stock_unit_id}")]
    InvalidQuantity {
        /// The unit on the offending line.
        stock_unit_id: StockUnitId,
        /// The offending quantity.
        quantity: Decimal,
    },

    /// A received line names a unit that was not shipped.
    #[error("Stock unit {0} is not part of this transfer")]
    UnknownItem(StockUnitId),

    /// More received than shipped for one item.
    #[error("Received {received} exceeds shipped {shipped} for stock unit {source_unit_id}")]
    ReceivedExceedsShipped {
        /// The shipped line.
        source_unit_id: StockUnitId,
        /// Quantity shipped.
        shipped: Decimal,
        /// Total received across lines.
        received: Decimal,
    },

    /// A unit belongs to the wrong warehouse.
    #[error("Stock unit {stock_unit_id} belongs to warehouse {actual}, expected {expected}")]
    WrongWarehouse {
        /// The unit.
        stock_unit_id: StockUnitId,
        /// Required warehouse.
        expected: WarehouseId,
        /// Owning warehouse.
        actual: WarehouseId,
    },

    /// Posting the stock movements failed.
    #[error(transparent)]
    Stock(#[from] StockError),
}

impl TransferError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::SameWarehouse => "SAME_WAREHOUSE",
            Self::NoItems => "NO_ITEMS",
            Self::DuplicateItem(_) => "DUPLICATE_ITEM",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::UnknownItem(_) => "UNKNOWN_TRANSFER_ITEM",
            Self::ReceivedExceedsShipped { .. } => "RECEIVED_EXCEEDS_SHIPPED",
            Self::WrongWarehouse { .. } => "WRONG_WAREHOUSE",
            Self::Stock(e) => e.error_code(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTransition { .. }
            | Self::ReasonRequired
            | Self::SameWarehouse
            | Self::NoItems
            | Self::DuplicateItem(_)
            | Self::InvalidQuantity { .. }
            | Self::UnknownItem(_)
            | Self::ReceivedExceedsShipped { .. }
            | Self::WrongWarehouse { .. } => ErrorKind::Validation,
            Self::Stock(e) => e.kind(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        self.kind().http_status_code()
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl From<TransferError> for AppError {
    fn from(err: TransferError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
