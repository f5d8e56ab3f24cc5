//! Stock ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;
use weft_shared::types::StockUnitId;
use weft_shared::{AppError, ErrorKind};

/// Errors that can occur while posting stock adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    // ========== Validation Errors ==========
    /// Adjustment of zero.
    #[error("Adjustment quantity cannot be zero")]
    ZeroQuantity,

    /// Reason shorter than the configured minimum after trimming.
    #[error("Reason must be at least {min} characters, got {actual}")]
    ReasonTooShort {
        /// Minimum length.
        min: usize,
        /// Trimmed length.
        actual: usize,
    },

    /// Reason longer than the configured maximum after trimming.
    #[error("Reason must be at most {max} characters, got {actual}")]
    ReasonTooLong {
        /// Maximum length.
        max: usize,
        /// Trimmed length.
        actual: usize,
    },

    /// The adjustment would take the unit below zero.
    #[error("Insufficient stock on unit {stock_unit_id}: available {available}, adjustment {adjustment}")]
    InsufficientStock {
        /// The unit.
        stock_unit_id: StockUnitId,
        /// Quantity before the adjustment.
        available: Decimal,
        /// The rejected change.
        adjustment: Decimal,
    },

    /// A unit with this id is already registered.
    #[error("Stock unit already exists: {0}")]
    DuplicateUnit(StockUnitId),

    // ========== Not Found ==========
    /// Unknown stock unit.
    #[error("Stock unit not found: {0}")]
    UnitNotFound(StockUnitId),
}

impl StockError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroQuantity => "ZERO_QUANTITY",
            Self::ReasonTooShort { .. } => "REASON_TOO_SHORT",
            Self::ReasonTooLong { .. } => "REASON_TOO_LONG",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::UnitNotFound(_) => "STOCK_UNIT_NOT_FOUND",
            Self::DuplicateUnit(_) => "DUPLICATE_STOCK_UNIT",
        }
    }

    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroQuantity
            | Self::ReasonTooShort { .. }
            | Self::ReasonTooLong { .. }
            | Self::InsufficientStock { .. }
            | Self::DuplicateUnit(_) => ErrorKind::Validation,
            Self::UnitNotFound(_) => ErrorKind::NotFound,
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

impl From<StockError> for AppError {
    fn from(err: StockError) -> Self {
        AppError::from_kind(err.kind(), err.to_string())
    }
}
