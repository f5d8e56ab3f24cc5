//! Store error types.

use thiserror::Error;
use weft_core::order::LifecycleError;
use weft_core::payment::PaymentError;
use weft_core::stock::StockError;
use weft_core::transfer::TransferError;
use weft_shared::{AppError, ErrorKind};

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Record type.
        entity: &'static str,
        /// Requested id.
        id: String,
    },

    /// A record with this id already exists.
    #[error("{entity} already exists: {id}")]
    Duplicate {
        /// Record type.
        entity: &'static str,
        /// Clashing id.
        id: String,
    },

    /// The snapshot could not be decoded.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),

    /// The snapshot decodes but its records contradict each other.
    #[error("Inconsistent snapshot: {0}")]
    InconsistentSnapshot(#[source] Box<StoreError>),

    /// Payment allocation failed.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Stock adjustment failed.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Transfer operation failed.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Order or invoice transition failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn duplicate(entity: &'static str, id: impl ToString) -> Self {
        Self::Duplicate {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn inconsistent(err: impl Into<StoreError>) -> Self {
        Self::InconsistentSnapshot(Box::new(err.into()))
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Duplicate { .. } => "DUPLICATE",
            Self::InvalidSnapshot(_) => "INVALID_SNAPSHOT",
            Self::InconsistentSnapshot(_) => "INCONSISTENT_SNAPSHOT",
            Self::Payment(e) => e.error_code(),
            Self::Stock(e) => e.error_code(),
            Self::Transfer(e) => e.error_code(),
            Self::Lifecycle(e) => e.error_code(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate { .. } | Self::InvalidSnapshot(_) | Self::InconsistentSnapshot(_) => {
                ErrorKind::Validation
            }
            Self::Payment(e) => e.kind(),
            Self::Stock(e) => e.kind(),
            Self::Transfer(e) => e.kind(),
            Self::Lifecycle(e) => e.kind(),
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

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
