//! Finance error types.

use thiserror::Error;
use weft_shared::{AppError, ErrorKind};

use super::calculator::FinancialWarning;

/// Errors raised by the strict financial calculation path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinanceError {
    /// The inputs produce internally inconsistent values.
    #[error("Inconsistent order financials: {0}")]
    Inconsistent(FinancialWarning),
}

impl FinanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Inconsistent(warning) => warning.code(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
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

impl From<FinanceError> for AppError {
    fn from(err: FinanceError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
