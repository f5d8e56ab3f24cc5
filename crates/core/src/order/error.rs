//! Lifecycle error types for orders and invoices.

use rust_decimal::Decimal;
use thiserror::Error;
use weft_shared::{AppError, ErrorKind};

/// Errors raised by order and invoice state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The entity is not in a state the transition starts from.
    #[error("Invalid {entity} status transition from {from} to {to}")]
    InvalidTransition {
        /// "order" or "invoice".
        entity: &'static str,
        /// The current status.
        from: &'static str,
        /// The attempted target status.
        to: &'static str,
    },

    /// Cancellation without a reason.
    #[error("Cancellation reason is required")]
    ReasonRequired,

    /// Invoice has committed allocations, which cannot be reversed.
    #[error("Invoice has {amount_paid} allocated against it and cannot be cancelled")]
    InvoiceHasPayments {
        /// Sum of committed allocations.
        amount_paid: Decimal,
    },
}

impl LifecycleError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::InvoiceHasPayments { .. } => "INVOICE_HAS_PAYMENTS",
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

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = LifecycleError::InvalidTransition {
            entity: "order",
            from: "completed",
            to: "cancelled",
        };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert_eq!(
            err.to_string(),
            "Invalid order status transition from completed to cancelled"
        );
    }

    #[test]
    fn test_converts_to_validation_app_error() {
        let app: AppError = LifecycleError::ReasonRequired.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }
}
