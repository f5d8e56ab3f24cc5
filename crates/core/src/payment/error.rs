//! Payment allocation error types.

use rust_decimal::Decimal;
use thiserror::Error;
use weft_shared::types::{InvoiceId, PaymentId};
use weft_shared::{AppError, ErrorKind};

/// Errors that can occur while allocating a payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    // ========== Validation Errors ==========
    /// Payment amount must be positive.
    #[error("Payment amount must be positive, got {0}")]
    NonPositivePayment(Decimal),

    /// An allocation line is zero or negative after rounding.
    #[error("Allocation line {index} must apply a positive amount, got {amount}")]
    NonPositiveAllocation {
        /// Position of the line in the request.
        index: usize,
        /// The rounded amount.
        amount: Decimal,
    },

    /// The lines add up to more than the payment.
    #[error("Allocations total {requested} exceeds payment amount {available}")]
    ExceedsPaymentAmount {
        /// Sum of requested lines.
        requested: Decimal,
        /// Payment amount.
        available: Decimal,
    },

    /// The payment already has committed allocations.
    #[error("Payment {0} has already been allocated")]
    PaymentAlreadyAllocated(PaymentId),

    /// Allocation against a cancelled invoice.
    #[error("Invoice {0} is cancelled")]
    InvoiceCancelled(InvoiceId),

    /// Persisted allocations add up to more than the invoice total.
    #[error("Invoice {invoice_id} is over-applied: paid {amount_paid} of {total_amount}")]
    InvoiceOverApplied {
        /// The invoice.
        invoice_id: InvoiceId,
        /// Invoice total.
        total_amount: Decimal,
        /// Running amount paid including the offending record.
        amount_paid: Decimal,
    },

    // ========== Not Found ==========
    /// Allocation against an unknown invoice.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// Allocation owned by an unknown payment.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    // ========== Concurrency Errors ==========
    /// The line exceeds the invoice's freshly recomputed outstanding balance.
    #[error("Allocation of {requested} exceeds outstanding balance {outstanding} on invoice {invoice_id}")]
    OutstandingExceeded {
        /// The invoice.
        invoice_id: InvoiceId,
        /// Amount the line tried to apply.
        requested: Decimal,
        /// Outstanding balance at the time of application.
        outstanding: Decimal,
    },

    /// The invoice gained allocations after the batch was computed.
    #[error("Invoice {invoice_id} changed since allocation was computed: expected version {expected}, got {actual}")]
    StaleBatch {
        /// The invoice.
        invoice_id: InvoiceId,
        /// Allocation count the batch was computed against.
        expected: usize,
        /// Allocation count found at commit.
        actual: usize,
    },
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositivePayment(_) => "NON_POSITIVE_PAYMENT",
            Self::NonPositiveAllocation { .. } => "NON_POSITIVE_ALLOCATION",
            Self::ExceedsPaymentAmount { .. } => "EXCEEDS_PAYMENT_AMOUNT",
            Self::PaymentAlreadyAllocated(_) => "PAYMENT_ALREADY_ALLOCATED",
            Self::InvoiceCancelled(_) => "INVOICE_CANCELLED",
            Self::InvoiceOverApplied { .. } => "INVOICE_OVER_APPLIED",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::OutstandingExceeded { .. } => "OUTSTANDING_EXCEEDED",
            Self::StaleBatch { .. } => "STALE_ALLOCATION_BATCH",
        }
    }

    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NonPositivePayment(_)
            | Self::NonPositiveAllocation { .. }
            | Self::ExceedsPaymentAmount { .. }
            | Self::PaymentAlreadyAllocated(_)
            | Self::InvoiceCancelled(_)
            | Self::InvoiceOverApplied { .. } => ErrorKind::Validation,
            Self::InvoiceNotFound(_) | Self::PaymentNotFound(_) => ErrorKind::NotFound,
            Self::OutstandingExceeded { .. } | Self::StaleBatch { .. } => ErrorKind::Conflict,
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

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
