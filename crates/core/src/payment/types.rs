//! Payment and allocation records.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use weft_shared::types::{AllocationId, InvoiceId, PaymentId, UserId};

use crate::status::InvoiceDisplayStatus;

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Cash.
    Cash,
    /// NEFT/RTGS/IMPS bank transfer.
    BankTransfer,
    /// UPI.
    Upi,
    /// Cheque.
    Cheque,
    /// Card.
    Card,
}

/// A payment received from a customer or made to a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// How it was paid.
    pub mode: PaymentMode,
    /// Amount paid.
    pub amount: Decimal,
    /// Date the money was received or sent.
    pub received_on: NaiveDate,
}

/// Persisted discriminator of an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationType {
    /// Applied to a specific invoice.
    AgainstRef,
    /// On-account credit not tied to any invoice.
    Unallocated,
}

/// Where an allocation applies; an invoice is present iff it is `against_ref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "allocation_type", content = "invoice_id", rename_all = "snake_case")]
pub enum AllocationTarget {
    /// Applied to this invoice.
    AgainstRef(InvoiceId),
    /// On-account credit.
    Unallocated,
}

impl AllocationTarget {
    /// The persisted discriminator.
    #[must_use]
    pub fn allocation_type(&self) -> AllocationType {
        match self {
            Self::AgainstRef(_) => AllocationType::AgainstRef,
            Self::Unallocated => AllocationType::Unallocated,
        }
    }

    /// The referenced invoice, if any.
    #[must_use]
    pub fn invoice_id(&self) -> Option<InvoiceId> {
        match self {
            Self::AgainstRef(id) => Some(*id),
            Self::Unallocated => None,
        }
    }
}

/// A committed, immutable slice of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    /// Unique identifier.
    pub id: AllocationId,
    /// Parent payment.
    pub payment_id: PaymentId,
    /// Invoice or on-account.
    pub target: AllocationTarget,
    /// Amount applied, positive, at currency precision.
    pub amount_applied: Decimal,
    /// Who recorded the allocation.
    pub created_by: UserId,
    /// When the allocation was recorded.
    pub created_at: DateTime<Utc>,
}

/// One requested line of an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Invoice or on-account.
    pub target: AllocationTarget,
    /// Amount to apply.
    pub amount_applied: Decimal,
}

impl AllocationRequest {
    /// A line applying `amount` to `invoice_id`.
    #[must_use]
    pub fn against(invoice_id: InvoiceId, amount: Decimal) -> Self {
        Self {
            target: AllocationTarget::AgainstRef(invoice_id),
            amount_applied: amount,
        }
    }

    /// An explicit on-account line.
    #[must_use]
    pub fn unallocated(amount: Decimal) -> Self {
        Self {
            target: AllocationTarget::Unallocated,
            amount_applied: amount,
        }
    }
}

/// A validated allocation, ready to commit as one unit.
///
/// Only the engine builds batches. Each batch remembers the per-invoice
/// ledger version it was computed from, so committing a stale batch fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationBatch {
    pub(crate) payment_id: PaymentId,
    pub(crate) allocations: Vec<PaymentAllocation>,
    pub(crate) basis: BTreeMap<InvoiceId, usize>,
}

impl AllocationBatch {
    /// The payment being allocated.
    #[must_use]
    pub fn payment_id(&self) -> PaymentId {
        self.payment_id
    }

    /// The records that will be appended, on-account remainder last.
    #[must_use]
    pub fn allocations(&self) -> &[PaymentAllocation] {
        &self.allocations
    }

    /// Sum applied to invoices.
    #[must_use]
    pub fn applied_to_invoices(&self) -> Decimal {
        self.allocations
            .iter()
            .filter(|a| a.target.allocation_type() == AllocationType::AgainstRef)
            .map(|a| a.amount_applied)
            .sum()
    }

    /// Sum held as on-account credit.
    #[must_use]
    pub fn unallocated_amount(&self) -> Decimal {
        self.allocations
            .iter()
            .filter(|a| a.target.allocation_type() == AllocationType::Unallocated)
            .map(|a| a.amount_applied)
            .sum()
    }
}

/// Read model of one invoice's payment position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceBalance {
    /// The invoice.
    pub invoice_id: InvoiceId,
    /// Invoice total.
    pub total_amount: Decimal,
    /// Sum of committed allocations.
    pub amount_paid: Decimal,
    /// Total minus amount paid.
    pub outstanding: Decimal,
    /// Derived display status.
    pub status: InvoiceDisplayStatus,
}
