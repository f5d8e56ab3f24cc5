//! Append-only allocation ledger.
//!
//! Allocations are kept in one arena in commit order and indexed by invoice
//! and by payment. Records are never edited or removed; every derived figure
//! (amount paid, outstanding) is a sum over the arena.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};
use weft_shared::types::{InvoiceId, PaymentId};

use super::engine::InvoiceSource;
use super::error::PaymentError;
use super::types::{AllocationBatch, InvoiceBalance, Payment, PaymentAllocation};
use crate::order::types::Invoice;
use crate::status::StatusDeriver;

/// Arena of committed allocations.
#[derive(Debug, Clone, Default)]
pub struct AllocationLedger {
    records: Vec<PaymentAllocation>,
    by_invoice: HashMap<InvoiceId, Vec<usize>>,
    by_payment: HashMap<PaymentId, Vec<usize>>,
}

impl AllocationLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from persisted records, in commit order.
    ///
    /// Each record is checked against the running totals of its payment and
    /// invoice: it must belong to a known payment, apply a positive amount,
    /// keep the payment within its amount and keep a live invoice within its
    /// total.
    pub fn replay<S: InvoiceSource + ?Sized>(
        records: impl IntoIterator<Item = PaymentAllocation>,
        payments: &HashMap<PaymentId, Payment>,
        invoices: &S,
    ) -> Result<Self, PaymentError> {
        let mut ledger = Self::new();
        let mut spent: HashMap<PaymentId, Decimal> = HashMap::new();

        for (index, record) in records.into_iter().enumerate() {
            let payment = payments
                .get(&record.payment_id)
                .ok_or(PaymentError::PaymentNotFound(record.payment_id))?;
            if record.amount_applied <= Decimal::ZERO {
                return Err(PaymentError::NonPositiveAllocation {
                    index,
                    amount: record.amount_applied,
                });
            }

            let requested =
                spent.get(&payment.id).copied().unwrap_or_default() + record.amount_applied;
            if requested > payment.amount {
                return Err(PaymentError::ExceedsPaymentAmount {
                    requested,
                    available: payment.amount,
                });
            }
            spent.insert(payment.id, requested);

            if let Some(invoice_id) = record.target.invoice_id() {
                let invoice = invoices
                    .invoice(invoice_id)
                    .ok_or(PaymentError::InvoiceNotFound(invoice_id))?;
                if invoice.is_cancelled() {
                    return Err(PaymentError::InvoiceCancelled(invoice_id));
                }
                let amount_paid = ledger.amount_paid(invoice_id) + record.amount_applied;
                if amount_paid > invoice.total_amount {
                    return Err(PaymentError::InvoiceOverApplied {
                        invoice_id,
                        total_amount: invoice.total_amount,
                        amount_paid,
                    });
                }
            }

            ledger.push(record);
        }

        Ok(ledger)
    }

    fn push(&mut self, record: PaymentAllocation) {
        let index = self.records.len();
        if let Some(invoice_id) = record.target.invoice_id() {
            self.by_invoice.entry(invoice_id).or_default().push(index);
        }
        self.by_payment
            .entry(record.payment_id)
            .or_default()
            .push(index);
        self.records.push(record);
    }

    /// All records in commit order.
    #[must_use]
    pub fn records(&self) -> &[PaymentAllocation] {
        &self.records
    }

    /// Committed allocations against an invoice.
    pub fn for_invoice(&self, invoice_id: InvoiceId) -> impl Iterator<Item = &PaymentAllocation> {
        self.by_invoice
            .get(&invoice_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.records[i])
    }

    /// Committed allocations of a payment.
    pub fn for_payment(&self, payment_id: PaymentId) -> impl Iterator<Item = &PaymentAllocation> {
        self.by_payment
            .get(&payment_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.records[i])
    }

    /// Returns true if the payment owns any committed allocation.
    #[must_use]
    pub fn has_payment(&self, payment_id: PaymentId) -> bool {
        self.by_payment.contains_key(&payment_id)
    }

    /// Amount paid on an invoice: the sum of its committed allocations.
    #[must_use]
    pub fn amount_paid(&self, invoice_id: InvoiceId) -> Decimal {
        self.for_invoice(invoice_id).map(|a| a.amount_applied).sum()
    }

    /// Number of allocations committed against an invoice.
    ///
    /// Grows by one per allocation, so it doubles as the invoice's
    /// optimistic-concurrency version.
    #[must_use]
    pub fn version_of(&self, invoice_id: InvoiceId) -> usize {
        self.by_invoice.get(&invoice_id).map_or(0, Vec::len)
    }

    /// Total minus amount paid.
    #[must_use]
    pub fn outstanding(&self, invoice: &Invoice) -> Decimal {
        invoice.total_amount - self.amount_paid(invoice.id)
    }

    /// Payment position and display status of an invoice at `now`.
    #[must_use]
    pub fn balance(&self, invoice: &Invoice, now: DateTime<Utc>) -> InvoiceBalance {
        let amount_paid = self.amount_paid(invoice.id);
        InvoiceBalance {
            invoice_id: invoice.id,
            total_amount: invoice.total_amount,
            amount_paid,
            outstanding: invoice.total_amount - amount_paid,
            status: StatusDeriver::derive_invoice_status(invoice, amount_paid, now),
        }
    }

    /// Appends a batch produced by the allocation engine.
    ///
    /// Fails without appending anything if the payment was allocated in the
    /// meantime or any touched invoice gained allocations since the batch was
    /// computed.
    pub fn commit(&mut self, batch: AllocationBatch) -> Result<&[PaymentAllocation], PaymentError> {
        if self.has_payment(batch.payment_id) {
            return Err(PaymentError::PaymentAlreadyAllocated(batch.payment_id));
        }
        for (&invoice_id, &expected) in &batch.basis {
            let actual = self.version_of(invoice_id);
            if actual != expected {
                warn!(%invoice_id, expected, actual, "Stale allocation batch");
                return Err(PaymentError::StaleBatch {
                    invoice_id,
                    expected,
                    actual,
                });
            }
        }

        let start = self.records.len();
        let payment_id = batch.payment_id;
        for record in batch.allocations {
            self.push(record);
        }
        debug!(%payment_id, count = self.records.len() - start, "Allocation batch committed");

        Ok(&self.records[start..])
    }
}
