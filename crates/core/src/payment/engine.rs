//! Allocation engine.
//!
//! Turns a payment plus requested lines into an [`AllocationBatch`]. Every
//! line is checked against the invoice's outstanding balance recomputed from
//! the committed ledger and the lines already accepted earlier in the same
//! request. Any failure rejects the whole request.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::{debug, warn};
use weft_shared::types::{round_currency, AllocationId, InvoiceId};

use super::error::PaymentError;
use super::ledger::AllocationLedger;
use super::types::{
    AllocationBatch, AllocationRequest, AllocationTarget, Payment, PaymentAllocation,
};
use crate::context::RequestContext;
use crate::order::types::Invoice;

/// Read access to invoices by id.
pub trait InvoiceSource {
    /// Looks up an invoice.
    fn invoice(&self, id: InvoiceId) -> Option<&Invoice>;
}

impl InvoiceSource for HashMap<InvoiceId, Invoice> {
    fn invoice(&self, id: InvoiceId) -> Option<&Invoice> {
        self.get(&id)
    }
}

impl InvoiceSource for [Invoice] {
    fn invoice(&self, id: InvoiceId) -> Option<&Invoice> {
        self.iter().find(|i| i.id == id)
    }
}

/// Stateless allocation engine.
pub struct AllocationEngine;

impl AllocationEngine {
    /// Validates `requests` for `payment` and builds the batch to commit.
    ///
    /// Lines are rounded to currency precision first. Whatever part of the
    /// payment the lines leave unapplied becomes one trailing `unallocated`
    /// record. Nothing is written; pass the batch to
    /// [`AllocationLedger::commit`].
    pub fn allocate<S: InvoiceSource + ?Sized>(
        ctx: &RequestContext,
        payment: &Payment,
        requests: &[AllocationRequest],
        invoices: &S,
        ledger: &AllocationLedger,
    ) -> Result<AllocationBatch, PaymentError> {
        Self::build(ctx, payment, requests, invoices, ledger)
            .inspect(|batch| {
                debug!(
                    payment_id = %payment.id,
                    lines = batch.allocations.len(),
                    applied = %batch.applied_to_invoices(),
                    unallocated = %batch.unallocated_amount(),
                    "Payment allocation computed"
                );
            })
            .inspect_err(|e| {
                warn!(payment_id = %payment.id, error = %e, "Payment allocation rejected");
            })
    }

    fn build<S: InvoiceSource + ?Sized>(
        ctx: &RequestContext,
        payment: &Payment,
        requests: &[AllocationRequest],
        invoices: &S,
        ledger: &AllocationLedger,
    ) -> Result<AllocationBatch, PaymentError> {
        let available = round_currency(payment.amount);
        if available <= Decimal::ZERO {
            return Err(PaymentError::NonPositivePayment(payment.amount));
        }
        if ledger.has_payment(payment.id) {
            return Err(PaymentError::PaymentAlreadyAllocated(payment.id));
        }

        let lines = requests
            .iter()
            .enumerate()
            .map(|(index, req)| {
                let amount = round_currency(req.amount_applied);
                if amount <= Decimal::ZERO {
                    Err(PaymentError::NonPositiveAllocation { index, amount })
                } else {
                    Ok((req.target, amount))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let requested: Decimal = lines.iter().map(|(_, amount)| *amount).sum();
        if requested > available {
            return Err(PaymentError::ExceedsPaymentAmount {
                requested,
                available,
            });
        }

        let mut pending: HashMap<InvoiceId, Decimal> = HashMap::new();
        let mut basis = BTreeMap::new();
        for &(target, amount) in &lines {
            let AllocationTarget::AgainstRef(invoice_id) = target else {
                continue;
            };
            let invoice = invoices
                .invoice(invoice_id)
                .ok_or(PaymentError::InvoiceNotFound(invoice_id))?;
            if invoice.is_cancelled() {
                return Err(PaymentError::InvoiceCancelled(invoice_id));
            }

            let applied = pending.entry(invoice_id).or_default();
            let outstanding = ledger.outstanding(invoice) - *applied;
            if amount > outstanding {
                return Err(PaymentError::OutstandingExceeded {
                    invoice_id,
                    requested: amount,
                    outstanding,
                });
            }
            *applied += amount;
            basis
                .entry(invoice_id)
                .or_insert_with(|| ledger.version_of(invoice_id));
        }

        let record = |target: AllocationTarget, amount_applied: Decimal| PaymentAllocation {
            id: AllocationId::new(),
            payment_id: payment.id,
            target,
            amount_applied,
            created_by: ctx.user_id,
            created_at: ctx.now,
        };
        let mut allocations: Vec<_> = lines
            .into_iter()
            .map(|(target, amount)| record(target, amount))
            .collect();
        let remainder = available - requested;
        if remainder > Decimal::ZERO {
            allocations.push(record(AllocationTarget::Unallocated, remainder));
        }

        Ok(AllocationBatch {
            payment_id: payment.id,
            allocations,
            basis,
        })
    }
}
