//! Property-based tests for payment allocation.
//!
//! Sequences of random payments are pushed through the engine and ledger;
//! whatever is accepted or rejected, no invoice may ever be over-applied.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use weft_shared::types::{InvoiceId, OrderId, PaymentId, UserId, WarehouseId};

use super::engine::AllocationEngine;
use super::ledger::AllocationLedger;
use super::types::{AllocationRequest, Payment, PaymentMode};
use crate::context::{FixedClock, RequestContext};
use crate::order::types::Invoice;
use crate::status::InvoiceStatus;

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..500_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// One requested line: which of the invoices it targets (or on-account) and how much.
fn arb_line(invoice_count: usize) -> impl Strategy<Value = (Option<usize>, Decimal)> {
    (prop::option::weighted(0.8, 0..invoice_count), arb_amount())
}

/// A payment amount and its requested lines.
fn arb_payment(invoice_count: usize) -> impl Strategy<Value = (Decimal, Vec<(Option<usize>, Decimal)>)> {
    (arb_amount(), prop::collection::vec(arb_line(invoice_count), 0..4))
}

fn ctx() -> RequestContext {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    RequestContext::new(UserId::new(), WarehouseId::new(), &clock)
}

fn setup(totals: &[Decimal]) -> (Vec<Invoice>, HashMap<InvoiceId, Invoice>) {
    let list: Vec<Invoice> = totals
        .iter()
        .map(|&total| Invoice {
            id: InvoiceId::new(),
            order_id: OrderId::new(),
            total_amount: total,
            due_date: None,
            status: InvoiceStatus::Open,
            cancelled_reason: None,
        })
        .collect();
    let map = list.iter().map(|i| (i.id, i.clone())).collect();
    (list, map)
}

fn requests(list: &[Invoice], lines: &[(Option<usize>, Decimal)]) -> Vec<AllocationRequest> {
    lines
        .iter()
        .map(|&(target, amount)| match target {
            Some(i) => AllocationRequest::against(list[i].id, amount),
            None => AllocationRequest::unallocated(amount),
        })
        .collect()
}

fn payment(amount: Decimal) -> Payment {
    Payment {
        id: PaymentId::new(),
        mode: PaymentMode::Upi,
        amount,
        received_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Applied amounts never exceed any invoice total.
    #[test]
    fn prop_invoices_are_never_over_applied(
        totals in prop::collection::vec(arb_amount(), 1..4),
        payments in prop::collection::vec(arb_payment(3), 1..10),
    ) {
        let ctx = ctx();
        let (list, map) = setup(&totals);
        let mut ledger = AllocationLedger::new();

        for (amount, lines) in payments {
            let lines: Vec<_> = lines
                .into_iter()
                .map(|(t, a)| (t.map(|i| i % list.len()), a))
                .collect();
            let reqs = requests(&list, &lines);
            if let Ok(batch) = AllocationEngine::allocate(&ctx, &payment(amount), &reqs, &map, &ledger) {
                ledger.commit(batch).unwrap();
            }
        }

        for invoice in &list {
            prop_assert!(ledger.amount_paid(invoice.id) <= invoice.total_amount);
            prop_assert!(ledger.outstanding(invoice) >= Decimal::ZERO);
        }
    }

    /// A rejected request leaves the ledger exactly as it was; an accepted one
    /// accounts for the whole payment.
    #[test]
    fn prop_batches_are_all_or_nothing(
        totals in prop::collection::vec(arb_amount(), 1..4),
        first in arb_amount(),
        (amount, lines) in arb_payment(3),
    ) {
        let ctx = ctx();
        let (list, map) = setup(&totals);
        let mut ledger = AllocationLedger::new();
        let target = AllocationRequest::against(list[0].id, first.min(list[0].total_amount));
        let seed = AllocationEngine::allocate(&ctx, &payment(first), &[target], &map, &ledger).unwrap();
        ledger.commit(seed).unwrap();

        let before = ledger.records().len();
        let paid_before: Vec<Decimal> = list.iter().map(|i| ledger.amount_paid(i.id)).collect();
        let lines: Vec<_> = lines
            .into_iter()
            .map(|(t, a)| (t.map(|i| i % list.len()), a))
            .collect();
        let reqs = requests(&list, &lines);

        match AllocationEngine::allocate(&ctx, &payment(amount), &reqs, &map, &ledger) {
            Ok(batch) => {
                prop_assert_eq!(batch.applied_to_invoices() + batch.unallocated_amount(), amount);
                let committed = ledger.commit(batch).unwrap().len();
                prop_assert!(committed >= lines.len());
                prop_assert_eq!(ledger.records().len(), before + committed);
            }
            Err(_) => {
                prop_assert_eq!(ledger.records().len(), before);
                for (invoice, paid) in list.iter().zip(paid_before) {
                    prop_assert_eq!(ledger.amount_paid(invoice.id), paid);
                }
            }
        }
    }
}
