//! Property-based tests for status derivation.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::StatusDeriver;
use super::types::{InvoiceDisplayStatus, InvoiceStatus, OrderDisplayStatus, OrderStatus};

fn arb_order_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::ApprovalPending),
        Just(OrderStatus::InProgress),
        Just(OrderStatus::Completed),
        Just(OrderStatus::Cancelled),
    ]
}

fn arb_invoice_status() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![Just(InvoiceStatus::Open), Just(InvoiceStatus::Cancelled)]
}

/// Due dates within a few years of 2024.
fn arb_due_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((0i64..2_000).prop_map(|days| {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap() + Duration::days(days)
    }))
}

fn arb_now() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..2_000 * 24).prop_map(|hours| {
        Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
    })
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Order derivation is pure in `(status, due_date, now)`.
    #[test]
    fn prop_order_status_is_deterministic(
        status in arb_order_status(),
        due in arb_due_date(),
        now in arb_now(),
    ) {
        prop_assert_eq!(
            StatusDeriver::order_status(status, due, now),
            StatusDeriver::order_status(status, due, now)
        );
    }

    /// Overdue only ever replaces in-progress.
    #[test]
    fn prop_overdue_only_from_in_progress(
        status in arb_order_status(),
        due in arb_due_date(),
        now in arb_now(),
    ) {
        let derived = StatusDeriver::order_status(status, due, now);
        if derived == OrderDisplayStatus::Overdue {
            prop_assert_eq!(status, OrderStatus::InProgress);
            prop_assert!(StatusDeriver::is_past_due(due, now));
        }
        if status != OrderStatus::InProgress {
            prop_assert_ne!(derived, OrderDisplayStatus::Overdue);
        }
    }

    /// A past-due, not fully paid open invoice is never partially paid.
    #[test]
    fn prop_overdue_takes_precedence_over_partial_payment(
        total in arb_amount(),
        paid in arb_amount(),
        due in arb_due_date(),
        now in arb_now(),
    ) {
        let derived = StatusDeriver::invoice_status(InvoiceStatus::Open, total, paid, due, now);
        if paid < total && StatusDeriver::is_past_due(due, now) {
            prop_assert_eq!(derived, InvoiceDisplayStatus::Overdue);
        }
        if derived == InvoiceDisplayStatus::PartiallyPaid {
            prop_assert!(paid > Decimal::ZERO && paid < total);
            prop_assert!(!StatusDeriver::is_past_due(due, now));
        }
    }

    /// Cancelled invoices stay cancelled whatever was paid.
    #[test]
    fn prop_cancelled_invoice_is_always_cancelled(
        status in arb_invoice_status(),
        total in arb_amount(),
        paid in arb_amount(),
        due in arb_due_date(),
        now in arb_now(),
    ) {
        let derived = StatusDeriver::invoice_status(status, total, paid, due, now);
        prop_assert_eq!(
            derived == InvoiceDisplayStatus::Cancelled,
            status == InvoiceStatus::Cancelled
        );
    }

    /// Advancing time can only move an order from in-progress to overdue.
    #[test]
    fn prop_overdue_is_monotonic_in_time(
        due in arb_due_date(),
        now in arb_now(),
        later_by in 0i64..10_000,
    ) {
        let later = now + Duration::hours(later_by);
        if StatusDeriver::order_status(OrderStatus::InProgress, due, now) == OrderDisplayStatus::Overdue {
            prop_assert_eq!(
                StatusDeriver::order_status(OrderStatus::InProgress, due, later),
                OrderDisplayStatus::Overdue
            );
        }
    }
}
