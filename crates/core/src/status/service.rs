//! Status derivation rules.
//!
//! Both derivations are pure functions of the persisted fields and `now`;
//! there is no stored "overdue" flag and no background sweep.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::types::{InvoiceDisplayStatus, InvoiceStatus, OrderDisplayStatus, OrderStatus};
use crate::order::types::{Invoice, Order};

/// Stateless status derivation.
pub struct StatusDeriver;

impl StatusDeriver {
    /// Derives the display status of an order.
    #[must_use]
    pub fn derive_order_status(order: &Order, now: DateTime<Utc>) -> OrderDisplayStatus {
        Self::order_status(order.status, order.due_date, now)
    }

    /// Derives an order display status from its raw parts.
    ///
    /// Only an in-progress order can be overdue; approval-pending orders keep
    /// their status past the due date.
    #[must_use]
    pub fn order_status(
        status: OrderStatus,
        due_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> OrderDisplayStatus {
        match status {
            OrderStatus::Cancelled => OrderDisplayStatus::Cancelled,
            OrderStatus::Completed => OrderDisplayStatus::Completed,
            OrderStatus::ApprovalPending => OrderDisplayStatus::ApprovalPending,
            OrderStatus::InProgress if Self::is_past_due(due_date, now) => {
                OrderDisplayStatus::Overdue
            }
            OrderStatus::InProgress => OrderDisplayStatus::InProgress,
        }
    }

    /// Derives the display status of an invoice given what has been paid.
    #[must_use]
    pub fn derive_invoice_status(
        invoice: &Invoice,
        amount_paid: Decimal,
        now: DateTime<Utc>,
    ) -> InvoiceDisplayStatus {
        Self::invoice_status(
            invoice.status,
            invoice.total_amount,
            amount_paid,
            invoice.due_date,
            now,
        )
    }

    /// Derives an invoice display status from its raw parts.
    ///
    /// Precedence: cancelled, settled, overdue, partially paid, open. A partly
    /// paid invoice past its due date is overdue.
    #[must_use]
    pub fn invoice_status(
        status: InvoiceStatus,
        total_amount: Decimal,
        amount_paid: Decimal,
        due_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> InvoiceDisplayStatus {
        if status == InvoiceStatus::Cancelled {
            InvoiceDisplayStatus::Cancelled
        } else if amount_paid >= total_amount {
            InvoiceDisplayStatus::Settled
        } else if Self::is_past_due(due_date, now) {
            InvoiceDisplayStatus::Overdue
        } else if amount_paid > Decimal::ZERO {
            InvoiceDisplayStatus::PartiallyPaid
        } else {
            InvoiceDisplayStatus::Open
        }
    }

    /// True once the UTC calendar date of `now` is strictly after `due_date`.
    ///
    /// Something due today is not overdue until tomorrow (UTC). No due date
    /// means never overdue.
    #[must_use]
    pub fn is_past_due(due_date: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
        due_date.is_some_and(|due| now.date_naive() > due)
    }
}
