//! Order and invoice state transitions.
//!
//! Each transition validates against the current persisted status, applies
//! the change to the record in place and returns a [`StatusChange`] for the
//! audit trail. A failed transition leaves the record untouched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};
use weft_shared::types::UserId;

use super::error::LifecycleError;
use super::types::{Invoice, Order};
use crate::context::RequestContext;
use crate::reason::cancellation_reason;
use crate::status::{InvoiceStatus, OrderStatus};

/// Audit record of one status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Status before the change.
    pub from: &'static str,
    /// Status after the change.
    pub to: &'static str,
    /// Who made the change.
    pub changed_by: UserId,
    /// When the change was made.
    pub changed_at: DateTime<Utc>,
    /// Reason, for cancellations.
    pub reason: Option<String>,
}

/// Stateless order lifecycle.
pub struct OrderLifecycle;

impl OrderLifecycle {
    /// Approve a pending order: ApprovalPending → InProgress.
    pub fn approve(ctx: &RequestContext, order: &mut Order) -> Result<StatusChange, LifecycleError> {
        Self::transition(ctx, order, OrderStatus::InProgress, None)
    }

    /// Complete an in-progress order: InProgress → Completed.
    pub fn complete(
        ctx: &RequestContext,
        order: &mut Order,
    ) -> Result<StatusChange, LifecycleError> {
        Self::transition(ctx, order, OrderStatus::Completed, None)
    }

    /// Cancel a non-terminal order. The reason is required.
    pub fn cancel(
        ctx: &RequestContext,
        order: &mut Order,
        reason: &str,
    ) -> Result<StatusChange, LifecycleError> {
        let reason = cancellation_reason(reason).ok_or(LifecycleError::ReasonRequired)?;
        Self::transition(ctx, order, OrderStatus::Cancelled, Some(reason))
    }

    /// Check if an order status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (OrderStatus::ApprovalPending, OrderStatus::InProgress)
                | (OrderStatus::InProgress, OrderStatus::Completed)
                | (
                    OrderStatus::ApprovalPending | OrderStatus::InProgress,
                    OrderStatus::Cancelled
                )
        )
    }

    fn transition(
        ctx: &RequestContext,
        order: &mut Order,
        to: OrderStatus,
        reason: Option<String>,
    ) -> Result<StatusChange, LifecycleError> {
        let from = order.status;
        if !Self::is_valid_transition(from, to) {
            warn!(order_id = %order.id, %from, %to, "Rejected order transition");
            return Err(LifecycleError::InvalidTransition {
                entity: "order",
                from: from.as_str(),
                to: to.as_str(),
            });
        }

        order.status = to;
        if to == OrderStatus::Cancelled {
            order.cancelled_reason.clone_from(&reason);
        }
        debug!(order_id = %order.id, %from, %to, user_id = %ctx.user_id, "Order transitioned");

        Ok(StatusChange {
            from: from.as_str(),
            to: to.as_str(),
            changed_by: ctx.user_id,
            changed_at: ctx.now,
            reason,
        })
    }
}

/// Stateless invoice lifecycle.
pub struct InvoiceLifecycle;

impl InvoiceLifecycle {
    /// Cancel an open invoice.
    ///
    /// `amount_paid` is the committed allocation total. Allocations cannot be
    /// reversed, so an invoice with payments against it stays open.
    pub fn cancel(
        ctx: &RequestContext,
        invoice: &mut Invoice,
        reason: &str,
        amount_paid: Decimal,
    ) -> Result<StatusChange, LifecycleError> {
        let reason = cancellation_reason(reason).ok_or(LifecycleError::ReasonRequired)?;

        if invoice.status.is_terminal() {
            return Err(LifecycleError::InvalidTransition {
                entity: "invoice",
                from: invoice.status.as_str(),
                to: InvoiceStatus::Cancelled.as_str(),
            });
        }
        if amount_paid > Decimal::ZERO {
            warn!(invoice_id = %invoice.id, %amount_paid, "Refusing to cancel paid invoice");
            return Err(LifecycleError::InvoiceHasPayments { amount_paid });
        }

        invoice.status = InvoiceStatus::Cancelled;
        invoice.cancelled_reason = Some(reason.clone());
        debug!(invoice_id = %invoice.id, user_id = %ctx.user_id, "Invoice cancelled");

        Ok(StatusChange {
            from: InvoiceStatus::Open.as_str(),
            to: InvoiceStatus::Cancelled.as_str(),
            changed_by: ctx.user_id,
            changed_at: ctx.now,
            reason: Some(reason),
        })
    }
}
