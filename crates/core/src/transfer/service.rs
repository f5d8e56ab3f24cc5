//! Transfer lifecycle: dispatch, complete, cancel.
//!
//! Every operation validates the whole request first and then posts its stock
//! movements through [`StockLedger::apply_batch`], so a transfer's status and
//! the ledger either both change or neither does.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use tracing::{debug, warn};
use weft_shared::types::{StockUnitId, TransferId, WarehouseId};

use super::error::TransferError;
use super::types::{ReceivedItem, Transfer, TransferItem, TransferStatus};
use crate::context::RequestContext;
use crate::order::StatusChange;
use crate::reason::cancellation_reason;
use crate::stock::{AdjustmentDraft, AdjustmentSource, StockError, StockLedger};

/// Stateless transfer lifecycle.
pub struct TransferLifecycle;

impl TransferLifecycle {
    /// Ships `items` from the context's warehouse to `destination`.
    ///
    /// Deducts each shipped quantity from its source unit and returns the new
    /// in-transit transfer.
    pub fn dispatch(
        ctx: &RequestContext,
        destination: WarehouseId,
        items: Vec<TransferItem>,
        ledger: &mut StockLedger,
    ) -> Result<Transfer, TransferError> {
        let source = ctx.warehouse_id;
        if source == destination {
            return Err(TransferError::SameWarehouse);
        }
        if items.is_empty() {
            return Err(TransferError::NoItems);
        }

        let id = TransferId::new();
        let mut seen = HashSet::new();
        let mut drafts = Vec::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.source_unit_id) {
                return Err(TransferError::DuplicateItem(item.source_unit_id));
            }
            if item.shipped_quantity <= Decimal::ZERO {
                return Err(TransferError::InvalidQuantity {
                    stock_unit_id: item.source_unit_id,
                    quantity: item.shipped_quantity,
                });
            }
            Self::check_owner(ledger, item.source_unit_id, source)?;
            drafts.push(AdjustmentDraft {
                stock_unit_id: item.source_unit_id,
                quantity_adjusted: -item.shipped_quantity,
                reason: format!("Dispatched on transfer {id}"),
                adjustment_date: ctx.today(),
                source: AdjustmentSource::TransferDispatch(id),
            });
        }

        ledger.apply_batch(ctx, drafts)?;
        debug!(transfer_id = %id, %source, %destination, items = items.len(), "Transfer dispatched");

        Ok(Transfer {
            id,
            source_warehouse_id: source,
            destination_warehouse_id: destination,
            status: TransferStatus::InTransit,
            cancelled_reason: None,
            items,
        })
    }

    /// Receives an in-transit transfer at its destination.
    ///
    /// Each received line must name a shipped item and a destination unit
    /// owned by the destination warehouse. Per item, the received total may
    /// not exceed what was shipped. Zero-quantity lines post nothing.
    pub fn complete(
        ctx: &RequestContext,
        transfer: &mut Transfer,
        received: &[ReceivedItem],
        ledger: &mut StockLedger,
    ) -> Result<StatusChange, TransferError> {
        Self::ensure_in_transit(transfer, TransferStatus::Completed)?;

        let mut totals: BTreeMap<_, Decimal> = BTreeMap::new();
        let mut drafts = Vec::new();
        for line in received {
            if line.received_quantity < Decimal::ZERO {
                return Err(TransferError::InvalidQuantity {
                    stock_unit_id: line.source_unit_id,
                    quantity: line.received_quantity,
                });
            }
            let item = transfer
                .item(line.source_unit_id)
                .ok_or(TransferError::UnknownItem(line.source_unit_id))?;

            let total = totals.entry(line.source_unit_id).or_default();
            *total += line.received_quantity;
            if *total > item.shipped_quantity {
                return Err(TransferError::ReceivedExceedsShipped {
                    source_unit_id: line.source_unit_id,
                    shipped: item.shipped_quantity,
                    received: *total,
                });
            }

            Self::check_owner(
                ledger,
                line.destination_unit_id,
                transfer.destination_warehouse_id,
            )?;
            if line.received_quantity > Decimal::ZERO {
                drafts.push(AdjustmentDraft {
                    stock_unit_id: line.destination_unit_id,
                    quantity_adjusted: line.received_quantity,
                    reason: format!("Received on transfer {}", transfer.id),
                    adjustment_date: ctx.today(),
                    source: AdjustmentSource::TransferReceipt(transfer.id),
                });
            }
        }

        ledger.apply_batch(ctx, drafts).inspect_err(|e| {
            warn!(transfer_id = %transfer.id, error = %e, "Transfer receipt rejected");
        })?;
        Ok(Self::finish(ctx, transfer, TransferStatus::Completed, None))
    }

    /// Calls off an in-transit transfer and returns shipped stock to the
    /// source units. The reason is required.
    pub fn cancel(
        ctx: &RequestContext,
        transfer: &mut Transfer,
        reason: &str,
        ledger: &mut StockLedger,
    ) -> Result<StatusChange, TransferError> {
        let reason = cancellation_reason(reason).ok_or(TransferError::ReasonRequired)?;
        Self::ensure_in_transit(transfer, TransferStatus::Cancelled)?;

        let drafts = transfer
            .items
            .iter()
            .filter(|item| item.shipped_quantity > Decimal::ZERO)
            .map(|item| AdjustmentDraft {
                stock_unit_id: item.source_unit_id,
                quantity_adjusted: item.shipped_quantity,
                reason: format!("Returned from cancelled transfer {}", transfer.id),
                adjustment_date: ctx.today(),
                source: AdjustmentSource::TransferCancellation(transfer.id),
            })
            .collect();

        ledger.apply_batch(ctx, drafts).inspect_err(|e| {
            warn!(transfer_id = %transfer.id, error = %e, "Transfer cancellation rejected");
        })?;
        Ok(Self::finish(
            ctx,
            transfer,
            TransferStatus::Cancelled,
            Some(reason),
        ))
    }

    fn ensure_in_transit(transfer: &Transfer, to: TransferStatus) -> Result<(), TransferError> {
        if transfer.status == TransferStatus::InTransit {
            return Ok(());
        }
        warn!(transfer_id = %transfer.id, from = %transfer.status, %to, "Rejected transfer transition");
        Err(TransferError::InvalidTransition {
            from: transfer.status.as_str(),
            to: to.as_str(),
        })
    }

    fn check_owner(
        ledger: &StockLedger,
        stock_unit_id: StockUnitId,
        expected: WarehouseId,
    ) -> Result<(), TransferError> {
        let unit = ledger
            .unit(stock_unit_id)
            .ok_or(StockError::UnitNotFound(stock_unit_id))?;
        if unit.warehouse_id != expected {
            return Err(TransferError::WrongWarehouse {
                stock_unit_id,
                expected,
                actual: unit.warehouse_id,
            });
        }
        Ok(())
    }

    fn finish(
        ctx: &RequestContext,
        transfer: &mut Transfer,
        to: TransferStatus,
        reason: Option<String>,
    ) -> StatusChange {
        let from = transfer.status;
        transfer.status = to;
        transfer.cancelled_reason.clone_from(&reason);
        debug!(transfer_id = %transfer.id, %from, %to, user_id = %ctx.user_id, "Transfer transitioned");

        StatusChange {
            from: from.as_str(),
            to: to.as_str(),
            changed_by: ctx.user_id,
            changed_at: ctx.now,
            reason,
        }
    }
}
