//! The in-memory store.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use weft_core::order::{Invoice, InvoiceLifecycle, Order, OrderLifecycle, StatusChange};
use weft_core::payment::{
    AllocationEngine, AllocationLedger, AllocationRequest, InvoiceBalance, Payment,
    PaymentAllocation,
};
use weft_core::status::StatusDeriver;
use weft_core::stock::{QuantityChange, ReasonRules, StockAdjustment, StockLedger, StockUnit};
use weft_core::transfer::{ReceivedItem, Transfer, TransferItem, TransferLifecycle};
use weft_core::RequestContext;
use weft_shared::types::{InvoiceId, OrderId, PaymentId, StockUnitId, TransferId, WarehouseId};

use crate::error::StoreError;
use crate::snapshot::Snapshot;
use crate::views::{OrderView, StockLevel};

#[derive(Debug, Default)]
struct State {
    orders: HashMap<OrderId, Order>,
    invoices: HashMap<InvoiceId, Invoice>,
    payments: HashMap<PaymentId, Payment>,
    allocations: AllocationLedger,
    stock: StockLedger,
    transfers: HashMap<TransferId, Transfer>,
}

/// Thread-safe in-memory store.
///
/// Reads share the lock; every write path holds it exclusively from the
/// moment it reads the aggregate it validates against until it commits.
#[derive(Debug, Default)]
pub struct InventoryStore {
    state: RwLock<State>,
}

impl InventoryStore {
    /// Creates an empty store enforcing `rules` on stock adjustments.
    #[must_use]
    pub fn new(rules: ReasonRules) -> Self {
        Self {
            state: RwLock::new(State {
                stock: StockLedger::new(rules),
                ..State::default()
            }),
        }
    }

    /// Loads a store from a snapshot.
    ///
    /// Allocations and adjustments are replayed in order against their running
    /// totals; a snapshot that over-applies an invoice, overspends a payment,
    /// drives a unit negative or references missing records is rejected.
    pub fn from_snapshot(snapshot: Snapshot, rules: ReasonRules) -> Result<Self, StoreError> {
        let Snapshot {
            orders,
            invoices,
            payments,
            allocations,
            stock_units,
            adjustments,
            transfers,
        } = snapshot;

        let orders = index("order", orders, |o| o.id)?;
        let invoices = index("invoice", invoices, |i| i.id)?;
        if let Some(orphan) = invoices.values().find(|i| !orders.contains_key(&i.order_id)) {
            return Err(StoreError::inconsistent(StoreError::not_found(
                "order",
                orphan.order_id,
            )));
        }
        let payments = index("payment", payments, |p| p.id)?;
        let allocations = AllocationLedger::replay(allocations, &payments, &invoices)
            .map_err(StoreError::inconsistent)?;
        let stock = StockLedger::from_parts(rules, stock_units, adjustments)
            .map_err(StoreError::inconsistent)?;

        let state = State {
            orders,
            invoices,
            payments,
            allocations,
            stock,
            transfers: index("transfer", transfers, |t| t.id)?,
        };
        info!(
            orders = state.orders.len(),
            invoices = state.invoices.len(),
            allocations = state.allocations.records().len(),
            adjustments = state.stock.adjustments().len(),
            "Store loaded from snapshot"
        );

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Dumps every record.
    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.read().await;
        Snapshot {
            orders: by_id(state.orders.values(), |o| o.id),
            invoices: by_id(state.invoices.values(), |i| i.id),
            payments: by_id(state.payments.values(), |p| p.id),
            allocations: state.allocations.records().to_vec(),
            stock_units: by_id(state.stock.units(), |u| u.id),
            adjustments: state.stock.adjustments().to_vec(),
            transfers: by_id(state.transfers.values(), |t| t.id),
        }
    }

    // ========== Inserts ==========

    /// Adds an order.
    pub async fn insert_order(&self, order: Order) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        insert(&mut state.orders, "order", order.id, order)
    }

    /// Adds an invoice raised against an existing order.
    pub async fn insert_invoice(&self, invoice: Invoice) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.orders.contains_key(&invoice.order_id) {
            return Err(StoreError::not_found("order", invoice.order_id));
        }
        insert(&mut state.invoices, "invoice", invoice.id, invoice)
    }

    /// Adds a payment with no allocations yet.
    pub async fn insert_payment(&self, payment: Payment) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        insert(&mut state.payments, "payment", payment.id, payment)
    }

    /// Adds a stock unit.
    pub async fn register_stock_unit(&self, unit: StockUnit) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        Ok(state.stock.register_unit(unit)?)
    }

    // ========== Orders and invoices ==========

    /// Approves a pending order.
    pub async fn approve_order(
        &self,
        ctx: &RequestContext,
        order_id: OrderId,
    ) -> Result<StatusChange, StoreError> {
        let mut state = self.state.write().await;
        let order = order_mut(&mut state, order_id)?;
        Ok(OrderLifecycle::approve(ctx, order)?)
    }

    /// Completes an in-progress order.
    pub async fn complete_order(
        &self,
        ctx: &RequestContext,
        order_id: OrderId,
    ) -> Result<StatusChange, StoreError> {
        let mut state = self.state.write().await;
        let order = order_mut(&mut state, order_id)?;
        Ok(OrderLifecycle::complete(ctx, order)?)
    }

    /// Cancels an order.
    pub async fn cancel_order(
        &self,
        ctx: &RequestContext,
        order_id: OrderId,
        reason: &str,
    ) -> Result<StatusChange, StoreError> {
        let mut state = self.state.write().await;
        let order = order_mut(&mut state, order_id)?;
        Ok(OrderLifecycle::cancel(ctx, order, reason)?)
    }

    /// Cancels an invoice that has no payments against it.
    pub async fn cancel_invoice(
        &self,
        ctx: &RequestContext,
        invoice_id: InvoiceId,
        reason: &str,
    ) -> Result<StatusChange, StoreError> {
        let mut state = self.state.write().await;
        let State {
            invoices,
            allocations,
            ..
        } = &mut *state;
        let invoice = invoices
            .get_mut(&invoice_id)
            .ok_or_else(|| StoreError::not_found("invoice", invoice_id))?;
        let amount_paid = allocations.amount_paid(invoice_id);
        Ok(InvoiceLifecycle::cancel(ctx, invoice, reason, amount_paid)?)
    }

    // ========== Payments ==========

    /// Allocates a stored payment across invoices.
    ///
    /// Outstanding balances are recomputed under the write lock, so two
    /// concurrent allocations against one invoice can never both see the same
    /// balance.
    pub async fn allocate_payment(
        &self,
        ctx: &RequestContext,
        payment_id: PaymentId,
        requests: &[AllocationRequest],
    ) -> Result<Vec<PaymentAllocation>, StoreError> {
        let mut state = self.state.write().await;
        let State {
            invoices,
            payments,
            allocations,
            ..
        } = &mut *state;
        let payment = payments
            .get(&payment_id)
            .ok_or_else(|| StoreError::not_found("payment", payment_id))?;

        let batch = AllocationEngine::allocate(ctx, payment, requests, &*invoices, &*allocations)?;
        let committed = allocations.commit(batch)?.to_vec();
        debug!(%payment_id, records = committed.len(), "Payment allocation stored");
        Ok(committed)
    }

    /// Payment position of one invoice.
    pub async fn invoice_balance(
        &self,
        invoice_id: InvoiceId,
        now: DateTime<Utc>,
    ) -> Result<InvoiceBalance, StoreError> {
        let state = self.state.read().await;
        let invoice = state
            .invoices
            .get(&invoice_id)
            .ok_or_else(|| StoreError::not_found("invoice", invoice_id))?;
        Ok(state.allocations.balance(invoice, now))
    }

    /// Payment position of every invoice, ordered by id.
    pub async fn invoice_balances(&self, now: DateTime<Utc>) -> Vec<InvoiceBalance> {
        let state = self.state.read().await;
        let mut balances: Vec<_> = state
            .invoices
            .values()
            .map(|invoice| state.allocations.balance(invoice, now))
            .collect();
        balances.sort_by_key(|b| b.invoice_id);
        balances
    }

    /// Amount left unapplied on a payment.
    pub async fn unallocated_amount(&self, payment_id: PaymentId) -> Result<Decimal, StoreError> {
        let state = self.state.read().await;
        if !state.payments.contains_key(&payment_id) {
            return Err(StoreError::not_found("payment", payment_id));
        }
        Ok(state
            .allocations
            .for_payment(payment_id)
            .filter(|a| a.target.invoice_id().is_none())
            .map(|a| a.amount_applied)
            .sum())
    }

    /// Display view of one order.
    pub async fn order_view(
        &self,
        order_id: OrderId,
        now: DateTime<Utc>,
    ) -> Result<OrderView, StoreError> {
        let state = self.state.read().await;
        let order = state
            .orders
            .get(&order_id)
            .ok_or_else(|| StoreError::not_found("order", order_id))?;
        Ok(order_view(order, now))
    }

    /// Display view of every order, ordered by id.
    pub async fn order_views(&self, now: DateTime<Utc>) -> Vec<OrderView> {
        let state = self.state.read().await;
        let mut views: Vec<_> = state.orders.values().map(|o| order_view(o, now)).collect();
        views.sort_by_key(|v| v.order_id);
        views
    }

    // ========== Stock ==========

    /// Posts a hand-entered stock adjustment.
    pub async fn record_adjustment(
        &self,
        ctx: &RequestContext,
        stock_unit_id: StockUnitId,
        quantity_adjusted: Decimal,
        reason: &str,
        adjustment_date: NaiveDate,
    ) -> Result<StockAdjustment, StoreError> {
        let mut state = self.state.write().await;
        let posted = state.stock.record_adjustment(
            ctx,
            stock_unit_id,
            quantity_adjusted,
            reason,
            adjustment_date,
        )?;
        Ok(posted.clone())
    }

    /// Current quantity of a unit.
    pub async fn stock_quantity(&self, stock_unit_id: StockUnitId) -> Result<Decimal, StoreError> {
        let state = self.state.read().await;
        Ok(state.stock.quantity_of(stock_unit_id)?)
    }

    /// Audit trail of a unit with running quantities.
    pub async fn stock_history(
        &self,
        stock_unit_id: StockUnitId,
    ) -> Result<Vec<QuantityChange>, StoreError> {
        let state = self.state.read().await;
        Ok(state.stock.history(stock_unit_id)?)
    }

    /// Current quantity of every unit, optionally limited to one warehouse.
    pub async fn stock_levels(&self, warehouse_id: Option<WarehouseId>) -> Vec<StockLevel> {
        let state = self.state.read().await;
        let mut levels: Vec<_> = state
            .stock
            .units()
            .filter(|u| warehouse_id.is_none_or(|w| u.warehouse_id == w))
            .filter_map(|u| {
                let quantity = state.stock.quantity_of(u.id).ok()?;
                Some(StockLevel {
                    stock_unit_id: u.id,
                    warehouse_id: u.warehouse_id,
                    stock_type: u.stock_type,
                    sequence_number: u.sequence_number,
                    quantity,
                })
            })
            .collect();
        levels.sort_by_key(|l| (l.warehouse_id, l.sequence_number, l.stock_unit_id));
        levels
    }

    // ========== Transfers ==========

    /// Ships stock from the context's warehouse.
    pub async fn dispatch_transfer(
        &self,
        ctx: &RequestContext,
        destination: WarehouseId,
        items: Vec<TransferItem>,
    ) -> Result<Transfer, StoreError> {
        let mut state = self.state.write().await;
        let transfer = TransferLifecycle::dispatch(ctx, destination, items, &mut state.stock)?;
        state.transfers.insert(transfer.id, transfer.clone());
        Ok(transfer)
    }

    /// Receives a transfer at its destination.
    pub async fn complete_transfer(
        &self,
        ctx: &RequestContext,
        transfer_id: TransferId,
        received: &[ReceivedItem],
    ) -> Result<StatusChange, StoreError> {
        let mut state = self.state.write().await;
        let State {
            transfers, stock, ..
        } = &mut *state;
        let transfer = transfers
            .get_mut(&transfer_id)
            .ok_or_else(|| StoreError::not_found("transfer", transfer_id))?;
        Ok(TransferLifecycle::complete(ctx, transfer, received, stock)?)
    }

    /// Cancels a transfer and returns its stock to the source units.
    pub async fn cancel_transfer(
        &self,
        ctx: &RequestContext,
        transfer_id: TransferId,
        reason: &str,
    ) -> Result<StatusChange, StoreError> {
        let mut state = self.state.write().await;
        let State {
            transfers, stock, ..
        } = &mut *state;
        let transfer = transfers
            .get_mut(&transfer_id)
            .ok_or_else(|| StoreError::not_found("transfer", transfer_id))?;
        Ok(TransferLifecycle::cancel(ctx, transfer, reason, stock)?)
    }

    /// Looks up a transfer.
    pub async fn transfer(&self, transfer_id: TransferId) -> Result<Transfer, StoreError> {
        let state = self.state.read().await;
        state
            .transfers
            .get(&transfer_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("transfer", transfer_id))
    }
}

fn order_mut(state: &mut State, order_id: OrderId) -> Result<&mut Order, StoreError> {
    state
        .orders
        .get_mut(&order_id)
        .ok_or_else(|| StoreError::not_found("order", order_id))
}

fn order_view(order: &Order, now: DateTime<Utc>) -> OrderView {
    let financials = order.financials();
    OrderView {
        order_id: order.id,
        kind: order.kind,
        status: StatusDeriver::derive_order_status(order, now),
        financials,
        warnings: financials.warnings(),
    }
}

fn insert<K, V>(
    map: &mut HashMap<K, V>,
    entity: &'static str,
    id: K,
    value: V,
) -> Result<(), StoreError>
where
    K: std::hash::Hash + Eq + std::fmt::Display,
{
    if map.contains_key(&id) {
        warn!(entity, %id, "Rejected duplicate insert");
        return Err(StoreError::duplicate(entity, id));
    }
    map.insert(id, value);
    Ok(())
}

fn index<K, V>(
    entity: &'static str,
    records: Vec<V>,
    key: impl Fn(&V) -> K,
) -> Result<HashMap<K, V>, StoreError>
where
    K: std::hash::Hash + Eq + std::fmt::Display,
{
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        insert(&mut map, entity, key(&record), record)?;
    }
    Ok(map)
}

fn by_id<'a, V, K>(values: impl Iterator<Item = &'a V>, key: impl Fn(&V) -> K) -> Vec<V>
where
    V: Clone + 'a,
    K: Ord,
{
    let mut records: Vec<V> = values.cloned().collect();
    records.sort_by_key(|r| key(r));
    records
}
