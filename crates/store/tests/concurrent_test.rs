//! Concurrent access tests for the write paths.
//!
//! Many tasks race to allocate payments against the same invoice or to draw
//! down the same stock unit. Whatever the interleaving, the invoice is never
//! over-applied and the unit never goes negative.

#![allow(clippy::cast_possible_truncation)]

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;
use weft_core::finance::DiscountType;
use weft_core::order::{Invoice, Order, OrderKind};
use weft_core::payment::{AllocationRequest, Payment, PaymentMode};
use weft_core::status::{InvoiceDisplayStatus, InvoiceStatus, OrderStatus};
use weft_core::stock::{ReasonRules, StockType, StockUnit};
use weft_core::{FixedClock, RequestContext};
use weft_shared::types::{InvoiceId, OrderId, PaymentId, StockUnitId, UserId, WarehouseId};
use weft_store::InventoryStore;

const TASKS: usize = 20;

fn ctx(warehouse_id: WarehouseId) -> RequestContext {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap());
    RequestContext::new(UserId::new(), warehouse_id, &clock)
}

async fn store_with_invoice(total: Decimal) -> (Arc<InventoryStore>, InvoiceId) {
    let store = InventoryStore::new(ReasonRules::default());
    let order = Order {
        id: OrderId::new(),
        kind: OrderKind::Purchase,
        warehouse_id: WarehouseId::new(),
        status: OrderStatus::InProgress,
        due_date: None,
        item_total: total,
        discount_type: DiscountType::None,
        discount_value: Decimal::ZERO,
        gst_rate: Decimal::ZERO,
        cancelled_reason: None,
    };
    let invoice = Invoice {
        id: InvoiceId::new(),
        order_id: order.id,
        total_amount: total,
        due_date: None,
        status: InvoiceStatus::Open,
        cancelled_reason: None,
    };
    let invoice_id = invoice.id;
    store.insert_order(order).await.unwrap();
    store.insert_invoice(invoice).await.unwrap();
    (Arc::new(store), invoice_id)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_allocations_never_over_apply() {
    let (store, invoice_id) = store_with_invoice(dec!(1000)).await;
    let barrier = Arc::new(Barrier::new(TASKS));

    let handles = (0..TASKS).map(|_| {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            let payment = Payment {
                id: PaymentId::new(),
                mode: PaymentMode::BankTransfer,
                amount: dec!(150),
                received_on: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            };
            let payment_id = payment.id;
            store.insert_payment(payment).await.unwrap();

            barrier.wait().await;
            store
                .allocate_payment(
                    &ctx(WarehouseId::new()),
                    payment_id,
                    &[AllocationRequest::against(invoice_id, dec!(150))],
                )
                .await
        })
    });

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 6, "1000 / 150 admits exactly six allocations");
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.error_code(), "OUTSTANDING_EXCEEDED");
        assert!(err.is_retryable());
    }

    let now = Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap();
    let balance = store.invoice_balance(invoice_id, now).await.unwrap();
    assert_eq!(balance.amount_paid, dec!(900));
    assert_eq!(balance.outstanding, dec!(100));
    assert_eq!(balance.status, InvoiceDisplayStatus::PartiallyPaid);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adjustments_never_go_negative() {
    let store = Arc::new(InventoryStore::new(ReasonRules::default()));
    let warehouse = WarehouseId::new();
    let unit = StockUnit {
        id: StockUnitId::new(),
        warehouse_id: warehouse,
        stock_type: StockType::Piece,
        sequence_number: 1,
        base_quantity: dec!(50),
    };
    let unit_id = unit.id;
    store.register_stock_unit(unit).await.unwrap();
    let barrier = Arc::new(Barrier::new(TASKS));

    let handles = (0..TASKS).map(|_| {
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        tokio::spawn(async move {
            let ctx = ctx(warehouse);
            barrier.wait().await;
            store
                .record_adjustment(&ctx, unit_id, dec!(-7), "cut for order", ctx.today())
                .await
        })
    });

    let succeeded = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .filter(Result::is_ok)
        .count();

    assert_eq!(succeeded, 7);
    let quantity = store.stock_quantity(unit_id).await.unwrap();
    assert_eq!(quantity, dec!(50) - dec!(7) * Decimal::from(succeeded as u32));
    assert_eq!(quantity, dec!(1));

    let history = store.stock_history(unit_id).await.unwrap();
    assert_eq!(history.len(), succeeded);
    assert!(history.iter().all(|step| step.quantity_after >= Decimal::ZERO));
}
