//! Builds and renders the derived view of a snapshot.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use weft_core::payment::InvoiceBalance;
use weft_shared::types::{format_currency, WarehouseId};
use weft_store::{InventoryStore, OrderView, StockLevel};

/// Everything the report prints, computed at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Instant the display statuses were derived at.
    pub as_of: DateTime<Utc>,
    /// Orders with display status and pricing.
    pub orders: Vec<OrderView>,
    /// Invoice payment positions.
    pub invoices: Vec<InvoiceBalance>,
    /// Stock unit quantities.
    pub stock: Vec<StockLevel>,
}

impl Report {
    /// Reads every view from the store.
    pub async fn build(
        store: &InventoryStore,
        now: DateTime<Utc>,
        warehouse_id: Option<WarehouseId>,
    ) -> Self {
        Self {
            as_of: now,
            orders: store.order_views(now).await,
            invoices: store.invoice_balances(now).await,
            stock: store.stock_levels(warehouse_id).await,
        }
    }

    /// Plain-text rendering, amounts formatted with `symbol`.
    #[must_use]
    pub fn render_text(&self, symbol: &str) -> String {
        let mut out = String::new();
        let money = |amount| format_currency(amount, symbol);

        let _ = writeln!(out, "As of {}", self.as_of.format("%Y-%m-%d %H:%M UTC"));

        let _ = writeln!(out, "\nOrders ({})", self.orders.len());
        for order in &self.orders {
            let f = order.financials.rounded();
            let _ = writeln!(
                out,
                "  {}  {:<8}  {:<16}  total {}  (discount {}, GST {})",
                order.order_id,
                order.kind.as_str(),
                order.status.label(),
                money(f.total_amount),
                money(f.discount_amount),
                money(f.gst_amount),
            );
            for warning in &order.warnings {
                let _ = writeln!(out, "    ! {warning}");
            }
        }

        let _ = writeln!(out, "\nInvoices ({})", self.invoices.len());
        for invoice in &self.invoices {
            let _ = writeln!(
                out,
                "  {}  {:<16}  paid {} of {}, outstanding {}",
                invoice.invoice_id,
                invoice.status.label(),
                money(invoice.amount_paid),
                money(invoice.total_amount),
                money(invoice.outstanding),
            );
        }

        let _ = writeln!(out, "\nStock ({})", self.stock.len());
        for level in &self.stock {
            let _ = writeln!(
                out,
                "  {}  #{:<4}  {:<6}  {}",
                level.warehouse_id,
                level.sequence_number,
                level.stock_type.as_str(),
                level.quantity.normalize(),
            );
        }

        out
    }
}
