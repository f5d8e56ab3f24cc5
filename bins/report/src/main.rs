//! Weft report
//!
//! Loads an inventory snapshot and prints derived order, invoice and stock views.

mod report;

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weft_core::stock::ReasonRules;
use weft_core::{Clock, SystemClock};
use weft_shared::types::WarehouseId;
use weft_shared::AppConfig;
use weft_store::{InventoryStore, Snapshot};

use crate::report::Report;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "weft-report", about = "Print derived views of an inventory snapshot")]
struct Args {
    /// Snapshot JSON file.
    snapshot: PathBuf,

    /// Evaluate statuses at midnight UTC of this date instead of now.
    #[arg(long, value_name = "YYYY-MM-DD")]
    as_of: Option<NaiveDate>,

    /// Only list stock held in this warehouse.
    #[arg(short, long)]
    warehouse: Option<WarehouseId>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: Format,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let json = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("failed to read {}", args.snapshot.display()))?;
    let snapshot = Snapshot::from_json(&json)?;
    let store = InventoryStore::from_snapshot(snapshot, ReasonRules::from(&config.stock))?;

    let now = match args.as_of {
        Some(date) => date.and_time(NaiveTime::MIN).and_utc(),
        None => SystemClock.now(),
    };
    let report = Report::build(&store, now, args.warehouse).await;
    info!(
        orders = report.orders.len(),
        invoices = report.invoices.len(),
        stock_units = report.stock.len(),
        "Report built"
    );

    match args.format {
        Format::Text => print!("{}", report.render_text(&config.finance.currency_symbol)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
