//! Premia fiscal-year report
//!
//! Loads ledger records from a JSON file, selects a fiscal year, applies an
//! optional search query, and prints the year's totals as JSON.
//!
//! Usage: `premia-report <records.json> [year] [query]`

use std::fs;

use anyhow::{Context, bail};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use premia_core::{LedgerStore, NewLedgerRecord, RecordFilter, TotalsView, YearTotals};
use premia_shared::AppConfig;

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "premia=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: premia-report <records.json> [year] [query]");
    };
    let year = args
        .next()
        .map(|year| year.parse::<i32>())
        .transpose()
        .context("year must be a number")?;
    let query = args.collect::<Vec<_>>().join(" ");

    // Load configuration
    let config = AppConfig::load()?;
    let store = LedgerStore::from_config(&config)?;

    let raw = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let inputs: Vec<NewLedgerRecord> =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {path}"))?;

    for (index, input) in inputs.into_iter().enumerate() {
        store
            .add(input)
            .with_context(|| format!("record #{} in {path} rejected", index + 1))?;
    }
    info!(records = store.len(), path = %path, "Ledger loaded");

    let snapshot = match year {
        Some(year) => store.select_year(year)?,
        None => store.snapshot(),
    };

    let criteria = if query.trim().is_empty() {
        RecordFilter::new()
    } else {
        RecordFilter::new().with_query(query)
    };

    let view = TotalsView::new();
    if !view.publish(&store, YearTotals::compute(&snapshot, &criteria)) {
        bail!("ledger changed while computing totals for {}", snapshot.year);
    }
    let Some(report) = view.current() else {
        bail!("no totals published for {}", snapshot.year);
    };
    report.totals.verify_reconciles()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "year": report.year,
            "currency": config.currency,
            "filter": report.filter,
            "totals": report.totals,
            "by_class": report.by_class,
        }))?
    );

    Ok(())
}
