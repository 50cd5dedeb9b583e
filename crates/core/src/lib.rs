//! Core business logic for Premia.
//!
//! This crate contains the premium, commission, and fiscal-ledger engine with
//! ZERO web, UI, or storage dependencies. Monetary values are `Decimal`
//! throughout and rounded half-up to two places.
//!
//! # Modules
//!
//! - `calculation` - Tax breakdown and commission arithmetic
//! - `ledger` - Ledger records, fiscal-year partition, and the in-memory store
//! - `filter` - Text search and predicate filtering over records
//! - `aggregate` - Fiscal-year totals and their published view

pub mod aggregate;
pub mod calculation;
pub mod filter;
pub mod ledger;

pub use aggregate::{
    Totals, TotalsView, YearTotals, aggregate, aggregate_by_class, aggregate_by_month,
};
pub use calculation::{
    CalculationError, CommissionBreakdown, CommissionRates, TaxBreakdown, TaxRates,
    compute_commission, compute_reconciled_tax_breakdown, compute_tax_breakdown,
};
pub use filter::{RecordFilter, filter};
pub use ledger::{
    BusinessClass, FiscalYearWindow, LedgerError, LedgerRecord, LedgerStore, NewLedgerRecord,
    YearSnapshot,
};
