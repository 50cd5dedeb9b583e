//! Fiscal-year totals.
//!
//! - `totals` - column sums, per-class and per-month breakdowns
//! - `view` - totals published only while their generation is current

pub mod totals;
pub mod view;

#[cfg(test)]
mod props;

pub use totals::{Totals, aggregate, aggregate_by_class, aggregate_by_month};
pub use view::{TotalsView, YearTotals};
