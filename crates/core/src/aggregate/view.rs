//! Published totals for the selected fiscal year.
//!
//! Totals are computed off-lock from a [`YearSnapshot`] and only published if
//! the store's generation has not moved since the snapshot was taken. A
//! result computed for a year the user has already switched away from is
//! dropped rather than shown under the new year.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use tracing::warn;

use super::totals::{Totals, aggregate, aggregate_by_class};
use crate::filter::{RecordFilter, filter};
use crate::ledger::{BusinessClass, LedgerStore, YearSnapshot};

/// Totals of one fiscal year at one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTotals {
    /// Fiscal year the totals belong to.
    pub year: i32,
    /// Store generation the totals were computed at.
    pub generation: u64,
    /// Filter applied before summing.
    pub filter: RecordFilter,
    /// Overall totals.
    pub totals: Totals,
    /// Totals per business class.
    pub by_class: BTreeMap<BusinessClass, Totals>,
}

impl YearTotals {
    /// Filters and sums a snapshot.
    #[must_use]
    pub fn compute(snapshot: &YearSnapshot, criteria: &RecordFilter) -> Self {
        let records = filter(&snapshot.records, criteria);
        Self {
            year: snapshot.year,
            generation: snapshot.generation,
            filter: criteria.clone(),
            totals: aggregate(&records),
            by_class: aggregate_by_class(&records),
        }
    }
}

/// Holds the last totals published for the selected year.
#[derive(Debug, Default)]
pub struct TotalsView {
    published: RwLock<Option<YearTotals>>,
}

impl TotalsView {
    /// Creates an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `totals` if `store` has not changed since they were computed.
    ///
    /// Returns false, leaving the view untouched, for stale totals.
    pub fn publish(&self, store: &LedgerStore, totals: YearTotals) -> bool {
        let year = totals.year;
        let generation = totals.generation;

        let published = store.publish_if_current(generation, || {
            *self
                .published
                .write()
                .unwrap_or_else(PoisonError::into_inner) = Some(totals);
        });

        if !published {
            let current = store.selection();
            warn!(
                fiscal_year = year,
                generation,
                current_year = current.year,
                current_generation = current.generation,
                "Discarding stale totals"
            );
        }
        published
    }

    /// Snapshots the selected year, computes its totals, and publishes them.
    ///
    /// Returns the totals if they were published.
    pub fn refresh(&self, store: &LedgerStore, criteria: &RecordFilter) -> Option<YearTotals> {
        let totals = YearTotals::compute(&store.snapshot(), criteria);
        self.publish(store, totals.clone()).then_some(totals)
    }

    /// The last published totals, if any.
    #[must_use]
    pub fn current(&self) -> Option<YearTotals> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
