//! Fiscal-year partition index.
//!
//! Records are grouped by fiscal year. The partition also owns the selected
//! year and a generation counter; every mutation that can change what a
//! reader of the selected year sees (switching the year, or a record landing
//! in it) bumps the generation while holding the selection write lock.
//!
//! Lock order is always selection first, then the record map. Readers that
//! need a consistent view of "selected year + its records" take the
//! selection lock for the duration of the copy, so they never observe the
//! new year flag paired with the old year's records.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;
use premia_shared::config::FiscalConfig;
use premia_shared::types::RecordId;
use serde::Serialize;

use super::error::LedgerError;
use super::record::LedgerRecord;

/// Supported fiscal years, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiscalYearWindow {
    years: Vec<i32>,
}

impl FiscalYearWindow {
    /// Creates the window `first..=last`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidFiscalWindow` if `first > last`.
    pub fn new(first: i32, last: i32) -> Result<Self, LedgerError> {
        if first > last {
            return Err(LedgerError::InvalidFiscalWindow { first, last });
        }
        Ok(Self {
            years: (first..=last).rev().collect(),
        })
    }

    /// Creates the window from configuration.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidFiscalWindow` if the configured range is empty.
    pub fn from_config(config: &FiscalConfig) -> Result<Self, LedgerError> {
        Self::new(config.first_year, config.last_year)
    }

    /// Supported years, descending.
    #[must_use]
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Most recent supported year.
    #[must_use]
    pub fn latest(&self) -> i32 {
        self.years[0]
    }

    /// Earliest supported year.
    #[must_use]
    pub fn earliest(&self) -> i32 {
        self.years[self.years.len() - 1]
    }

    /// Returns true if `year` is supported.
    #[must_use]
    pub fn contains(&self, year: i32) -> bool {
        (self.earliest()..=self.latest()).contains(&year)
    }

    /// Rejects years outside the window.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnsupportedFiscalYear`.
    pub fn ensure_supported(&self, year: i32) -> Result<i32, LedgerError> {
        if self.contains(year) {
            Ok(year)
        } else {
            Err(LedgerError::UnsupportedFiscalYear {
                year,
                first: self.earliest(),
                last: self.latest(),
            })
        }
    }
}

/// The selected year and the generation it was observed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Selected fiscal year.
    pub year: i32,
    /// Monotonic counter, bumped on every change visible to the selected year.
    pub generation: u64,
}

/// A consistent copy of one fiscal year's records.
#[derive(Debug, Clone, Serialize)]
pub struct YearSnapshot {
    /// The fiscal year.
    pub year: i32,
    /// Partition generation when the copy was taken.
    pub generation: u64,
    /// The year's records, in insertion order.
    pub records: Vec<LedgerRecord>,
}

/// Maps fiscal years to their records and tracks the selected year.
#[derive(Debug)]
pub struct FiscalYearPartition {
    window: FiscalYearWindow,
    selection: RwLock<Selection>,
    records: DashMap<i32, Vec<LedgerRecord>>,
}

impl FiscalYearPartition {
    /// Creates an empty partition with `initial_year` selected.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnsupportedFiscalYear` if `initial_year` is outside the window.
    pub fn new(window: FiscalYearWindow, initial_year: i32) -> Result<Self, LedgerError> {
        let year = window.ensure_supported(initial_year)?;
        Ok(Self {
            window,
            selection: RwLock::new(Selection {
                year,
                generation: 0,
            }),
            records: DashMap::new(),
        })
    }

    /// The supported-year window.
    #[must_use]
    pub fn window(&self) -> &FiscalYearWindow {
        &self.window
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        *self.read_selection()
    }

    /// Selects `year` and returns its records, atomically.
    ///
    /// On failure the selection and generation are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnsupportedFiscalYear` if `year` is outside the window.
    pub fn select(&self, year: i32) -> Result<YearSnapshot, LedgerError> {
        let year = self.window.ensure_supported(year)?;

        let mut selection = self.write_selection();
        selection.year = year;
        selection.generation += 1;

        Ok(self.copy_year(*selection))
    }

    /// Copies the selected year's records together with the selection.
    #[must_use]
    pub fn snapshot(&self) -> YearSnapshot {
        let selection = self.read_selection();
        self.copy_year(*selection)
    }

    /// Records of `year` in insertion order. Empty for years with no records.
    #[must_use]
    pub fn records_for(&self, year: i32) -> Vec<LedgerRecord> {
        self.records
            .get(&year)
            .map(|records| records.value().clone())
            .unwrap_or_default()
    }

    /// Finds a record by id within `year`.
    #[must_use]
    pub fn find(&self, year: i32, id: &RecordId) -> Option<LedgerRecord> {
        self.records
            .get(&year)
            .and_then(|records| records.iter().find(|record| record.id() == id).cloned())
    }

    /// Total number of records across all years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.iter().map(|entry| entry.value().len()).sum()
    }

    /// Returns true if no records have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if nothing has changed since `generation` was observed.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.read_selection().generation == generation
    }

    /// Runs `publish` only if `generation` is still current.
    ///
    /// The selection read lock is held while `publish` runs, so no year switch
    /// or insert can slip in between the check and the publication. `publish`
    /// must not touch the partition or the store that owns it.
    pub(crate) fn publish_if_current<F: FnOnce()>(&self, generation: u64, publish: F) -> bool {
        let selection = self.read_selection();
        if selection.generation != generation {
            return false;
        }
        publish();
        true
    }

    /// Appends a record to its fiscal year.
    ///
    /// The record's year must already be validated against the window.
    pub(crate) fn insert(&self, record: LedgerRecord) -> Selection {
        let mut selection = self.write_selection();
        if record.fiscal_year() == selection.year {
            selection.generation += 1;
        }
        self.records
            .entry(record.fiscal_year())
            .or_default()
            .push(record);
        *selection
    }

    fn copy_year(&self, selection: Selection) -> YearSnapshot {
        YearSnapshot {
            year: selection.year,
            generation: selection.generation,
            records: self.records_for(selection.year),
        }
    }

    fn read_selection(&self) -> RwLockReadGuard<'_, Selection> {
        self.selection.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_selection(&self) -> RwLockWriteGuard<'_, Selection> {
        self.selection.write().unwrap_or_else(PoisonError::into_inner)
    }
}
