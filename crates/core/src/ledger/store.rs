//! In-memory ledger store.
//!
//! The store is the single write path for ledger records: it resolves the
//! fiscal year, id and policy number, builds the record through the
//! commission calculator, and appends it to the fiscal-year partition.
//! Persistence belongs to the caller; the store only holds what it is given.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use premia_shared::AppConfig;
use premia_shared::types::{Currency, RecordId};
use tracing::{debug, info};

use super::error::LedgerError;
use super::partition::{FiscalYearPartition, FiscalYearWindow, Selection, YearSnapshot};
use super::record::{LedgerRecord, NewLedgerRecord, RecordContext};
use crate::aggregate::{Totals, aggregate};
use crate::calculation::{CommissionBreakdown, CommissionRates, TaxBreakdown, TaxRates};
use crate::filter::{RecordFilter, filter};

/// Ledger store: id index over a fiscal-year partition.
///
/// All methods take `&self`; share the store behind an `Arc`.
#[derive(Debug)]
pub struct LedgerStore {
    partition: FiscalYearPartition,
    index: DashMap<RecordId, i32>,
    rates: CommissionRates,
    tax_rates: TaxRates,
    currency: Currency,
    /// Last generated policy number per fiscal year.
    policy_sequences: DashMap<i32, u64>,
}

impl LedgerStore {
    /// Creates an empty store with default rates and currency.
    ///
    /// # Errors
    ///
    /// Returns an error if `initial_year` is outside `window`.
    pub fn new(window: FiscalYearWindow, initial_year: i32) -> Result<Self, LedgerError> {
        Self::with_settings(
            window,
            initial_year,
            CommissionRates::default(),
            Currency::default(),
        )
    }

    /// Creates an empty store with explicit levy rate and currency label.
    ///
    /// # Errors
    ///
    /// Returns an error if `initial_year` is outside `window`.
    pub fn with_settings(
        window: FiscalYearWindow,
        initial_year: i32,
        rates: CommissionRates,
        currency: Currency,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            partition: FiscalYearPartition::new(window, initial_year)?,
            index: DashMap::new(),
            rates,
            tax_rates: TaxRates::default(),
            currency,
            policy_sequences: DashMap::new(),
        })
    }

    /// Replaces the VAT/NHIL/GETFund rates used by [`LedgerStore::tax_breakdown`].
    #[must_use]
    pub fn with_tax_rates(mut self, tax_rates: TaxRates) -> Self {
        self.tax_rates = tax_rates;
        self
    }

    /// Creates an empty store from application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured window is empty or the configured
    /// selected year is outside it.
    pub fn from_config(config: &AppConfig) -> Result<Self, LedgerError> {
        Ok(Self::with_settings(
            FiscalYearWindow::from_config(&config.fiscal)?,
            config.fiscal.initial_year(),
            CommissionRates::from(&config.rates),
            Currency::new(&config.currency),
        )?
        .with_tax_rates(TaxRates::from(&config.rates)))
    }

    /// Validates and appends a new record.
    ///
    /// Assigns the selected fiscal year when the input has none, a fresh id
    /// when the input has none, and a policy number when it is blank.
    ///
    /// # Errors
    ///
    /// Returns a validation error for negative, oversized or over-precise amounts, rates
    /// outside `[0, 1]`, malformed dates, an unsupported fiscal year, or a
    /// caller-supplied id that is already taken.
    pub fn add(&self, input: NewLedgerRecord) -> Result<LedgerRecord, LedgerError> {
        self.insert(input, None)
    }

    /// Appends a record superseding `original`.
    ///
    /// The correction stays in the original's fiscal year; the original is
    /// left in place and can be hidden with [`RecordFilter::current_only`].
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::RecordNotFound` if `original` does not exist,
    /// `LedgerError::FiscalYearMismatch` if the input names another year, or
    /// any error [`LedgerStore::add`] can return.
    pub fn correct(
        &self,
        original: &RecordId,
        mut input: NewLedgerRecord,
    ) -> Result<LedgerRecord, LedgerError> {
        let previous = self.get(original)?;
        match input.fiscal_year {
            Some(year) if year != previous.fiscal_year() => {
                return Err(LedgerError::FiscalYearMismatch {
                    expected: previous.fiscal_year(),
                    got: year,
                });
            }
            _ => input.fiscal_year = Some(previous.fiscal_year()),
        }
        self.insert(input, Some(original.clone()))
    }

    /// Looks up a record by id.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::RecordNotFound` if no record has this id.
    pub fn get(&self, id: &RecordId) -> Result<LedgerRecord, LedgerError> {
        let year = self
            .index
            .get(id)
            .map(|entry| *entry.value())
            .ok_or_else(|| LedgerError::RecordNotFound(id.clone()))?;

        self.partition
            .find(year, id)
            .ok_or_else(|| LedgerError::RecordNotFound(id.clone()))
    }

    /// Tax line items of a record's premium at the store's tax rates.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::RecordNotFound` if no record has this id.
    pub fn tax_breakdown(&self, id: &RecordId) -> Result<TaxBreakdown, LedgerError> {
        self.get(id)?.tax_breakdown_with(&self.tax_rates)
    }

    /// Commission components of a record, withholding included.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::RecordNotFound` if no record has this id.
    pub fn commission_breakdown(&self, id: &RecordId) -> Result<CommissionBreakdown, LedgerError> {
        self.get(id)?.commission_with_withholding(self.rates.withholding)
    }

    /// Switches the selected fiscal year and returns its records atomically.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnsupportedFiscalYear` if `year` is outside the
    /// window; the selection is not changed.
    pub fn select_year(&self, year: i32) -> Result<YearSnapshot, LedgerError> {
        let snapshot = self.partition.select(year)?;
        info!(
            fiscal_year = snapshot.year,
            generation = snapshot.generation,
            records = snapshot.records.len(),
            "Fiscal year selected"
        );
        Ok(snapshot)
    }

    /// Currently selected fiscal year.
    #[must_use]
    pub fn selected_year(&self) -> i32 {
        self.partition.selection().year
    }

    /// Current selection and generation.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.partition.selection()
    }

    /// Consistent copy of the selected year's records.
    #[must_use]
    pub fn snapshot(&self) -> YearSnapshot {
        self.partition.snapshot()
    }

    /// Supported fiscal years, most recent first.
    #[must_use]
    pub fn years(&self) -> &[i32] {
        self.partition.window().years()
    }

    /// Records of `year`, insertion order.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnsupportedFiscalYear` if `year` is outside the window.
    pub fn records_for(&self, year: i32) -> Result<Vec<LedgerRecord>, LedgerError> {
        let year = self.partition.window().ensure_supported(year)?;
        Ok(self.partition.records_for(year))
    }

    /// Records of `year` narrowed by `criteria`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnsupportedFiscalYear` if `year` is outside the window.
    pub fn query(
        &self,
        year: i32,
        criteria: &RecordFilter,
    ) -> Result<Vec<LedgerRecord>, LedgerError> {
        let records = self.records_for(year)?;
        Ok(filter(&records, criteria))
    }

    /// Totals of `year` after filtering by `criteria`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnsupportedFiscalYear` if `year` is outside the window.
    pub fn totals(&self, year: i32, criteria: &RecordFilter) -> Result<Totals, LedgerError> {
        Ok(aggregate(&self.query(year, criteria)?))
    }

    /// Runs `publish` only if nothing changed since `generation`.
    ///
    /// `publish` runs under the selection lock and must not call back into
    /// the store.
    pub(crate) fn publish_if_current<F: FnOnce()>(&self, generation: u64, publish: F) -> bool {
        self.partition.publish_if_current(generation, publish)
    }

    /// Total number of records across all years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn insert(
        &self,
        mut input: NewLedgerRecord,
        corrects: Option<RecordId>,
    ) -> Result<LedgerRecord, LedgerError> {
        let fiscal_year = match input.fiscal_year {
            Some(year) => year,
            None => self.selected_year(),
        };
        let fiscal_year = self.partition.window().ensure_supported(fiscal_year)?;

        let id = input.id.take().unwrap_or_default();
        // The vacant entry holds its shard lock until the record is in the
        // partition, so a concurrent add with the same id cannot interleave.
        let Entry::Vacant(slot) = self.index.entry(id.clone()) else {
            return Err(LedgerError::DuplicateRecord(id));
        };
        input.id = Some(id);

        let generates_number = input
            .policy_number
            .as_deref()
            .is_none_or(|number| number.trim().is_empty());
        // Held until the record validates, so rejected inputs and
        // caller-numbered policies leave no gap in the year's sequence.
        let mut sequence = self.policy_sequences.entry(fiscal_year).or_insert(0);
        let next = *sequence + 1;

        let record = LedgerRecord::from_input(
            input,
            RecordContext {
                fiscal_year,
                rates: self.rates,
                currency: self.currency.clone(),
                policy_sequence: next,
                corrects,
            },
        )?;
        if generates_number {
            *sequence = next;
        }
        drop(sequence);

        let selection = self.partition.insert(record.clone());
        slot.insert(fiscal_year);

        debug!(
            record_id = %record.id(),
            fiscal_year,
            policy_number = record.policy_number(),
            premium = %record.premium(),
            corrects = ?record.corrects().map(RecordId::as_str),
            generation = selection.generation,
            "Ledger record added"
        );
        Ok(record)
    }
}
