//! Record search and filtering.
//!
//! A free-text query is matched case-insensitively as a substring of the
//! insured name, policy number, or insurer name. Insurer and business-class
//! predicates narrow the result further. All constraints are ANDed; an
//! empty filter returns its input unchanged.

use std::collections::HashSet;

use premia_shared::types::RecordId;
use serde::{Deserialize, Serialize};

use crate::ledger::{BusinessClass, LedgerRecord};

/// Search criteria for ledger records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Free-text search; blank means no text constraint.
    #[serde(default)]
    pub query: Option<String>,
    /// Insurer name, compared case-insensitively.
    #[serde(default)]
    pub insurer: Option<String>,
    /// Exact business class.
    #[serde(default)]
    pub business_class: Option<BusinessClass>,
    /// Hide records that a later correction supersedes.
    #[serde(default)]
    pub current_only: bool,
}

impl RecordFilter {
    /// Creates a new empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Restricts results to one insurer.
    #[must_use]
    pub fn with_insurer(mut self, insurer: impl Into<String>) -> Self {
        self.insurer = Some(insurer.into());
        self
    }

    /// Restricts results to one business class.
    #[must_use]
    pub fn with_business_class(mut self, class: BusinessClass) -> Self {
        self.business_class = Some(class);
        self
    }

    /// Sets whether superseded records are hidden.
    #[must_use]
    pub const fn current_only(mut self, current_only: bool) -> Self {
        self.current_only = current_only;
        self
    }

    /// Returns true if the filter is empty (matches everything).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text().is_none()
            && self.insurer_name().is_none()
            && self.business_class.is_none()
            && !self.current_only
    }

    /// Returns true if `record` passes the text, insurer, and class predicates.
    ///
    /// Supersession needs the whole set and is only applied by [`filter`].
    #[must_use]
    pub fn matches(&self, record: &LedgerRecord) -> bool {
        if let Some(class) = &self.business_class
            && record.business_class() != class
        {
            return false;
        }

        if let Some(insurer) = self.insurer_name()
            && record.insurer_name().trim().to_lowercase() != insurer.to_lowercase()
        {
            return false;
        }

        match self.text() {
            None => true,
            Some(query) => {
                let needle = query.to_lowercase();
                [
                    record.insured_name(),
                    record.policy_number(),
                    record.insurer_name(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }

    fn text(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    fn insurer_name(&self) -> Option<&str> {
        non_blank(self.insurer.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Returns the records matching `criteria`, preserving order.
#[must_use]
pub fn filter(records: &[LedgerRecord], criteria: &RecordFilter) -> Vec<LedgerRecord> {
    if criteria.is_empty() {
        return records.to_vec();
    }

    let superseded: HashSet<&RecordId> = if criteria.current_only {
        records.iter().filter_map(LedgerRecord::corrects).collect()
    } else {
        HashSet::new()
    };

    records
        .iter()
        .filter(|record| !superseded.contains(record.id()))
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod props;
