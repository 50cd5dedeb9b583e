//! Property-based tests for the ledger store.
//!
//! - Year isolation: a year's records never include another year's
//! - Selection: a snapshot always pairs the selected year with its records

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::partition::FiscalYearWindow;
use super::record::fixtures::input;
use super::store::LedgerStore;

fn store() -> LedgerStore {
    LedgerStore::new(FiscalYearWindow::new(2020, 2025).unwrap(), 2025).unwrap()
}

/// (fiscal year, premium in cents) pairs.
fn entries() -> impl Strategy<Value = Vec<(i32, i64)>> {
    prop::collection::vec((2020i32..=2025, 0i64..10_000_000i64), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// `records_for(year)` holds exactly the records added for that year.
    #[test]
    fn prop_records_for_is_year_isolated(entries in entries()) {
        let store = store();
        for (n, (year, cents)) in entries.iter().enumerate() {
            let mut new = input(&format!("Insured {n}"), "SIC", Decimal::new(*cents, 2));
            new.fiscal_year = Some(*year);
            store.add(new).unwrap();
        }

        for &year in store.years() {
            let records = store.records_for(year).unwrap();
            prop_assert!(records.iter().all(|record| record.fiscal_year() == year));
            prop_assert_eq!(
                records.len(),
                entries.iter().filter(|(entry_year, _)| *entry_year == year).count()
            );
        }
        prop_assert_eq!(store.len(), entries.len());
    }

    /// Every selection returns the chosen year's records and nothing else.
    #[test]
    fn prop_select_year_pairs_year_with_records(
        entries in entries(),
        selections in prop::collection::vec(2018i32..=2027, 1..10),
    ) {
        let store = store();
        for (year, cents) in &entries {
            let mut new = input("Insured", "SIC", Decimal::new(*cents, 2));
            new.fiscal_year = Some(*year);
            store.add(new).unwrap();
        }

        for year in selections {
            let before = store.selection();
            match store.select_year(year) {
                Ok(snapshot) => {
                    prop_assert_eq!(snapshot.year, year);
                    prop_assert!(snapshot.records.iter().all(|record| record.fiscal_year() == year));
                    prop_assert_eq!(store.selected_year(), year);
                    prop_assert!(snapshot.generation > before.generation);
                }
                Err(_) => {
                    prop_assert!(!(2020..=2025).contains(&year));
                    prop_assert_eq!(store.selection(), before);
                }
            }
        }
    }
}
