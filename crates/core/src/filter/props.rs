//! Property-based tests for record filtering.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::{RecordFilter, filter};
use crate::ledger::LedgerRecord;
use crate::ledger::record::fixtures::{input, record};

const INSURERS: [&str; 4] = ["GLICO GEN", "Enterprise", "SIC", "Hollard"];

fn records() -> impl Strategy<Value = Vec<LedgerRecord>> {
    prop::collection::vec((0usize..INSURERS.len(), 0i64..1_000_000i64), 0..20).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(n, (insurer, cents))| {
                    record(
                        2024,
                        input(
                            &format!("Insured {n}"),
                            INSURERS[insurer],
                            Decimal::new(cents, 2),
                        ),
                    )
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// An empty filter returns every record in order.
    #[test]
    fn prop_empty_filter_is_identity(records in records()) {
        prop_assert_eq!(filter(&records, &RecordFilter::new()), records);
    }

    /// Filtering keeps a subsequence of matching records only.
    #[test]
    fn prop_filter_returns_matching_subsequence(
        records in records(),
        query in "[a-zA-Z ]{0,4}",
    ) {
        let criteria = RecordFilter::new().with_query(query);
        let found = filter(&records, &criteria);

        prop_assert!(found.len() <= records.len());
        prop_assert!(found.iter().all(|record| criteria.matches(record)));

        let mut rest = records.iter();
        for record in &found {
            prop_assert!(rest.any(|candidate| candidate == record));
        }
    }
}
