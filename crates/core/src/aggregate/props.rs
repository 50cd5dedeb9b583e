//! Property-based tests for aggregation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::totals::{Totals, aggregate, aggregate_by_class, aggregate_by_month};
use crate::ledger::record::fixtures::{input, record};
use crate::ledger::{BusinessClass, LedgerRecord};

const CLASSES: [BusinessClass; 4] = [
    BusinessClass::Motor,
    BusinessClass::Fire,
    BusinessClass::Marine,
    BusinessClass::Health,
];

fn records() -> impl Strategy<Value = Vec<LedgerRecord>> {
    prop::collection::vec(
        (0i64..100_000_000i64, 0i64..=5_000i64, 0usize..CLASSES.len(), 1u32..=12),
        0..25,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(cents, rate, class, month)| {
                let mut new = input("Insured", "Insurer", Decimal::new(cents, 2));
                new.commission_rate = Decimal::new(rate, 4);
                new.business_class = CLASSES[class].clone();
                new.issue_date = format!("2024-{month:02}-01");
                record(2024, new)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Totals of a concatenation equal the sum of the parts' totals.
    #[test]
    fn prop_aggregate_is_additive(left in records(), right in records()) {
        let mut all = left.clone();
        all.extend(right.iter().cloned());

        prop_assert_eq!(aggregate(&all), aggregate(&left) + aggregate(&right));
    }

    /// Totals equal the per-record field sums and still reconcile.
    #[test]
    fn prop_aggregate_matches_field_sums(records in records()) {
        let totals = aggregate(&records);

        prop_assert_eq!(totals.premium, records.iter().map(LedgerRecord::premium).sum::<Decimal>());
        prop_assert_eq!(totals.levy, records.iter().map(LedgerRecord::levy).sum::<Decimal>());
        prop_assert_eq!(totals.record_count, records.len());
        prop_assert!(totals.verify_reconciles().is_ok());
    }

    /// Group breakdowns partition the overall totals.
    #[test]
    fn prop_breakdowns_sum_to_total(records in records()) {
        let overall = aggregate(&records);

        prop_assert_eq!(aggregate_by_class(&records).into_values().sum::<Totals>(), overall);
        prop_assert_eq!(aggregate_by_month(&records).into_values().sum::<Totals>(), overall);
    }
}

#[test]
fn test_aggregate_of_nothing_is_zero() {
    assert_eq!(aggregate(&[]), Totals::ZERO);
    assert!(aggregate_by_class(&[]).is_empty());
    assert!(aggregate_by_month(&[]).is_empty());
}
