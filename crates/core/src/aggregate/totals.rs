//! Totals over a set of ledger records.

use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{BusinessClass, LedgerError, LedgerRecord};

/// Column totals of a record set.
///
/// Sums are exact; records already carry two-decimal amounts, so no
/// rounding happens here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Total premium.
    pub premium: Decimal,
    /// Total gross commission.
    pub gross_commission: Decimal,
    /// Total NIC levy.
    pub levy: Decimal,
    /// Total commission net of levy.
    pub net_commission: Decimal,
    /// Total sum insured.
    pub sum_insured: Decimal,
    /// Number of records summed.
    pub record_count: usize,
}

impl Totals {
    /// All-zero totals.
    pub const ZERO: Self = Self {
        premium: Decimal::ZERO,
        gross_commission: Decimal::ZERO,
        levy: Decimal::ZERO,
        net_commission: Decimal::ZERO,
        sum_insured: Decimal::ZERO,
        record_count: 0,
    };

    /// Totals of a single record.
    #[must_use]
    pub fn of(record: &LedgerRecord) -> Self {
        Self {
            premium: record.premium(),
            gross_commission: record.gross_commission(),
            levy: record.levy(),
            net_commission: record.net_commission(),
            sum_insured: record.sum_insured(),
            record_count: 1,
        }
    }

    /// Returns true if no records were summed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Checks that net commission still equals gross minus levy.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvariantViolation` if the columns disagree.
    pub fn verify_reconciles(&self) -> Result<(), LedgerError> {
        if self.net_commission == self.gross_commission - self.levy {
            Ok(())
        } else {
            Err(LedgerError::InvariantViolation(format!(
                "total net commission {} != gross {} - levy {}",
                self.net_commission, self.gross_commission, self.levy
            )))
        }
    }
}

impl Add for Totals {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Self) {
        self.premium += rhs.premium;
        self.gross_commission += rhs.gross_commission;
        self.levy += rhs.levy;
        self.net_commission += rhs.net_commission;
        self.sum_insured += rhs.sum_insured;
        self.record_count += rhs.record_count;
    }
}

impl Sum for Totals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a LedgerRecord> for Totals {
    fn sum<I: Iterator<Item = &'a LedgerRecord>>(iter: I) -> Self {
        iter.map(Self::of).sum()
    }
}

/// Sums `records`. Empty input gives [`Totals::ZERO`].
#[must_use]
pub fn aggregate(records: &[LedgerRecord]) -> Totals {
    records.iter().sum()
}

/// Totals per business class.
#[must_use]
pub fn aggregate_by_class(records: &[LedgerRecord]) -> BTreeMap<BusinessClass, Totals> {
    let mut groups: BTreeMap<BusinessClass, Totals> = BTreeMap::new();
    for record in records {
        *groups.entry(record.business_class().clone()).or_default() += Totals::of(record);
    }
    groups
}

/// Totals per issue month (1 = January).
#[must_use]
pub fn aggregate_by_month(records: &[LedgerRecord]) -> BTreeMap<u32, Totals> {
    let mut groups: BTreeMap<u32, Totals> = BTreeMap::new();
    for record in records {
        *groups.entry(record.issue_month()).or_default() += Totals::of(record);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::record::fixtures::{input, record};
    use rust_decimal_macros::dec;

    #[test]
    fn test_aggregate_empty_is_zero() {
        let totals = aggregate(&[]);
        assert_eq!(totals, Totals::ZERO);
        assert!(totals.is_empty());
    }

    #[test]
    fn test_aggregate_two_records() {
        let records = vec![
            record(2024, input("A", "GLICO GEN", dec!(1000.00))),
            record(2024, input("B", "Enterprise", dec!(2500.00))),
        ];
        let totals = aggregate(&records);

        assert_eq!(totals.premium, dec!(3500.00));
        // 12% of each premium.
        assert_eq!(totals.gross_commission, dec!(420.00));
        assert_eq!(totals.levy, dec!(9.00) + dec!(22.50));
        assert_eq!(totals.net_commission, dec!(388.50));
        assert_eq!(totals.sum_insured, dec!(70000.00));
        assert_eq!(totals.record_count, 2);
        assert!(totals.verify_reconciles().is_ok());
    }

    #[test]
    fn test_verify_reconciles_detects_drift() {
        let totals = Totals {
            gross_commission: dec!(100.00),
            levy: dec!(7.50),
            net_commission: dec!(92.00),
            ..Totals::ZERO
        };
        assert!(matches!(
            totals.verify_reconciles(),
            Err(LedgerError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_group_totals_sum_to_overall() {
        let mut fire = input("C", "SIC", dec!(400.00));
        fire.business_class = BusinessClass::Fire;
        fire.issue_date = "2024-07-02".to_string();
        let mut life = input("D", "SIC", dec!(250.00));
        life.business_class = BusinessClass::Life;
        let records = vec![
            record(2024, input("A", "SIC", dec!(100.00))),
            record(2024, fire),
            record(2024, input("B", "SIC", dec!(300.00))),
            record(2024, life),
        ];

        let by_class = aggregate_by_class(&records);
        assert_eq!(by_class.len(), 3);
        assert_eq!(by_class[&BusinessClass::Motor].premium, dec!(400.00));
        assert_eq!(by_class[&BusinessClass::Motor].record_count, 2);
        assert_eq!(by_class.values().copied().sum::<Totals>(), aggregate(&records));

        let by_month = aggregate_by_month(&records);
        assert_eq!(by_month.keys().copied().collect::<Vec<_>>(), vec![3, 7]);
        assert_eq!(by_month[&7].premium, dec!(400.00));
        assert_eq!(by_month.values().copied().sum::<Totals>(), aggregate(&records));
    }
}
