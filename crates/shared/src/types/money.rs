//! Money rounding with decimal precision and the carried currency label.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal` rounded to two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fractional digits kept for every ledger amount.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Largest accepted monetary input: 1,000,000,000,000,000.00.
///
/// Totals of up to tens of trillions of records at this bound still fit in
/// a `Decimal`, so summing validated amounts cannot overflow.
pub const MAX_MONEY_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Rounds an amount to the ledger precision using round-half-up.
///
/// Ledger amounts are non-negative, so midpoint-away-from-zero is exactly
/// half-up: `117.1875` becomes `117.19`, `385.125` becomes `385.13`.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    // Display scale is always two places, even for whole or one-place inputs.
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}

/// Currency label carried alongside amounts.
///
/// The engine never converts between currencies; the label only travels with
/// the record so a caller can display it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Creates a label, normalised to upper case.
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }

    /// Returns the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::new("GHS")
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(117.1875), dec!(117.19))]
    #[case(dec!(385.125), dec!(385.13))]
    #[case(dec!(64.1875), dec!(64.19))]
    #[case(dec!(2567.5), dec!(2567.50))]
    #[case(dec!(83.3333333333), dec!(83.33))]
    #[case(dec!(0.005), dec!(0.01))]
    #[case(dec!(0.004), dec!(0.00))]
    #[case(dec!(0), dec!(0))]
    fn test_round_money_half_up(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[test]
    fn test_round_money_keeps_two_places() {
        assert_eq!(round_money(dec!(1562.5)).to_string(), "1562.50");
        assert_eq!(round_money(dec!(1562.5)).scale(), 2);
    }

    #[test]
    fn test_max_money_amount() {
        assert_eq!(MAX_MONEY_AMOUNT, dec!(1000000000000000));
        // Far below the point where sums of many amounts would overflow.
        assert!(MAX_MONEY_AMOUNT.checked_mul(Decimal::from(1_000_000_000_000_i64)).is_some());
    }

    #[test]
    fn test_currency_label_normalised() {
        assert_eq!(Currency::new(" ghs ").as_str(), "GHS");
        assert_eq!(Currency::new("usd").to_string(), "USD");
        assert_eq!(Currency::default(), Currency::new("GHS"));
    }
}
