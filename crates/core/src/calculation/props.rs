//! Property-based tests for the tax and commission calculators.
//!
//! - Tax pass-through, determinism, and bounded residue
//! - Reconciled breakdown sums exactly to the total
//! - Commission identity `net = gross - levy`

use proptest::prelude::*;
use premia_shared::types::round_money;
use rust_decimal::Decimal;

use super::commission::compute_commission_default;
use super::tax::{compute_reconciled_tax_breakdown, compute_tax_breakdown};

/// Strategy to generate non-negative amounts (0.00 to 10,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate rates in [0, 1] with four decimal places.
fn fraction() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The total is passed through unchanged, and the same input always
    /// produces the same breakdown.
    #[test]
    fn prop_tax_total_passes_through_deterministically(total in amount()) {
        let first = compute_tax_breakdown(total).unwrap();
        let second = compute_tax_breakdown(total).unwrap();

        prop_assert_eq!(first.total, total);
        prop_assert_eq!(first, second);
    }

    /// Each levy is the correctly rounded product of the base and its rate.
    #[test]
    fn prop_tax_components_rounded_independently(total in amount()) {
        let breakdown = compute_tax_breakdown(total).unwrap();

        prop_assert_eq!(breakdown.vat, round_money(breakdown.base * Decimal::new(15, 2)));
        prop_assert_eq!(breakdown.nhil, round_money(breakdown.base * Decimal::new(25, 3)));
        prop_assert_eq!(breakdown.get_fund, round_money(breakdown.base * Decimal::new(25, 3)));
    }

    /// Independent rounding leaves at most a few minor units of residue.
    #[test]
    fn prop_tax_residue_is_bounded(total in amount()) {
        let breakdown = compute_tax_breakdown(total).unwrap();
        prop_assert!(
            breakdown.residue().abs() <= Decimal::new(4, 2),
            "residue {} too large for total {}",
            breakdown.residue(),
            total
        );
    }

    /// The reconciled variant always sums exactly to the total.
    #[test]
    fn prop_reconciled_breakdown_sums_to_total(total in amount()) {
        let plain = compute_tax_breakdown(total).unwrap();
        let reconciled = compute_reconciled_tax_breakdown(total).unwrap();

        prop_assert_eq!(reconciled.components_sum(), total);
        prop_assert!(reconciled.base >= Decimal::ZERO);
        prop_assert_eq!(reconciled.total_tax(), plain.total_tax());
    }

    /// Two-component net is exactly gross minus levy, and gross is the
    /// rounded product of premium and rate.
    #[test]
    fn prop_commission_identity(premium in amount(), rate in fraction()) {
        let commission = compute_commission_default(premium, rate).unwrap();

        prop_assert_eq!(commission.gross, round_money(premium * rate));
        prop_assert_eq!(commission.net_of_levy(), commission.gross - commission.levy);
        prop_assert_eq!(
            commission.net_of_levy_and_withholding(),
            commission.net_of_levy() - commission.withholding
        );
        prop_assert!(commission.net_of_levy() >= Decimal::ZERO);
    }
}
