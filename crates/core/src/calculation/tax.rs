//! Tax breakdown of a tax-inclusive premium.
//!
//! A gross premium ("total payable") already includes VAT, NHIL and GETFund,
//! each levied on the same pre-tax base. The base is recovered by reversing
//! the combined gross-up factor (`1 + 0.15 + 0.025 + 0.025 = 1.20` at the
//! default rates), then each levy is rounded independently.
//!
//! `total` is the authoritative figure and is never recomputed from the
//! components. Because the components are rounded one by one, their sum may
//! miss `total` by a minor unit or two. [`compute_tax_breakdown`] reports that
//! residue as-is (see [`TaxBreakdown::residue`]); callers that need the
//! components to add up exactly use [`compute_reconciled_tax_breakdown`],
//! which makes `base` the balancing figure.

use premia_shared::config::RateConfig;
use premia_shared::types::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{CalculationError, ensure_fraction, ensure_non_negative};

/// Levy rates applied to the pre-tax base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRates {
    /// Value added tax.
    pub vat: Decimal,
    /// National Health Insurance Levy.
    pub nhil: Decimal,
    /// Ghana Education Trust Fund levy.
    pub get_fund: Decimal,
}

impl TaxRates {
    /// The multiplier taking the base to the tax-inclusive total.
    #[must_use]
    pub fn gross_up_factor(&self) -> Decimal {
        Decimal::ONE + self.vat + self.nhil + self.get_fund
    }

    fn validate(&self) -> Result<(), CalculationError> {
        ensure_fraction("vat_rate", self.vat)?;
        ensure_fraction("nhil_rate", self.nhil)?;
        ensure_fraction("get_fund_rate", self.get_fund)?;
        Ok(())
    }
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            vat: Decimal::new(15, 2),
            nhil: Decimal::new(25, 3),
            get_fund: Decimal::new(25, 3),
        }
    }
}

impl From<&RateConfig> for TaxRates {
    fn from(config: &RateConfig) -> Self {
        Self {
            vat: config.vat_rate,
            nhil: config.nhil_rate,
            get_fund: config.get_fund_rate,
        }
    }
}

/// Line items derived from a tax-inclusive premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Pre-tax principal.
    pub base: Decimal,
    /// VAT on the base.
    pub vat: Decimal,
    /// NHIL on the base.
    pub nhil: Decimal,
    /// GETFund levy on the base.
    pub get_fund: Decimal,
    /// The input total, passed through unchanged.
    pub total: Decimal,
}

impl TaxBreakdown {
    /// All zero; the breakdown of a zero premium.
    pub const ZERO: Self = Self {
        base: Decimal::ZERO,
        vat: Decimal::ZERO,
        nhil: Decimal::ZERO,
        get_fund: Decimal::ZERO,
        total: Decimal::ZERO,
    };

    /// Sum of the three levies.
    #[must_use]
    pub fn total_tax(&self) -> Decimal {
        self.vat + self.nhil + self.get_fund
    }

    /// Sum of base and levies as displayed in a line-item table.
    #[must_use]
    pub fn components_sum(&self) -> Decimal {
        self.base + self.total_tax()
    }

    /// `total - components_sum()`: the rounding residue left by independent
    /// component rounding. Zero for reconciled breakdowns.
    #[must_use]
    pub fn residue(&self) -> Decimal {
        self.total - self.components_sum()
    }

    /// Returns true if the components add up to `total` exactly.
    #[must_use]
    pub fn reconciles(&self) -> bool {
        self.residue().is_zero()
    }
}

/// Breaks a tax-inclusive total down at the default rates.
///
/// The components are NOT guaranteed to sum to `total`; see the module docs.
///
/// # Errors
///
/// Returns `CalculationError::NegativeAmount` if `total` is negative.
pub fn compute_tax_breakdown(total: Decimal) -> Result<TaxBreakdown, CalculationError> {
    compute_tax_breakdown_with(total, &TaxRates::default())
}

/// Breaks a tax-inclusive total down at the given rates.
///
/// # Errors
///
/// Returns an error if `total` is negative or any rate is outside `[0, 1]`.
pub fn compute_tax_breakdown_with(
    total: Decimal,
    rates: &TaxRates,
) -> Result<TaxBreakdown, CalculationError> {
    ensure_non_negative("total", total)?;
    rates.validate()?;

    if total.is_zero() {
        return Ok(TaxBreakdown::ZERO);
    }

    let base = round_money(total / rates.gross_up_factor());

    Ok(TaxBreakdown {
        base,
        vat: round_money(base * rates.vat),
        nhil: round_money(base * rates.nhil),
        get_fund: round_money(base * rates.get_fund),
        total,
    })
}

/// Breaks a tax-inclusive total down so the components sum to it exactly.
///
/// Levies are computed from the provisional base exactly as in
/// [`compute_tax_breakdown`]; the base is then recomputed last as
/// `total - vat - nhil - get_fund`, absorbing the rounding residue.
///
/// # Errors
///
/// Returns `CalculationError::NegativeAmount` if `total` is negative.
pub fn compute_reconciled_tax_breakdown(total: Decimal) -> Result<TaxBreakdown, CalculationError> {
    let provisional = compute_tax_breakdown(total)?;
    Ok(TaxBreakdown {
        base: provisional.total - provisional.total_tax(),
        ..provisional
    })
}
