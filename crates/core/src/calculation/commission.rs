//! Broker commission net of the NIC levy and withholding tax.

use premia_shared::config::RateConfig;
use premia_shared::types::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::{CalculationError, ensure_fraction, ensure_non_negative};

/// Deduction rates applied to gross commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRates {
    /// NIC levy rate.
    pub levy: Decimal,
    /// Withholding tax rate.
    pub withholding: Decimal,
}

impl Default for CommissionRates {
    fn default() -> Self {
        Self {
            levy: Decimal::new(75, 3),
            withholding: Decimal::new(5, 2),
        }
    }
}

impl From<&RateConfig> for CommissionRates {
    fn from(config: &RateConfig) -> Self {
        Self {
            levy: config.levy_rate,
            withholding: config.withholding_rate,
        }
    }
}

/// Commission components, each rounded half-up to two places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    /// `round(premium * commission_rate)`.
    pub gross: Decimal,
    /// `round(gross * levy_rate)`.
    pub levy: Decimal,
    /// `round(gross * withholding_rate)`.
    pub withholding: Decimal,
}

impl CommissionBreakdown {
    /// Net commission after the levy only.
    #[must_use]
    pub fn net_of_levy(&self) -> Decimal {
        self.gross - self.levy
    }

    /// Net commission after both the levy and withholding tax.
    #[must_use]
    pub fn net_of_levy_and_withholding(&self) -> Decimal {
        self.gross - self.levy - self.withholding
    }
}

/// Computes commission with explicit levy and withholding rates.
///
/// # Errors
///
/// Returns an error if `premium` is negative or any rate is outside `[0, 1]`.
pub fn compute_commission(
    premium: Decimal,
    commission_rate: Decimal,
    levy_rate: Decimal,
    withholding_rate: Decimal,
) -> Result<CommissionBreakdown, CalculationError> {
    compute_commission_with(
        premium,
        commission_rate,
        &CommissionRates {
            levy: levy_rate,
            withholding: withholding_rate,
        },
    )
}

/// Computes commission at the default levy (7.5%) and withholding (5%) rates.
///
/// # Errors
///
/// Returns an error if `premium` is negative or `commission_rate` is outside `[0, 1]`.
pub fn compute_commission_default(
    premium: Decimal,
    commission_rate: Decimal,
) -> Result<CommissionBreakdown, CalculationError> {
    compute_commission_with(premium, commission_rate, &CommissionRates::default())
}

/// Computes commission with a rate set.
///
/// # Errors
///
/// Returns an error if `premium` is negative or any rate is outside `[0, 1]`.
pub fn compute_commission_with(
    premium: Decimal,
    commission_rate: Decimal,
    rates: &CommissionRates,
) -> Result<CommissionBreakdown, CalculationError> {
    ensure_non_negative("premium", premium)?;
    ensure_fraction("commission_rate", commission_rate)?;
    ensure_fraction("levy_rate", rates.levy)?;
    ensure_fraction("withholding_rate", rates.withholding)?;

    let gross = round_money(premium * commission_rate);

    Ok(CommissionBreakdown {
        gross,
        levy: round_money(gross * rates.levy),
        withholding: round_money(gross * rates.withholding),
    })
}
