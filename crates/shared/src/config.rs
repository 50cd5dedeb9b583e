//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppError;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Fiscal-year window configuration.
    #[serde(default)]
    pub fiscal: FiscalConfig,
    /// Regulatory rate configuration.
    #[serde(default)]
    pub rates: RateConfig,
    /// Ledger currency label.
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Fiscal-year window configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FiscalConfig {
    /// Earliest supported fiscal year.
    #[serde(default = "default_first_year")]
    pub first_year: i32,
    /// Latest supported fiscal year.
    #[serde(default = "default_last_year")]
    pub last_year: i32,
    /// Year selected at startup. Defaults to `last_year`.
    #[serde(default)]
    pub selected_year: Option<i32>,
}

fn default_first_year() -> i32 {
    2020
}

fn default_last_year() -> i32 {
    2025
}

impl Default for FiscalConfig {
    fn default() -> Self {
        Self {
            first_year: default_first_year(),
            last_year: default_last_year(),
            selected_year: None,
        }
    }
}

impl FiscalConfig {
    /// Returns the year that should be selected at startup.
    #[must_use]
    pub fn initial_year(&self) -> i32 {
        self.selected_year.unwrap_or(self.last_year)
    }
}

/// Regulatory rates, all expressed as fractions.
#[derive(Debug, Clone, Deserialize)]
pub struct RateConfig {
    /// NIC levy deducted from gross commission.
    #[serde(default = "default_levy_rate")]
    pub levy_rate: Decimal,
    /// Withholding tax deducted from commission in the three-component net.
    #[serde(default = "default_withholding_rate")]
    pub withholding_rate: Decimal,
    /// VAT on the pre-tax premium base.
    #[serde(default = "default_vat_rate")]
    pub vat_rate: Decimal,
    /// National Health Insurance Levy on the base.
    #[serde(default = "default_nhil_rate")]
    pub nhil_rate: Decimal,
    /// GETFund levy on the base.
    #[serde(default = "default_get_fund_rate")]
    pub get_fund_rate: Decimal,
}

fn default_levy_rate() -> Decimal {
    Decimal::new(75, 3) // 7.5%
}

fn default_withholding_rate() -> Decimal {
    Decimal::new(5, 2) // 5%
}

fn default_vat_rate() -> Decimal {
    Decimal::new(15, 2) // 15%
}

fn default_nhil_rate() -> Decimal {
    Decimal::new(25, 3) // 2.5%
}

fn default_get_fund_rate() -> Decimal {
    Decimal::new(25, 3) // 2.5%
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            levy_rate: default_levy_rate(),
            withholding_rate: default_withholding_rate(),
            vat_rate: default_vat_rate(),
            nhil_rate: default_nhil_rate(),
            get_fund_rate: default_get_fund_rate(),
        }
    }
}

fn default_currency() -> String {
    "GHS".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fiscal: FiscalConfig::default(),
            rates: RateConfig::default(),
            currency: default_currency(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Environment variables use the `PREMIA__` prefix with `__` between
    /// sections, e.g. `PREMIA__FISCAL__FIRST_YEAR=2021`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> Result<Self, AppError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("PREMIA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` describing the first violated constraint.
    pub fn validate(&self) -> Result<(), AppError> {
        let fiscal = &self.fiscal;
        if fiscal.first_year > fiscal.last_year {
            return Err(AppError::Config(format!(
                "fiscal.first_year {} is after fiscal.last_year {}",
                fiscal.first_year, fiscal.last_year
            )));
        }

        let initial = fiscal.initial_year();
        if initial < fiscal.first_year || initial > fiscal.last_year {
            return Err(AppError::Config(format!(
                "fiscal.selected_year {initial} is outside {}..={}",
                fiscal.first_year, fiscal.last_year
            )));
        }

        let rates = [
            ("rates.levy_rate", self.rates.levy_rate),
            ("rates.withholding_rate", self.rates.withholding_rate),
            ("rates.vat_rate", self.rates.vat_rate),
            ("rates.nhil_rate", self.rates.nhil_rate),
            ("rates.get_fund_rate", self.rates.get_fund_rate),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(AppError::Config(format!("{name} {rate} is outside [0, 1]")));
            }
        }

        if self.currency.trim().is_empty() {
            return Err(AppError::Config("currency label is empty".to_string()));
        }

        Ok(())
    }
}
