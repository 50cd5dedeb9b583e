//! Ledger record model.
//!
//! A `LedgerRecord` is one insurance transaction: the raw inputs a broker
//! enters (parties, class, premium, commission rate, sum insured, dates) plus
//! the commission fields derived from them. Records are only built through
//! [`LedgerRecord::from_input`], called by the store, and are immutable
//! afterwards. Corrections are new records pointing back via `corrects`.

use chrono::{Datelike, Months, NaiveDate};
use premia_shared::types::{
    Currency, MAX_MONEY_AMOUNT, MONEY_DECIMAL_PLACES, RecordId, round_money,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use super::error::LedgerError;
use crate::calculation::error::ensure_non_negative;
use crate::calculation::{
    CommissionBreakdown, CommissionRates, TaxBreakdown, TaxRates, compute_commission_with,
    compute_tax_breakdown, compute_tax_breakdown_with,
};

/// Line of business. Open-ended: unknown labels are kept as `Other`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub enum BusinessClass {
    /// Motor (private and commercial vehicles).
    Motor,
    /// Life assurance.
    Life,
    /// Fire and allied perils.
    Fire,
    /// Marine cargo and hull.
    Marine,
    /// Engineering and contractors' all risks.
    Engineering,
    /// Travel.
    Travel,
    /// Health.
    Health,
    /// Bonds and guarantees.
    Bonds,
    /// Any other class, kept verbatim.
    Other(String),
}

impl std::fmt::Display for BusinessClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Motor => write!(f, "Motor"),
            Self::Life => write!(f, "Life"),
            Self::Fire => write!(f, "Fire"),
            Self::Marine => write!(f, "Marine"),
            Self::Engineering => write!(f, "Engineering"),
            Self::Travel => write!(f, "Travel"),
            Self::Health => write!(f, "Health"),
            Self::Bonds => write!(f, "Bonds"),
            Self::Other(label) => write!(f, "{label}"),
        }
    }
}

impl std::str::FromStr for BusinessClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Err("Business class cannot be empty".to_string()),
            "motor" => Ok(Self::Motor),
            "life" => Ok(Self::Life),
            "fire" => Ok(Self::Fire),
            "marine" => Ok(Self::Marine),
            "engineering" => Ok(Self::Engineering),
            "travel" => Ok(Self::Travel),
            "health" => Ok(Self::Health),
            "bonds" => Ok(Self::Bonds),
            _ => Ok(Self::Other(trimmed.to_string())),
        }
    }
}

/// Input for creating a ledger record.
///
/// Dates are text so that malformed input is rejected by the engine, not by
/// the caller's deserializer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLedgerRecord {
    /// Caller-supplied id; generated when absent.
    #[serde(default)]
    pub id: Option<RecordId>,
    /// Fiscal year; the store's selected year when absent.
    #[serde(default)]
    pub fiscal_year: Option<i32>,
    /// Name of the insured party.
    pub insured_name: String,
    /// Name of the insurer.
    pub insurer_name: String,
    /// Line of business.
    pub business_class: BusinessClass,
    /// Cover / type-of-cover label (e.g. "Comprehensive").
    #[serde(default)]
    pub cover_type: String,
    /// Policy number; generated when blank.
    #[serde(default)]
    pub policy_number: Option<String>,
    /// Currency label; the store default when absent.
    #[serde(default)]
    pub currency: Option<String>,
    /// Gross premium charged to the insured.
    pub premium: Decimal,
    /// Commission rate as a fraction (0.12 = 12%).
    pub commission_rate: Decimal,
    /// Sum insured.
    #[serde(default)]
    pub sum_insured: Decimal,
    /// Issue date, `YYYY-MM-DD`.
    pub issue_date: String,
    /// Expiry date, `YYYY-MM-DD`; issue date plus one year when absent.
    #[serde(default)]
    pub expiry_date: Option<String>,
    /// Vehicle plate or office location.
    #[serde(default)]
    pub location: Option<String>,
}

/// Values the store resolves before a record is built.
#[derive(Debug, Clone)]
pub(crate) struct RecordContext {
    pub fiscal_year: i32,
    pub rates: CommissionRates,
    pub currency: Currency,
    pub policy_sequence: u64,
    pub corrects: Option<RecordId>,
}

/// One insurance transaction entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRecord {
    id: RecordId,
    fiscal_year: i32,
    insured_name: String,
    insurer_name: String,
    business_class: BusinessClass,
    cover_type: String,
    policy_number: String,
    currency: Currency,
    premium: Decimal,
    commission_rate: Decimal,
    sum_insured: Decimal,
    levy_rate: Decimal,
    gross_commission: Decimal,
    levy: Decimal,
    net_commission: Decimal,
    issue_date: NaiveDate,
    expiry_date: NaiveDate,
    month_label: String,
    location: Option<String>,
    corrects: Option<RecordId>,
}

impl LedgerRecord {
    /// Validates an input and derives the commission fields.
    pub(crate) fn from_input(
        input: NewLedgerRecord,
        context: RecordContext,
    ) -> Result<Self, LedgerError> {
        let premium = money_input("premium", input.premium)?;
        let sum_insured = money_input("sum_insured", input.sum_insured)?;

        let issue_date = parse_date("issue_date", &input.issue_date)?;
        let expiry_date = match input.expiry_date.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                let expiry = parse_date("expiry_date", text)?;
                if expiry < issue_date {
                    return Err(LedgerError::ExpiryBeforeIssue {
                        issue: issue_date,
                        expiry,
                    });
                }
                expiry
            }
            _ => default_expiry(issue_date)?,
        };

        let commission = compute_commission_with(premium, input.commission_rate, &context.rates)?;

        let policy_number = input
            .policy_number
            .map(|number| number.trim().to_string())
            .filter(|number| !number.is_empty())
            .unwrap_or_else(|| {
                format!("POL-{}-{:05}", context.fiscal_year, context.policy_sequence)
            });

        let currency = input
            .currency
            .as_deref()
            .filter(|label| !label.trim().is_empty())
            .map_or(context.currency, Currency::new);

        let record = Self {
            id: input.id.unwrap_or_default(),
            fiscal_year: context.fiscal_year,
            insured_name: input.insured_name.trim().to_string(),
            insurer_name: input.insurer_name.trim().to_string(),
            business_class: input.business_class,
            cover_type: input.cover_type.trim().to_string(),
            policy_number,
            currency,
            premium,
            commission_rate: input.commission_rate,
            sum_insured,
            levy_rate: context.rates.levy,
            gross_commission: commission.gross,
            levy: commission.levy,
            net_commission: commission.net_of_levy(),
            month_label: issue_date.format("%B").to_string(),
            issue_date,
            expiry_date,
            location: input
                .location
                .map(|location| location.trim().to_string())
                .filter(|location| !location.is_empty()),
            corrects: context.corrects,
        };

        record.verify_invariants()?;
        Ok(record)
    }

    /// Checks the commission identities on this record.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvariantViolation` naming the broken identity.
    pub fn verify_invariants(&self) -> Result<(), LedgerError> {
        let expected_gross = round_money(self.premium * self.commission_rate);
        if self.gross_commission != expected_gross {
            return Err(LedgerError::InvariantViolation(format!(
                "record {}: gross commission {} != round(premium * rate) {}",
                self.id, self.gross_commission, expected_gross
            )));
        }
        if self.net_commission != self.gross_commission - self.levy {
            return Err(LedgerError::InvariantViolation(format!(
                "record {}: net commission {} != gross {} - levy {}",
                self.id, self.net_commission, self.gross_commission, self.levy
            )));
        }
        Ok(())
    }

    /// Tax line items for this record's premium, read as total payable.
    ///
    /// # Errors
    ///
    /// Never fails for a stored record; the premium was validated on creation.
    pub fn tax_breakdown(&self) -> Result<TaxBreakdown, LedgerError> {
        Ok(compute_tax_breakdown(self.premium)?)
    }

    /// Tax line items at explicit rates.
    ///
    /// # Errors
    ///
    /// Returns an error if any rate is outside `[0, 1]`.
    pub fn tax_breakdown_with(&self, rates: &TaxRates) -> Result<TaxBreakdown, LedgerError> {
        Ok(compute_tax_breakdown_with(self.premium, rates)?)
    }

    /// Commission components including withholding at the given rate.
    ///
    /// # Errors
    ///
    /// Returns an error if `withholding_rate` is outside `[0, 1]`.
    pub fn commission_with_withholding(
        &self,
        withholding_rate: Decimal,
    ) -> Result<CommissionBreakdown, LedgerError> {
        Ok(compute_commission_with(
            self.premium,
            self.commission_rate,
            &CommissionRates {
                levy: self.levy_rate,
                withholding: withholding_rate,
            },
        )?)
    }

    /// Record id.
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Fiscal year the record belongs to.
    #[must_use]
    pub fn fiscal_year(&self) -> i32 {
        self.fiscal_year
    }

    /// Insured party.
    #[must_use]
    pub fn insured_name(&self) -> &str {
        &self.insured_name
    }

    /// Insurer.
    #[must_use]
    pub fn insurer_name(&self) -> &str {
        &self.insurer_name
    }

    /// Line of business.
    #[must_use]
    pub fn business_class(&self) -> &BusinessClass {
        &self.business_class
    }

    /// Cover label.
    #[must_use]
    pub fn cover_type(&self) -> &str {
        &self.cover_type
    }

    /// Policy number.
    #[must_use]
    pub fn policy_number(&self) -> &str {
        &self.policy_number
    }

    /// Currency label.
    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Gross premium.
    #[must_use]
    pub fn premium(&self) -> Decimal {
        self.premium
    }

    /// Commission rate.
    #[must_use]
    pub fn commission_rate(&self) -> Decimal {
        self.commission_rate
    }

    /// Sum insured.
    #[must_use]
    pub fn sum_insured(&self) -> Decimal {
        self.sum_insured
    }

    /// Levy rate applied when the record was created.
    #[must_use]
    pub fn levy_rate(&self) -> Decimal {
        self.levy_rate
    }

    /// Gross commission.
    #[must_use]
    pub fn gross_commission(&self) -> Decimal {
        self.gross_commission
    }

    /// NIC levy on the gross commission.
    #[must_use]
    pub fn levy(&self) -> Decimal {
        self.levy
    }

    /// Gross commission less levy.
    #[must_use]
    pub fn net_commission(&self) -> Decimal {
        self.net_commission
    }

    /// Issue date.
    #[must_use]
    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    /// Expiry date.
    #[must_use]
    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    /// Calendar month of issue, 1-12.
    #[must_use]
    pub fn issue_month(&self) -> u32 {
        self.issue_date.month()
    }

    /// Month name of the issue date (e.g. "March").
    #[must_use]
    pub fn month_label(&self) -> &str {
        &self.month_label
    }

    /// Vehicle plate or office location.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Id of the record this one corrects.
    #[must_use]
    pub fn corrects(&self) -> Option<&RecordId> {
        self.corrects.as_ref()
    }
}

fn money_input(field: &'static str, value: Decimal) -> Result<Decimal, LedgerError> {
    let value = ensure_non_negative(field, value)?;
    if value > MAX_MONEY_AMOUNT {
        return Err(LedgerError::AmountTooLarge {
            field,
            value,
            max: MAX_MONEY_AMOUNT,
        });
    }
    if value.normalize().scale() > MONEY_DECIMAL_PLACES {
        return Err(LedgerError::ExcessPrecision { field, value });
    }
    Ok(value)
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| LedgerError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// One year after issue; 29 February rolls back to 28 February.
fn default_expiry(issue_date: NaiveDate) -> Result<NaiveDate, LedgerError> {
    issue_date
        .checked_add_months(Months::new(12))
        .ok_or_else(|| LedgerError::InvalidDate {
            field: "expiry_date",
            value: issue_date.to_string(),
        })
}
