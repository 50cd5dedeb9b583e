//! Calculation error types.

use premia_shared::{AppError, ErrorKind};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the tax and commission calculators.
///
/// Inputs are never clamped: anything outside the contract is rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    /// A monetary input was negative.
    #[error("{field} cannot be negative: {value}")]
    NegativeAmount {
        /// Name of the offending input.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// A rate was outside `[0, 1]`.
    #[error("{field} must be between 0 and 1, got {value}")]
    RateOutOfRange {
        /// Name of the offending rate.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },
}

impl CalculationError {
    /// Returns the error code for caller-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::RateOutOfRange { .. } => "RATE_OUT_OF_RANGE",
        }
    }

    /// Every calculation error is a validation failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

impl From<CalculationError> for AppError {
    fn from(err: CalculationError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

/// Rejects a negative monetary input.
pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, CalculationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CalculationError::NegativeAmount { field, value });
    }
    Ok(value)
}

/// Rejects a rate outside `[0, 1]`.
pub(crate) fn ensure_fraction(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, CalculationError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(CalculationError::RateOutOfRange { field, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        let negative = CalculationError::NegativeAmount {
            field: "premium",
            value: dec!(-1),
        };
        let rate = CalculationError::RateOutOfRange {
            field: "commission_rate",
            value: dec!(1.2),
        };
        assert_eq!(negative.error_code(), "NEGATIVE_AMOUNT");
        assert_eq!(rate.error_code(), "RATE_OUT_OF_RANGE");
        assert_eq!(negative.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_error_display() {
        let err = CalculationError::NegativeAmount {
            field: "premium",
            value: dec!(-10.50),
        };
        assert_eq!(err.to_string(), "premium cannot be negative: -10.50");

        let err = CalculationError::RateOutOfRange {
            field: "levy_rate",
            value: dec!(1.5),
        };
        assert_eq!(err.to_string(), "levy_rate must be between 0 and 1, got 1.5");
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = CalculationError::RateOutOfRange {
            field: "levy_rate",
            value: dec!(-0.1),
        }
        .into();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_guards() {
        assert!(ensure_non_negative("premium", Decimal::ZERO).is_ok());
        assert!(ensure_non_negative("premium", dec!(-0.01)).is_err());
        assert!(ensure_fraction("rate", Decimal::ONE).is_ok());
        assert!(ensure_fraction("rate", Decimal::ZERO).is_ok());
        assert!(ensure_fraction("rate", dec!(1.0001)).is_err());
        assert!(ensure_fraction("rate", dec!(-0.0001)).is_err());
    }
}
