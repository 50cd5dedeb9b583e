//! Ledger error types for validation, lookup, and invariant errors.
//!
//! This module defines all errors that can occur during ledger operations:
//! calculator validation failures, date and fiscal-year errors, missing
//! records, and internal invariant violations.

use premia_shared::types::RecordId;
use premia_shared::{AppError, ErrorKind};
use thiserror::Error;

use crate::calculation::CalculationError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A calculator rejected a monetary input or rate.
    #[error(transparent)]
    Calculation(#[from] CalculationError),

    /// A monetary input carries more than two fractional digits.
    #[error("{field} must have at most 2 decimal places, got {value}")]
    ExcessPrecision {
        /// Name of the offending input.
        field: &'static str,
        /// The rejected value.
        value: rust_decimal::Decimal,
    },

    /// A monetary input exceeds the supported maximum.
    #[error("{field} must not exceed {max}, got {value}")]
    AmountTooLarge {
        /// Name of the offending input.
        field: &'static str,
        /// The rejected value.
        value: rust_decimal::Decimal,
        /// Largest accepted value.
        max: rust_decimal::Decimal,
    },

    /// A date field could not be parsed.
    #[error("Invalid {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        /// Name of the date field.
        field: &'static str,
        /// The rejected text.
        value: String,
    },

    /// The expiry date precedes the issue date.
    #[error("Expiry date {expiry} is before issue date {issue}")]
    ExpiryBeforeIssue {
        /// Issue date.
        issue: chrono::NaiveDate,
        /// Rejected expiry date.
        expiry: chrono::NaiveDate,
    },

    /// The fiscal year is outside the configured window.
    #[error("Fiscal year {year} is not supported (supported: {first}..={last})")]
    UnsupportedFiscalYear {
        /// Requested year.
        year: i32,
        /// Earliest supported year.
        first: i32,
        /// Latest supported year.
        last: i32,
    },

    /// The configured fiscal-year window is empty.
    #[error("Invalid fiscal year window: {first}..={last}")]
    InvalidFiscalWindow {
        /// Requested first year.
        first: i32,
        /// Requested last year.
        last: i32,
    },

    /// A correction tried to move a record to another fiscal year.
    #[error("Correction must stay in fiscal year {expected}, got {got}")]
    FiscalYearMismatch {
        /// Fiscal year of the corrected record.
        expected: i32,
        /// Fiscal year requested by the correction.
        got: i32,
    },

    /// A caller-supplied id is already in use.
    #[error("Duplicate record id: {0}")]
    DuplicateRecord(RecordId),

    // ========== Lookup Errors ==========
    /// Record not found.
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    // ========== Internal Errors ==========
    /// A computed value broke an engine invariant.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl LedgerError {
    /// Returns the error code for caller-facing responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Calculation(inner) => inner.error_code(),
            Self::ExcessPrecision { .. } => "EXCESS_PRECISION",
            Self::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::ExpiryBeforeIssue { .. } => "EXPIRY_BEFORE_ISSUE",
            Self::UnsupportedFiscalYear { .. } => "UNSUPPORTED_FISCAL_YEAR",
            Self::InvalidFiscalWindow { .. } => "INVALID_FISCAL_WINDOW",
            Self::FiscalYearMismatch { .. } => "FISCAL_YEAR_MISMATCH",
            Self::DuplicateRecord(_) => "DUPLICATE_RECORD",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
        }
    }

    /// Returns the failure category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Calculation(_)
            | Self::ExcessPrecision { .. }
            | Self::AmountTooLarge { .. }
            | Self::InvalidDate { .. }
            | Self::ExpiryBeforeIssue { .. }
            | Self::UnsupportedFiscalYear { .. }
            | Self::InvalidFiscalWindow { .. }
            | Self::FiscalYearMismatch { .. }
            | Self::DuplicateRecord(_) => ErrorKind::Validation,

            Self::RecordNotFound(_) => ErrorKind::NotFound,

            Self::InvariantViolation(_) => ErrorKind::Invariant,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
