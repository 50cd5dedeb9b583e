//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Engine errors are mapped onto these variants before they reach a caller
/// that only cares about the failure category.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected at the call site (negative amount, bad rate, bad date,
    /// unsupported fiscal year).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Addressed record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An engine invariant failed. Signals a bug, never a user error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure category shared by every engine error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, rejected synchronously where it was received.
    Validation,
    /// The addressed record does not exist.
    NotFound,
    /// An internal invariant failed.
    Invariant,
}

impl AppError {
    /// Builds an application error from an engine failure category.
    #[must_use]
    pub fn from_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Invariant => Self::Internal(message),
        }
    }

    /// Returns the HTTP-style status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Config(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for caller-facing responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Config(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::Config(String::new()).error_code(), "CONFIG_ERROR");
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::Config("msg".into()).to_string(),
            "Configuration error: msg"
        );
        assert_eq!(
            AppError::Internal("msg".into()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn test_from_kind() {
        assert!(matches!(
            AppError::from_kind(ErrorKind::Validation, "x".into()),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from_kind(ErrorKind::NotFound, "x".into()),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from_kind(ErrorKind::Invariant, "x".into()),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_from_config_error() {
        let err: AppError = config::ConfigError::Message("missing key".into()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.status_code(), 500);
    }
}
