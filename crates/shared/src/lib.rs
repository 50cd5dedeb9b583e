//! Shared types, errors, and configuration for Premia.
//!
//! This crate provides common types used across all other crates:
//! - Money rounding with decimal precision and the carried currency label
//! - Typed record IDs
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
