//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::RecordId;
pub use money::{Currency, MAX_MONEY_AMOUNT, MONEY_DECIMAL_PLACES, round_money};
