//! Insurance transaction ledger.
//!
//! This module implements the record-keeping side of the engine:
//! - Ledger records and their derived commission fields
//! - The fiscal-year partition and selected-year state
//! - The in-memory store that validates and indexes records
//! - Error types for ledger operations

pub mod error;
pub mod partition;
pub mod record;
pub mod store;

#[cfg(test)]
mod store_props;

pub use error::LedgerError;
pub use partition::{FiscalYearPartition, FiscalYearWindow, Selection, YearSnapshot};
pub use record::{BusinessClass, LedgerRecord, NewLedgerRecord};
pub use store::LedgerStore;
