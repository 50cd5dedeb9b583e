//! Regulatory premium and commission arithmetic.
//!
//! Every page that shows a tax line-item table or a commission column calls
//! into this module with its own rates:
//! - `tax` - VAT/NHIL/GETFund breakdown of a tax-inclusive premium
//! - `commission` - gross commission, NIC levy, withholding, and nets
//! - `error` - validation errors shared by both calculators

pub mod commission;
pub mod error;
pub mod tax;

#[cfg(test)]
mod props;

pub use commission::{
    CommissionBreakdown, CommissionRates, compute_commission, compute_commission_default,
    compute_commission_with,
};
pub use error::CalculationError;
pub use tax::{
    TaxBreakdown, TaxRates, compute_reconciled_tax_breakdown, compute_tax_breakdown,
    compute_tax_breakdown_with,
};
