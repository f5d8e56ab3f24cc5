//! Order pricing: discounts, GST and currency rounding.

pub mod calculator;
pub mod error;

#[cfg(test)]
mod calculator_props;

pub use calculator::{DiscountType, FinancialCalculator, FinancialWarning, LineItem, OrderFinancials};
pub use error::FinanceError;
pub use weft_shared::types::{format_currency, round_currency};
