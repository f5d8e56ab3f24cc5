//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{format_currency, round_currency, CURRENCY_SCALE};
