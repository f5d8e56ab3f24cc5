//! Adjustment input validation.

use rust_decimal::Decimal;
use weft_shared::config::StockConfig;

use super::error::StockError;

/// Length bounds for adjustment reasons, counted in characters after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReasonRules {
    /// Inclusive minimum.
    pub min_chars: usize,
    /// Inclusive maximum.
    pub max_chars: usize,
}

impl Default for ReasonRules {
    fn default() -> Self {
        Self {
            min_chars: 3,
            max_chars: 500,
        }
    }
}

impl From<&StockConfig> for ReasonRules {
    fn from(config: &StockConfig) -> Self {
        Self {
            min_chars: config.reason_min_chars,
            max_chars: config.reason_max_chars,
        }
    }
}

impl ReasonRules {
    /// Trims `reason` and checks its length, returning the trimmed text.
    pub fn validate(&self, reason: &str) -> Result<String, StockError> {
        let trimmed = reason.trim();
        let actual = trimmed.chars().count();
        if actual < self.min_chars {
            return Err(StockError::ReasonTooShort {
                min: self.min_chars,
                actual,
            });
        }
        if actual > self.max_chars {
            return Err(StockError::ReasonTooLong {
                max: self.max_chars,
                actual,
            });
        }
        Ok(trimmed.to_string())
    }
}

/// Rejects a zero adjustment.
pub fn validate_quantity(quantity_adjusted: Decimal) -> Result<(), StockError> {
    if quantity_adjusted.is_zero() {
        return Err(StockError::ZeroQuantity);
    }
    Ok(())
}
