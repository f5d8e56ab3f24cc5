//! Discount and GST breakdown for sales and purchase orders.
//!
//! The breakdown is computed at full `Decimal` precision:
//!
//! 1. `discount_amount` from the discount type and value
//! 2. `discounted_total = item_total - discount_amount`
//! 3. `gst_amount = discounted_total * gst_rate / 100` (GST is always post-discount)
//! 4. `total_amount = discounted_total + gst_amount`
//!
//! Nothing is clamped. Out-of-range discounts are carried through and reported
//! as [`FinancialWarning`]s so the caller decides whether to reject them.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use weft_shared::types::round_currency;

use super::error::FinanceError;

/// How an order discount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// No discount.
    #[default]
    None,
    /// `discount_value` is a percentage of the item total.
    Percentage,
    /// `discount_value` is an absolute amount.
    FlatAmount,
}

impl DiscountType {
    /// Returns the persisted string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Percentage => "percentage",
            Self::FlatAmount => "flat_amount",
        }
    }
}

/// One priced line on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Quantity ordered (metres, pieces, ...).
    pub quantity: Decimal,
    /// Price per unit of quantity.
    pub rate: Decimal,
}

impl LineItem {
    /// Line amount before discount and tax.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.quantity * self.rate
    }
}

/// Full-precision pricing breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFinancials {
    /// Sum of line amounts.
    pub item_total: Decimal,
    /// Discount taken off the item total.
    pub discount_amount: Decimal,
    /// Item total after discount.
    pub discounted_total: Decimal,
    /// GST on the discounted total.
    pub gst_amount: Decimal,
    /// Amount payable.
    pub total_amount: Decimal,
    #[serde(skip)]
    discount_type: DiscountType,
    #[serde(skip)]
    discount_value: Decimal,
    #[serde(skip)]
    gst_rate: Decimal,
}

/// A suspicious but accepted input combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FinancialWarning {
    /// The discount is larger than the item total, so the discounted total is negative.
    DiscountExceedsItemTotal {
        /// Computed discount amount.
        discount_amount: Decimal,
        /// Item total it was taken from.
        item_total: Decimal,
    },
    /// A percentage discount outside `[0, 100]`.
    PercentageOutOfRange {
        /// The offending percentage.
        percentage: Decimal,
    },
    /// A flat discount below zero, which raises the price.
    NegativeDiscount {
        /// The offending amount.
        amount: Decimal,
    },
    /// A GST rate below zero.
    NegativeGstRate {
        /// The offending rate.
        rate: Decimal,
    },
    /// An item total below zero.
    NegativeItemTotal {
        /// The offending total.
        item_total: Decimal,
    },
}

impl FinancialWarning {
    /// Machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DiscountExceedsItemTotal { .. } => "DISCOUNT_EXCEEDS_ITEM_TOTAL",
            Self::PercentageOutOfRange { .. } => "PERCENTAGE_OUT_OF_RANGE",
            Self::NegativeDiscount { .. } => "NEGATIVE_DISCOUNT",
            Self::NegativeGstRate { .. } => "NEGATIVE_GST_RATE",
            Self::NegativeItemTotal { .. } => "NEGATIVE_ITEM_TOTAL",
        }
    }
}

impl fmt::Display for FinancialWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiscountExceedsItemTotal {
                discount_amount,
                item_total,
            } => write!(
                f,
                "discount {discount_amount} exceeds item total {item_total}"
            ),
            Self::PercentageOutOfRange { percentage } => {
                write!(f, "discount percentage {percentage} is outside 0..=100")
            }
            Self::NegativeDiscount { amount } => write!(f, "flat discount {amount} is negative"),
            Self::NegativeGstRate { rate } => write!(f, "GST rate {rate} is negative"),
            Self::NegativeItemTotal { item_total } => {
                write!(f, "item total {item_total} is negative")
            }
        }
    }
}

impl OrderFinancials {
    /// Returns the breakdown rounded to currency precision, ready to persist.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            item_total: round_currency(self.item_total),
            discount_amount: round_currency(self.discount_amount),
            discounted_total: round_currency(self.discounted_total),
            gst_amount: round_currency(self.gst_amount),
            total_amount: round_currency(self.total_amount),
            ..*self
        }
    }

    /// Lists every suspicious input that went into this breakdown.
    #[must_use]
    pub fn warnings(&self) -> Vec<FinancialWarning> {
        let hundred = Decimal::ONE_HUNDRED;
        let mut warnings = Vec::new();

        if self.item_total < Decimal::ZERO {
            warnings.push(FinancialWarning::NegativeItemTotal {
                item_total: self.item_total,
            });
        }
        match self.discount_type {
            DiscountType::Percentage
                if self.discount_value < Decimal::ZERO || self.discount_value > hundred =>
            {
                warnings.push(FinancialWarning::PercentageOutOfRange {
                    percentage: self.discount_value,
                });
            }
            DiscountType::FlatAmount if self.discount_value < Decimal::ZERO => {
                warnings.push(FinancialWarning::NegativeDiscount {
                    amount: self.discount_value,
                });
            }
            _ => {}
        }
        if self.discount_amount > self.item_total {
            warnings.push(FinancialWarning::DiscountExceedsItemTotal {
                discount_amount: self.discount_amount,
                item_total: self.item_total,
            });
        }
        if self.gst_rate < Decimal::ZERO {
            warnings.push(FinancialWarning::NegativeGstRate {
                rate: self.gst_rate,
            });
        }

        warnings
    }
}

/// Stateless pricing calculator.
pub struct FinancialCalculator;

impl FinancialCalculator {
    /// Computes the discount/GST breakdown of an order.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use weft_core::finance::{DiscountType, FinancialCalculator};
    ///
    /// let f = FinancialCalculator::compute_order_financials(
    ///     dec!(1000), DiscountType::Percentage, dec!(10), dec!(18),
    /// );
    /// assert_eq!(f.discount_amount, dec!(100));
    /// assert_eq!(f.gst_amount, dec!(162));
    /// assert_eq!(f.total_amount, dec!(1062));
    /// ```
    #[must_use]
    pub fn compute_order_financials(
        item_total: Decimal,
        discount_type: DiscountType,
        discount_value: Decimal,
        gst_rate: Decimal,
    ) -> OrderFinancials {
        let hundred = Decimal::ONE_HUNDRED;

        let discount_amount = match discount_type {
            DiscountType::None => Decimal::ZERO,
            DiscountType::Percentage => item_total * discount_value / hundred,
            DiscountType::FlatAmount => discount_value,
        };
        let discounted_total = item_total - discount_amount;
        let gst_amount = discounted_total * gst_rate / hundred;

        OrderFinancials {
            item_total,
            discount_amount,
            discounted_total,
            gst_amount,
            total_amount: discounted_total + gst_amount,
            discount_type,
            discount_value,
            gst_rate,
        }
    }

    /// Same as [`Self::compute_order_financials`], but rejects any input that
    /// would raise a [`FinancialWarning`].
    pub fn compute_order_financials_strict(
        item_total: Decimal,
        discount_type: DiscountType,
        discount_value: Decimal,
        gst_rate: Decimal,
    ) -> Result<OrderFinancials, FinanceError> {
        let financials =
            Self::compute_order_financials(item_total, discount_type, discount_value, gst_rate);

        match financials.warnings().into_iter().next() {
            Some(warning) => Err(FinanceError::Inconsistent(warning)),
            None => Ok(financials),
        }
    }

    /// Sums the line amounts of an order.
    #[must_use]
    pub fn item_total(lines: &[LineItem]) -> Decimal {
        lines.iter().map(LineItem::amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_discount_example() {
        let f = FinancialCalculator::compute_order_financials(
            dec!(1000),
            DiscountType::Percentage,
            dec!(10),
            dec!(18),
        );

        assert_eq!(f.item_total, dec!(1000));
        assert_eq!(f.discount_amount, dec!(100));
        assert_eq!(f.discounted_total, dec!(900));
        assert_eq!(f.gst_amount, dec!(162));
        assert_eq!(f.total_amount, dec!(1062));
        assert!(f.warnings().is_empty());
    }

    #[test]
    fn test_no_discount_ignores_value() {
        let f = FinancialCalculator::compute_order_financials(
            dec!(250),
            DiscountType::None,
            dec!(40),
            dec!(5),
        );

        assert_eq!(f.discount_amount, Decimal::ZERO);
        assert_eq!(f.discounted_total, dec!(250));
        assert_eq!(f.gst_amount, dec!(12.5));
        assert_eq!(f.total_amount, dec!(262.5));
    }

    #[test]
    fn test_flat_discount_is_taken_verbatim() {
        let f = FinancialCalculator::compute_order_financials(
            dec!(500),
            DiscountType::FlatAmount,
            dec!(75.50),
            dec!(12),
        );

        assert_eq!(f.discount_amount, dec!(75.50));
        assert_eq!(f.discounted_total, dec!(424.50));
        assert_eq!(f.gst_amount, dec!(50.94));
        assert_eq!(f.total_amount, dec!(475.44));
    }

    #[test]
    fn test_flat_discount_above_item_total_is_flagged_not_clamped() {
        let f = FinancialCalculator::compute_order_financials(
            dec!(100),
            DiscountType::FlatAmount,
            dec!(150),
            dec!(18),
        );

        assert_eq!(f.discounted_total, dec!(-50));
        assert_eq!(f.gst_amount, dec!(-9));
        assert_eq!(
            f.warnings(),
            vec![FinancialWarning::DiscountExceedsItemTotal {
                discount_amount: dec!(150),
                item_total: dec!(100),
            }]
        );
    }

    #[test]
    fn test_percentage_out_of_range_is_propagated() {
        let f = FinancialCalculator::compute_order_financials(
            dec!(200),
            DiscountType::Percentage,
            dec!(120),
            dec!(0),
        );

        assert_eq!(f.discount_amount, dec!(240));
        let codes: Vec<_> = f.warnings().iter().map(FinancialWarning::code).collect();
        assert_eq!(
            codes,
            vec!["PERCENTAGE_OUT_OF_RANGE", "DISCOUNT_EXCEEDS_ITEM_TOTAL"]
        );
    }

    #[test]
    fn test_full_precision_until_rounded() {
        let f = FinancialCalculator::compute_order_financials(
            dec!(333.33),
            DiscountType::Percentage,
            dec!(7.5),
            dec!(18),
        );

        // 333.33 * 7.5% = 24.99975
        assert_eq!(f.discount_amount, dec!(24.99975));
        let rounded = f.rounded();
        assert_eq!(rounded.discount_amount, dec!(25.00));
        assert_eq!(rounded.discounted_total, dec!(308.33));
        assert_eq!(rounded.total_amount, round_currency(f.total_amount));
    }

    #[test]
    fn test_strict_rejects_flagged_input() {
        let result = FinancialCalculator::compute_order_financials_strict(
            dec!(100),
            DiscountType::FlatAmount,
            dec!(101),
            dec!(5),
        );
        let err = result.unwrap_err();
        assert_eq!(err.error_code(), "DISCOUNT_EXCEEDS_ITEM_TOTAL");

        let result = FinancialCalculator::compute_order_financials_strict(
            dec!(100),
            DiscountType::Percentage,
            dec!(10),
            dec!(-1),
        );
        assert_eq!(result.unwrap_err().error_code(), "NEGATIVE_GST_RATE");
    }

    #[test]
    fn test_strict_accepts_clean_input() {
        let result = FinancialCalculator::compute_order_financials_strict(
            dec!(100),
            DiscountType::FlatAmount,
            dec!(100),
            dec!(5),
        );
        assert_eq!(result.unwrap().total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_item_total_from_lines() {
        let lines = [
            LineItem {
                quantity: dec!(12.5),
                rate: dec!(80),
            },
            LineItem {
                quantity: dec!(3),
                rate: dec!(149.99),
            },
        ];
        assert_eq!(FinancialCalculator::item_total(&lines), dec!(1449.97));
        assert_eq!(FinancialCalculator::item_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_financials_serialize_without_inputs() {
        let f = FinancialCalculator::compute_order_financials(
            dec!(10),
            DiscountType::None,
            dec!(0),
            dec!(0),
        );
        let json = serde_json::to_value(f).unwrap();
        assert!(json.get("discount_value").is_none());
        assert!(json.get("total_amount").is_some());
    }
}
