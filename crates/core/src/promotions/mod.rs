//! Promotions

use std::fmt;

use crate::{
    discounts::{Discount, DiscountError},
    prices::Amount,
};

/// Promotion code, unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromotionCode(String);

impl PromotionCode {
    /// Create a new promotion code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PromotionCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for PromotionCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl fmt::Display for PromotionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named discount rule that can be attached to a cart line.
#[derive(Debug, Clone)]
pub struct Promotion {
    code: PromotionCode,
    discount: Discount,
}

impl Promotion {
    /// Create a new promotion.
    pub fn new(code: impl Into<PromotionCode>, discount: Discount) -> Self {
        Self {
            code: code.into(),
            discount,
        }
    }

    /// Return the promotion code
    pub fn code(&self) -> &PromotionCode {
        &self.code
    }

    /// Return the discount
    pub fn discount(&self) -> &Discount {
        &self.discount
    }

    /// Label used by promotion selectors, e.g. `P10 (10%)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.code, self.discount.magnitude())
    }

    /// Calculate the discounted amount for a line's base amount.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the discount arithmetic fails.
    pub fn apply(&self, base: &Amount) -> Result<Amount, DiscountError> {
        self.discount.apply(base)
    }
}
