//! Pricing
//!
//! Line prices, cart totals and change due. Amounts stay in integer minor units throughout,
//! so totals do not depend on summation order.

use rusty_money::{Money, MoneyError};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLineItem},
    catalog::PromotionCatalog,
    discounts::DiscountError,
    payment::PaymentMethod,
    prices::Amount,
    promotions::Promotion,
};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Unit price times quantity does not fit in minor units.
    #[error("line total for {0} overflowed")]
    Overflow(String),

    /// Discount arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A line priced against a promotion catalog.
#[derive(Debug, Clone, Copy)]
pub struct LinePrice<'p> {
    /// Unit price times quantity, before any promotion.
    pub base: Amount,

    /// The promotion that applied, if the line's code resolved in the catalog.
    pub promotion: Option<&'p Promotion>,

    /// Amount charged for the line.
    pub total: Amount,
}

/// Price a single line.
///
/// A missing or unknown promotion code prices the line at its base amount.
///
/// # Errors
///
/// Returns a [`PricingError`] if the line total overflows or the discount arithmetic fails.
pub fn price_line<'p>(
    item: &CartLineItem,
    promotions: &'p PromotionCatalog,
) -> Result<LinePrice<'p>, PricingError> {
    let base_minor = item
        .custom_price()
        .to_minor_units()
        .checked_mul(i64::from(item.quantity().get()))
        .ok_or_else(|| PricingError::Overflow(item.product_id().to_string()))?;

    let base = Money::from_minor(base_minor, item.custom_price().currency());

    let promotion = item
        .promotion_code()
        .and_then(|code| promotions.get(code));

    let total = match promotion {
        Some(promotion) => promotion.apply(&base)?,
        None => base,
    };

    Ok(LinePrice {
        base,
        promotion,
        total,
    })
}

/// Calculates the discounted price of a line: `custom price × quantity` less its promotion.
///
/// Never negative.
///
/// # Errors
///
/// Returns a [`PricingError`] if the line total overflows or the discount arithmetic fails.
pub fn discounted_line_price(
    item: &CartLineItem,
    promotions: &PromotionCatalog,
) -> Result<Amount, PricingError> {
    Ok(price_line(item, promotions)?.total)
}

/// Calculates the total of a cart: the sum of every line's discounted price.
///
/// An empty cart totals zero in the cart currency.
///
/// # Errors
///
/// Returns a [`PricingError`] if any line fails to price or the sum fails.
pub fn cart_total(cart: &Cart, promotions: &PromotionCatalog) -> Result<Amount, PricingError> {
    cart.iter().try_fold(cart.zero(), |acc, item| {
        Ok(acc.add(discounted_line_price(item, promotions)?)?)
    })
}

/// Calculates the change owed when paying `total` with `cash_given`.
///
/// Zero unless paying by cash with more than the total; an absent cash amount counts as zero.
///
/// # Errors
///
/// Returns a [`PricingError::Money`] if the cash is in a different currency than the total.
pub fn change_due(
    payment_method: PaymentMethod,
    cash_given: Option<&Amount>,
    total: &Amount,
) -> Result<Amount, PricingError> {
    let zero = Money::from_minor(0, total.currency());

    if payment_method != PaymentMethod::Cash {
        return Ok(zero);
    }

    let Some(cash) = cash_given else {
        return Ok(zero);
    };

    let change = cash.sub(*total)?;

    if change.to_minor_units() > 0 {
        Ok(change)
    } else {
        Ok(zero)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use decimal_percentage::Percentage;
    use rusty_money::iso::{USD, VND};
    use testresult::TestResult;

    use crate::{
        discounts::Discount,
        products::{Product, ProductId},
        promotions::PromotionCode,
    };

    use super::*;

    fn promotions() -> Result<PromotionCatalog, crate::catalog::CatalogError> {
        PromotionCatalog::new([
            Promotion::new("P10", Discount::PercentageOff(Percentage::from(0.1))),
            Promotion::new(
                "D50000",
                Discount::AmountOff(Money::from_minor(50_000, VND)),
            ),
        ])
    }

    fn line(price: i64, quantity: u32, code: Option<&str>) -> CartLineItem {
        CartLineItem::new(&Product::new("a", "A", Money::from_minor(price, VND)))
            .with_quantity(NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN))
            .with_promotion(code.map(PromotionCode::from))
    }

    #[test]
    fn line_without_promotion_is_price_times_quantity() -> TestResult {
        let promotions = promotions()?;

        assert_eq!(
            discounted_line_price(&line(100_000, 2, None), &promotions)?,
            Money::from_minor(200_000, VND)
        );

        Ok(())
    }

    #[test]
    fn unknown_promotion_code_is_no_discount() -> TestResult {
        let promotions = promotions()?;
        let priced = price_line(&line(100_000, 2, Some("GONE")), &promotions)?;

        assert_eq!(priced.total, Money::from_minor(200_000, VND));
        assert!(priced.promotion.is_none());

        Ok(())
    }

    #[test]
    fn percent_promotion() -> TestResult {
        let promotions = promotions()?;
        let priced = price_line(&line(100_000, 2, Some("P10")), &promotions)?;

        assert_eq!(priced.base, Money::from_minor(200_000, VND));
        assert_eq!(priced.total, Money::from_minor(180_000, VND));
        assert_eq!(
            priced.promotion.map(|p| p.code().as_str()),
            Some("P10")
        );

        Ok(())
    }

    #[test]
    fn direct_promotion_floors_at_zero() -> TestResult {
        let promotions = promotions()?;

        assert_eq!(
            discounted_line_price(&line(100_000, 2, Some("D50000")), &promotions)?,
            Money::from_minor(150_000, VND)
        );
        assert_eq!(
            discounted_line_price(&line(20_000, 1, Some("D50000")), &promotions)?,
            Money::from_minor(0, VND)
        );

        Ok(())
    }

    #[test]
    fn negative_price_override_never_reaches_pricing() -> TestResult {
        let promotions = promotions()?;
        let id = ProductId::from("a");
        let mut cart = Cart::new(VND);

        cart.add_item(&Product::new("a", "A", Money::from_minor(100, VND)));
        cart.set_custom_price(&id, Money::from_minor(-500, VND));

        let line = cart.get(&id).map(|item| discounted_line_price(item, &promotions));

        assert_eq!(line, Some(Ok(Money::from_minor(100, VND))));
        assert_eq!(
            cart_total(&cart, &promotions)?,
            Money::from_minor(100, VND)
        );

        Ok(())
    }

    #[test]
    fn line_overflow_is_reported() -> TestResult {
        let promotions = promotions()?;
        let result = discounted_line_price(&line(i64::MAX, 2, None), &promotions);

        assert_eq!(result, Err(PricingError::Overflow("a".to_string())));

        Ok(())
    }

    #[test]
    fn empty_cart_totals_zero() -> TestResult {
        let promotions = promotions()?;

        assert_eq!(
            cart_total(&Cart::new(VND), &promotions)?,
            Money::from_minor(0, VND)
        );

        Ok(())
    }

    #[test]
    fn cart_total_sums_discounted_lines() -> TestResult {
        let promotions = promotions()?;
        let mut cart = Cart::new(VND);

        cart.add_item(&Product::new("a", "A", Money::from_minor(100_000, VND)));
        cart.add_item(&Product::new("b", "B", Money::from_minor(30_000, VND)));
        cart.set_quantity(&ProductId::from("a"), NonZeroU32::MIN.saturating_add(1));
        cart.set_promotion(&ProductId::from("a"), Some(PromotionCode::from("P10")));
        cart.set_promotion(&ProductId::from("b"), Some(PromotionCode::from("D50000")));

        assert_eq!(
            cart_total(&cart, &promotions)?,
            Money::from_minor(180_000, VND)
        );

        Ok(())
    }

    #[test]
    fn change_for_cash_over_total() -> TestResult {
        let total = Money::from_minor(180_000, VND);

        assert_eq!(
            change_due(
                PaymentMethod::Cash,
                Some(&Money::from_minor(200_000, VND)),
                &total
            )?,
            Money::from_minor(20_000, VND)
        );

        Ok(())
    }

    #[test]
    fn no_change_when_cash_short_or_exact() -> TestResult {
        let total = Money::from_minor(180_000, VND);

        for cash in [100_000, 180_000] {
            assert_eq!(
                change_due(
                    PaymentMethod::Cash,
                    Some(&Money::from_minor(cash, VND)),
                    &total
                )?,
                Money::from_minor(0, VND)
            );
        }

        assert_eq!(
            change_due(PaymentMethod::Cash, None, &total)?,
            Money::from_minor(0, VND)
        );

        Ok(())
    }

    #[test]
    fn no_change_for_card() -> TestResult {
        let total = Money::from_minor(180_000, VND);

        assert_eq!(
            change_due(
                PaymentMethod::Card,
                Some(&Money::from_minor(500_000, VND)),
                &total
            )?,
            Money::from_minor(0, VND)
        );

        Ok(())
    }

    #[test]
    fn change_currency_mismatch_errors() {
        let result = change_due(
            PaymentMethod::Cash,
            Some(&Money::from_minor(500, USD)),
            &Money::from_minor(100, VND),
        );

        assert!(matches!(result, Err(PricingError::Money(_))));
    }
}
