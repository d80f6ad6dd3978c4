//! Order drafts
//!
//! The read-only snapshot shown for confirmation. Pricing runs once when the draft is built;
//! everything the confirmation view displays is read back from the stored values.

use rusty_money::MoneyError;

use crate::{
    cart::{Cart, CartLineItem},
    catalog::PromotionCatalog,
    customer::CustomerInfo,
    payment::PaymentMethod,
    prices::Amount,
    pricing::{PricingError, change_due, price_line},
    promotions::Promotion,
};

/// A cart line with its price resolved.
#[derive(Debug, Clone)]
pub struct PricedLine {
    item: CartLineItem,
    promotion: Option<Promotion>,
    base_total: Amount,
    line_total: Amount,
}

impl PricedLine {
    /// The cart line as it was when the draft was built.
    pub fn item(&self) -> &CartLineItem {
        &self.item
    }

    /// The promotion that applied, if the line's code was in the catalog.
    pub fn promotion(&self) -> Option<&Promotion> {
        self.promotion.as_ref()
    }

    /// Unit price times quantity.
    pub fn base_total(&self) -> Amount {
        self.base_total
    }

    /// Discounted line price.
    pub fn line_total(&self) -> Amount {
        self.line_total
    }
}

/// An order awaiting confirmation.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    customer: CustomerInfo,
    lines: Vec<PricedLine>,
    payment_method: PaymentMethod,
    cash_given: Option<Amount>,
    subtotal: Amount,
    total: Amount,
    change: Amount,
}

impl OrderDraft {
    /// Price `cart` and capture everything needed to confirm the order.
    ///
    /// `cash_given` is kept only for cash payments.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any line or the change calculation fails.
    pub fn build(
        customer: &CustomerInfo,
        cart: &Cart,
        promotions: &PromotionCatalog,
        payment_method: PaymentMethod,
        cash_given: Option<&Amount>,
    ) -> Result<Self, PricingError> {
        let mut lines = Vec::with_capacity(cart.len());
        let mut subtotal = cart.zero();
        let mut total = cart.zero();

        for item in cart.iter() {
            let priced = price_line(item, promotions)?;

            subtotal = subtotal.add(priced.base)?;
            total = total.add(priced.total)?;

            lines.push(PricedLine {
                item: item.clone(),
                promotion: priced.promotion.cloned(),
                base_total: priced.base,
                line_total: priced.total,
            });
        }

        let cash_given = match payment_method {
            PaymentMethod::Cash => cash_given.copied(),
            PaymentMethod::Card => None,
        };

        let change = change_due(payment_method, cash_given.as_ref(), &total)?;

        Ok(Self {
            customer: customer.clone(),
            lines,
            payment_method,
            cash_given,
            subtotal,
            total,
            change,
        })
    }

    /// Customer details.
    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// Priced lines, in cart order.
    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    /// Payment method.
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Cash handed over; `None` for card payments.
    pub fn cash_given(&self) -> Option<Amount> {
        self.cash_given
    }

    /// Total before promotions.
    pub fn subtotal(&self) -> Amount {
        self.subtotal
    }

    /// Total to pay.
    pub fn total(&self) -> Amount {
        self.total
    }

    /// Change owed to the customer.
    pub fn change(&self) -> Amount {
        self.change
    }

    /// Calculate the savings made by applying promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Amount, MoneyError> {
        self.subtotal.sub(self.total)
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::{Money, iso::VND};
    use testresult::TestResult;

    use crate::{
        catalog::CatalogError,
        discounts::Discount,
        products::{Product, ProductId},
        promotions::PromotionCode,
    };

    use super::*;

    fn fixture() -> Result<(Cart, PromotionCatalog), CatalogError> {
        let promotions = PromotionCatalog::new([Promotion::new(
            "P10",
            Discount::PercentageOff(Percentage::from(0.1)),
        )])?;

        let mut cart = Cart::new(VND);
        cart.add_item(&Product::new("a", "A", Money::from_minor(100_000, VND)));
        cart.add_item(&Product::new("b", "B", Money::from_minor(50_000, VND)));
        cart.set_promotion(&ProductId::from("a"), Some(PromotionCode::from("P10")));

        Ok((cart, promotions))
    }

    #[test]
    fn build_prices_every_line_once() -> TestResult {
        let (cart, promotions) = fixture()?;

        let draft = OrderDraft::build(
            &CustomerInfo::default(),
            &cart,
            &promotions,
            PaymentMethod::Cash,
            Some(&Money::from_minor(200_000, VND)),
        )?;

        assert_eq!(draft.lines().len(), 2);
        assert_eq!(draft.subtotal(), Money::from_minor(150_000, VND));
        assert_eq!(draft.total(), Money::from_minor(140_000, VND));
        assert_eq!(draft.change(), Money::from_minor(60_000, VND));
        assert_eq!(draft.savings()?, Money::from_minor(10_000, VND));
        assert_eq!(
            draft
                .lines()
                .first()
                .and_then(PricedLine::promotion)
                .map(|p| p.code().as_str()),
            Some("P10")
        );

        Ok(())
    }

    #[test]
    fn card_payment_drops_cash() -> TestResult {
        let (cart, promotions) = fixture()?;

        let draft = OrderDraft::build(
            &CustomerInfo::default(),
            &cart,
            &promotions,
            PaymentMethod::Card,
            Some(&Money::from_minor(200_000, VND)),
        )?;

        assert_eq!(draft.cash_given(), None);
        assert_eq!(draft.change(), Money::from_minor(0, VND));

        Ok(())
    }
}
