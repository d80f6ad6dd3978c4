//! Cart
//!
//! An ordered list of line items, at most one per product. Every edit is keyed by product id
//! and is a no-op when no line matches; the `bool` each edit returns says whether a line was
//! touched.

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use tracing::{debug, warn};

use crate::{
    prices::Amount,
    products::{Product, ProductId},
    promotions::PromotionCode,
};

/// One product entry in the cart with its own quantity, price override, and promotion.
///
/// Name and base price are snapshotted from the product when the line is added, so later
/// catalog changes do not affect existing lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    product_id: ProductId,
    name: String,
    base_price: Amount,
    quantity: NonZeroU32,
    custom_price: Amount,
    promotion_code: Option<PromotionCode>,
}

impl CartLineItem {
    /// Create a line for one unit of `product` at its catalog price, with no promotion.
    pub fn new(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            base_price: product.price,
            quantity: NonZeroU32::MIN,
            custom_price: product.price,
            promotion_code: None,
        }
    }

    /// Set the quantity, returning the line for chaining.
    #[must_use]
    pub fn with_quantity(mut self, quantity: NonZeroU32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the promotion code, returning the line for chaining.
    #[must_use]
    pub fn with_promotion(mut self, code: Option<PromotionCode>) -> Self {
        self.promotion_code = code;
        self
    }

    /// The product this line was created from.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Product name at the time the line was added.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalog unit price at the time the line was added.
    pub fn base_price(&self) -> &Amount {
        &self.base_price
    }

    /// Number of units.
    pub fn quantity(&self) -> NonZeroU32 {
        self.quantity
    }

    /// Unit price charged for this line.
    pub fn custom_price(&self) -> &Amount {
        &self.custom_price
    }

    /// Selected promotion code, if any.
    pub fn promotion_code(&self) -> Option<&PromotionCode> {
        self.promotion_code.as_ref()
    }
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<CartLineItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Append a line for `product` unless one already exists.
    ///
    /// Products with a negative price are ignored. Returns `true` if a line was added.
    pub fn add_item(&mut self, product: &Product) -> bool {
        if product.price.to_minor_units() < 0 {
            warn!(
                product = %product.id,
                price = %product.price,
                "ignoring product with negative price"
            );

            return false;
        }

        if self.get(&product.id).is_some() {
            debug!(product = %product.id, "product already in cart");

            return false;
        }

        debug!(product = %product.id, "adding product to cart");

        self.items.push(CartLineItem::new(product));

        true
    }

    /// Set the quantity of the line for `id`.
    ///
    /// Zero is unrepresentable, so callers reject it before getting here.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: NonZeroU32) -> bool {
        self.update(id, |item| item.quantity = quantity)
    }

    /// Override the unit price of the line for `id`.
    ///
    /// Negative prices are ignored.
    pub fn set_custom_price(&mut self, id: &ProductId, price: Amount) -> bool {
        if price.to_minor_units() < 0 {
            warn!(product = %id, %price, "ignoring negative unit price");

            return false;
        }

        self.update(id, |item| item.custom_price = price)
    }

    /// Set or clear the promotion code of the line for `id`.
    ///
    /// The code is not checked against a catalog; unknown codes simply price as no discount.
    pub fn set_promotion(&mut self, id: &ProductId, code: Option<PromotionCode>) -> bool {
        self.update(id, |item| item.promotion_code = code)
    }

    /// Remove the line for `id`.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();

        self.items.retain(|item| &item.product_id != id);

        let removed = self.items.len() != before;

        if removed {
            debug!(product = %id, "removed product from cart");
        }

        removed
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get the line for `id`.
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.product_id == id)
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// A zero amount in the cart currency.
    pub fn zero(&self) -> Amount {
        Money::from_minor(0, self.currency)
    }

    fn update(&mut self, id: &ProductId, edit: impl FnOnce(&mut CartLineItem)) -> bool {
        match self.items.iter_mut().find(|item| &item.product_id == id) {
            Some(item) => {
                edit(item);
                debug!(product = %id, "updated cart line");

                true
            }
            None => false,
        }
    }
}
