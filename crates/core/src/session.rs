//! Order session
//!
//! One customer, one order at a time. The session owns the form fields and the cart, and
//! moves between two phases:
//!
//! - `Editing`: the cart and form can be changed freely.
//! - `Confirming`: an [`OrderDraft`] has been priced and is waiting for confirm or cancel.
//!   Only line removal is allowed, and it re-prices the draft.

use std::{num::NonZeroU32, sync::Arc};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    cart::Cart,
    catalog::Catalog,
    customer::{CustomerInfo, FieldErrors},
    order::OrderDraft,
    payment::PaymentMethod,
    prices::Amount,
    pricing::{PricingError, cart_total, change_due},
    products::ProductId,
    promotions::PromotionCode,
};

/// Errors raised by session transitions.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// Submit was attempted with an empty cart.
    #[error("the cart is empty")]
    EmptyCart,

    /// Submit was attempted with invalid customer details.
    #[error("customer details are invalid: {0}")]
    InvalidCustomer(FieldErrors),

    /// Submit was attempted while an order is already awaiting confirmation.
    #[error("an order is already awaiting confirmation")]
    AlreadyConfirming,

    /// Confirm or cancel was attempted with no order awaiting confirmation.
    #[error("no order is awaiting confirmation")]
    NotConfirming,

    /// An edit was attempted while an order is awaiting confirmation.
    #[error("an order is awaiting confirmation; confirm or cancel it first")]
    Confirming,

    /// Pricing failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Which step of the order flow the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Cart and form are editable.
    Editing,

    /// An order draft is awaiting confirmation.
    Confirming,
}

/// A confirmed order.
#[derive(Debug, Clone)]
pub struct Confirmation {
    /// Sequential order number within the session, starting at 1.
    pub number: u64,

    /// The order as confirmed.
    pub order: OrderDraft,
}

/// Order Session
#[derive(Debug)]
pub struct OrderSession {
    catalog: Arc<Catalog>,
    default_payment_method: PaymentMethod,
    customer: CustomerInfo,
    cart: Cart,
    payment_method: PaymentMethod,
    cash_given: Option<Amount>,
    pending: Option<OrderDraft>,
    confirmed_orders: u64,
}

impl OrderSession {
    /// Start a session over `catalog`, paying by card until told otherwise.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_default_payment_method(catalog, PaymentMethod::default())
    }

    /// Start a session whose payment method starts at, and resets to, `payment_method`.
    pub fn with_default_payment_method(
        catalog: Arc<Catalog>,
        payment_method: PaymentMethod,
    ) -> Self {
        let cart = Cart::new(catalog.currency());

        Self {
            catalog,
            default_payment_method: payment_method,
            customer: CustomerInfo::default(),
            cart,
            payment_method,
            cash_given: None,
            pending: None,
            confirmed_orders: 0,
        }
    }

    /// The catalog this session sells from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Confirming
        } else {
            Phase::Editing
        }
    }

    /// Customer details as entered so far.
    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// The cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Selected payment method.
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Cash handed over, if entered.
    pub fn cash_given(&self) -> Option<&Amount> {
        self.cash_given.as_ref()
    }

    /// The order awaiting confirmation, if any.
    pub fn draft(&self) -> Option<&OrderDraft> {
        self.pending.as_ref()
    }

    /// Number of orders confirmed in this session.
    pub fn confirmed_orders(&self) -> u64 {
        self.confirmed_orders
    }

    /// Set the customer name.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Confirming`] while an order awaits confirmation.
    pub fn set_customer_name(&mut self, name: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.customer.name = name.into();

        Ok(())
    }

    /// Set the customer email.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Confirming`] while an order awaits confirmation.
    pub fn set_customer_email(&mut self, email: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.customer.email = email.into();

        Ok(())
    }

    /// Set the customer phone number.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Confirming`] while an order awaits confirmation.
    pub fn set_customer_phone(&mut self, phone: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.customer.phone = phone.into();

        Ok(())
    }

    /// Current validation failures for the customer fields.
    pub fn field_errors(&self) -> FieldErrors {
        self.customer.field_errors()
    }

    /// Add the product with `id` to the cart.
    ///
    /// Returns `false` if the product is unknown or already in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Confirming`] while an order awaits confirmation.
    pub fn add_product(&mut self, id: &ProductId) -> Result<bool, SessionError> {
        self.ensure_editing()?;

        let Some(product) = self.catalog.products().get(id) else {
            warn!(product = %id, "unknown product");

            return Ok(false);
        };

        Ok(self.cart.add_item(product))
    }

    /// Set the quantity of the line for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Confirming`] while an order awaits confirmation.
    pub fn set_quantity(
        &mut self,
        id: &ProductId,
        quantity: NonZeroU32,
    ) -> Result<bool, SessionError> {
        self.ensure_editing()?;

        Ok(self.cart.set_quantity(id, quantity))
    }

    /// Override the unit price of the line for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Confirming`] while an order awaits confirmation.
    pub fn set_custom_price(&mut self, id: &ProductId, price: Amount) -> Result<bool, SessionError> {
        self.ensure_editing()?;

        Ok(self.cart.set_custom_price(id, price))
    }

    /// Set or clear the promotion of the line for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Confirming`] while an order awaits confirmation.
    pub fn set_promotion(
        &mut self,
        id: &ProductId,
        code: Option<PromotionCode>,
    ) -> Result<bool, SessionError> {
        self.ensure_editing()?;

        Ok(self.cart.set_promotion(id, code))
    }

    /// Remove the line for `id`.
    ///
    /// Allowed in both phases. While confirming, the draft is re-priced; if the cart ends up
    /// empty the session goes back to editing.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError::Pricing`] if re-pricing the draft fails.
    pub fn remove_item(&mut self, id: &ProductId) -> Result<bool, SessionError> {
        let removed = self.cart.remove_item(id);

        if removed && self.pending.is_some() {
            if self.cart.is_empty() {
                info!("cart emptied during confirmation; returning to editing");

                self.pending = None;
            } else {
                self.pending = Some(self.build_draft()?);
            }
        }

        Ok(removed)
    }

    /// Select the payment method.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Confirming`] while an order awaits confirmation.
    pub fn set_payment_method(&mut self, method: PaymentMethod) -> Result<(), SessionError> {
        self.ensure_editing()?;

        debug!(%method, "payment method selected");

        self.payment_method = method;

        Ok(())
    }

    /// Set or clear the cash handed over. Negative amounts are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Confirming`] while an order awaits confirmation.
    pub fn set_cash_given(&mut self, cash: Option<Amount>) -> Result<(), SessionError> {
        self.ensure_editing()?;

        if let Some(amount) = cash
            && amount.to_minor_units() < 0
        {
            warn!(%amount, "ignoring negative cash amount");

            return Ok(());
        }

        self.cash_given = cash;

        Ok(())
    }

    /// Live cart total.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if pricing fails.
    pub fn total(&self) -> Result<Amount, PricingError> {
        cart_total(&self.cart, self.catalog.promotions())
    }

    /// Live change due for the current payment method and cash.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if pricing fails.
    pub fn change_due(&self) -> Result<Amount, PricingError> {
        change_due(
            self.payment_method,
            self.cash_given.as_ref(),
            &self.total()?,
        )
    }

    /// Whether the submit action is enabled: editing with a non-empty cart.
    ///
    /// Customer validity is checked by [`submit`](Self::submit) itself.
    pub fn can_submit(&self) -> bool {
        self.pending.is_none() && !self.cart.is_empty()
    }

    /// Price the order and move to confirmation.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyConfirming`] if a draft is already pending.
    /// - [`SessionError::EmptyCart`] if the cart is empty.
    /// - [`SessionError::InvalidCustomer`] if any customer field fails validation.
    /// - [`SessionError::Pricing`] if pricing fails.
    pub fn submit(&mut self) -> Result<&OrderDraft, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::AlreadyConfirming);
        }

        if self.cart.is_empty() {
            return Err(SessionError::EmptyCart);
        }

        let errors = self.customer.field_errors();

        if !errors.is_empty() {
            info!(%errors, "submit rejected");

            return Err(SessionError::InvalidCustomer(errors));
        }

        let draft = self.build_draft()?;

        info!(
            lines = draft.lines().len(),
            total = %draft.total(),
            payment_method = %draft.payment_method(),
            "order submitted for confirmation"
        );

        Ok(self.pending.insert(draft))
    }

    /// Confirm the pending order, then clear the cart and form.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConfirming`] if no order is pending.
    pub fn confirm(&mut self) -> Result<Confirmation, SessionError> {
        let order = self.pending.take().ok_or(SessionError::NotConfirming)?;

        self.confirmed_orders += 1;

        info!(
            number = self.confirmed_orders,
            total = %order.total(),
            change = %order.change(),
            "order confirmed"
        );

        self.reset();

        Ok(Confirmation {
            number: self.confirmed_orders,
            order,
        })
    }

    /// Discard the pending order and return to editing with everything retained.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConfirming`] if no order is pending.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.pending.take().ok_or(SessionError::NotConfirming)?;

        info!("order confirmation cancelled");

        Ok(())
    }

    fn ensure_editing(&self) -> Result<(), SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::Confirming);
        }

        Ok(())
    }

    fn build_draft(&self) -> Result<OrderDraft, PricingError> {
        OrderDraft::build(
            &self.customer,
            &self.cart,
            self.catalog.promotions(),
            self.payment_method,
            self.cash_given.as_ref(),
        )
    }

    fn reset(&mut self) {
        self.customer = CustomerInfo::default();
        self.cart.clear();
        self.payment_method = self.default_payment_method;
        self.cash_given = None;
    }
}
