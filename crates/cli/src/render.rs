//! Tables for the catalog, the order form and the confirmation view.

use std::io;

use orderdesk::{
    cart::Cart,
    catalog::{ProductCatalog, PromotionCatalog},
    customer::{CustomerField, CustomerInfo, FieldErrors},
    order::OrderDraft,
    payment::PaymentMethod,
    pricing::{PricingError, price_line},
    promotions::Promotion,
    session::{Confirmation, OrderSession},
};
use rusty_money::MoneyError;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing to the output failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A cart line could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Write the product catalog.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_products(out: &mut impl io::Write, products: &ProductCatalog) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Price"]);

    for product in products.iter() {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.price.to_string(),
        ]);
    }

    write_table(out, builder, Some(2))
}

/// Write the promotion catalog as offered by the line selector.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_promotions(
    out: &mut impl io::Write,
    promotions: &PromotionCatalog,
) -> io::Result<()> {
    if promotions.is_empty() {
        return writeln!(out, "No promotions available.");
    }

    let mut builder = Builder::default();

    builder.push_record(["Code", "Type", "Value", "Label"]);

    for promotion in promotions.iter() {
        builder.push_record([
            promotion.code().to_string(),
            promotion.discount().type_name().to_string(),
            promotion.discount().magnitude(),
            promotion.label(),
        ]);
    }

    write_table(out, builder, None)
}

/// Write the customer fields with any validation message next to them.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_customer(
    out: &mut impl io::Write,
    customer: &CustomerInfo,
    errors: &FieldErrors,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Field", "Value", ""]);

    for field in CustomerField::ALL {
        let value = match field {
            CustomerField::Name => &customer.name,
            CustomerField::Email => &customer.email,
            CustomerField::Phone => &customer.phone,
        };

        builder.push_record([
            field.to_string(),
            value.clone(),
            errors.get(field).unwrap_or_default().to_string(),
        ]);
    }

    write_table(out, builder, None)
}

/// Write the cart, one row per line with its live price.
///
/// # Errors
///
/// Returns an error if a line cannot be priced or writing fails.
pub fn write_cart(
    out: &mut impl io::Write,
    cart: &Cart,
    promotions: &PromotionCatalog,
) -> Result<(), RenderError> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty.")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Unit Price", "Qty", "Promotion", "Line Total"]);

    for item in cart.iter() {
        let priced = price_line(item, promotions)?;

        builder.push_record([
            item.product_id().to_string(),
            item.name().to_string(),
            item.custom_price().to_string(),
            item.quantity().to_string(),
            item.promotion_code()
                .map_or_else(String::new, ToString::to_string),
            priced.total.to_string(),
        ]);
    }

    write_table(out, builder, Some(2))?;

    Ok(())
}

/// Write the live totals block: total, payment method, cash given and change due.
///
/// # Errors
///
/// Returns an error if pricing or writing fails.
pub fn write_totals(out: &mut impl io::Write, session: &OrderSession) -> Result<(), RenderError> {
    writeln!(out, " Total:    {}", session.total()?)?;
    writeln!(out, " Payment:  {}", session.payment_method())?;

    if session.payment_method() == PaymentMethod::Cash {
        let cash = session
            .cash_given()
            .map_or_else(|| "-".to_string(), ToString::to_string);

        writeln!(out, " Cash:     {cash}")?;

        let change = session.change_due()?;

        if change.to_minor_units() > 0 {
            writeln!(out, " Change:   {change}")?;
        }
    }

    Ok(())
}

/// Write the whole order form.
///
/// # Errors
///
/// Returns an error if pricing or writing fails.
pub fn write_order_form(
    out: &mut impl io::Write,
    session: &OrderSession,
) -> Result<(), RenderError> {
    write_customer(out, session.customer(), &session.field_errors())?;
    write_cart(out, session.cart(), session.catalog().promotions())?;
    write_totals(out, session)
}

/// Write the confirmation view of an order awaiting confirmation.
///
/// Everything shown is read from the draft as priced at submit time.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_confirmation_view(
    out: &mut impl io::Write,
    draft: &OrderDraft,
) -> Result<(), RenderError> {
    let customer = draft.customer();

    writeln!(out, "Confirm order for {}", customer.name)?;
    writeln!(out, " Email: {}", customer.email)?;
    writeln!(out, " Phone: {}", customer.phone)?;

    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Qty", "Base Price", "Line Total", "Promotion"]);

    for line in draft.lines() {
        let item = line.item();

        builder.push_record([
            item.product_id().to_string(),
            item.name().to_string(),
            item.quantity().to_string(),
            line.base_total().to_string(),
            line.line_total().to_string(),
            line.promotion().map(Promotion::label).unwrap_or_default(),
        ]);
    }

    write_table(out, builder, None)?;

    writeln!(out, " Subtotal: {}", draft.subtotal())?;
    writeln!(out, " Savings:  {}", draft.savings()?)?;
    writeln!(out, " Total:    {}", draft.total())?;
    writeln!(out, " Payment:  {}", draft.payment_method())?;

    if let Some(cash) = draft.cash_given() {
        writeln!(out, " Cash:     {cash}")?;
        writeln!(out, " Change:   {}", draft.change())?;
    }

    writeln!(out, "Type 'confirm' to place the order or 'cancel' to go back.")?;

    Ok(())
}

/// Write the notice shown once an order is confirmed.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_confirmed(out: &mut impl io::Write, confirmation: &Confirmation) -> io::Result<()> {
    let order = &confirmation.order;

    write!(
        out,
        "Order #{} confirmed. Total: {}",
        confirmation.number,
        order.total()
    )?;

    if order.change().to_minor_units() > 0 {
        write!(out, ", change: {}", order.change())?;
    }

    writeln!(out)
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned_from: Option<usize>,
) -> io::Result<()> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());

    if let Some(column) = right_aligned_from {
        table.modify(Columns::new(column..), Alignment::right());
        table.modify(Rows::first(), Alignment::left());
    }

    writeln!(out, "{table}")
}
