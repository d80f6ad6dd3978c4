//! Scripted Checkout Example
//!
//! Walks one cash order through the session using the built-in catalog and prints the
//! confirmed order.

use std::{io, io::Write, num::NonZeroU32, sync::Arc};

use anyhow::Result;
use rusty_money::{Money, iso::VND};

use orderdesk::prelude::*;

/// Scripted Checkout Example
pub fn main() -> Result<()> {
    let catalog = Arc::new(Catalog::builtin()?);
    let mut session = OrderSession::with_default_payment_method(catalog, PaymentMethod::Cash);

    let mouse = ProductId::from("sp01");
    let monitor = ProductId::from("sp04");

    session.set_customer_name("Nguyen Van A")?;
    session.set_customer_email("a@example.com")?;
    session.set_customer_phone("0912345678")?;

    session.add_product(&mouse)?;
    session.add_product(&monitor)?;
    session.set_quantity(&mouse, NonZeroU32::MIN.saturating_add(1))?;
    session.set_promotion(&monitor, Some(PromotionCode::from("P20")))?;
    session.set_cash_given(Some(Money::from_minor(5_000_000, VND)))?;

    session.submit()?;

    let confirmation = session.confirm()?;
    let order = &confirmation.order;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "Order #{}", confirmation.number)?;
    writeln!(handle, "Customer: {}", order.customer().name)?;

    for line in order.lines() {
        let promotion = line.promotion().map(Promotion::label).unwrap_or_default();

        writeln!(
            handle,
            "  {:<28} x{:<3} {:>14} {:>14} {}",
            line.item().name(),
            line.item().quantity(),
            line.base_total(),
            line.line_total(),
            promotion
        )?;
    }

    writeln!(handle, "Subtotal: {}", order.subtotal())?;
    writeln!(handle, "Savings:  {}", order.savings()?)?;
    writeln!(handle, "Total:    {}", order.total())?;
    writeln!(handle, "Change:   {}", order.change())?;

    Ok(())
}
