//! Line-oriented order desk shell.
//!
//! Reads one command per line and renders the affected part of the order form after each
//! command. Command errors are reported on the output and the shell keeps going.

use std::io::{self, BufRead, Write};

use clap::CommandFactory;
use orderdesk::{
    prices::{PriceError, parse_amount},
    products::ProductId,
    promotions::PromotionCode,
    session::{OrderSession, Phase, SessionError},
};
use thiserror::Error;
use tracing::debug;

use crate::render::{self, RenderError};

pub(crate) mod commands;

pub use commands::{Command, CommandLine};

/// Errors raised while executing a shell command.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The product ID is not in the catalog.
    #[error("unknown product '{0}'")]
    UnknownProduct(ProductId),

    /// The product is already in the cart.
    #[error("'{0}' is already in the cart")]
    AlreadyInCart(ProductId),

    /// The product is not in the cart.
    #[error("'{0}' is not in the cart")]
    NotInCart(ProductId),

    /// The promotion code is not offered by the catalog.
    #[error("unknown promotion '{0}'")]
    UnknownPromotion(PromotionCode),

    /// An amount could not be parsed.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// The session rejected the command.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<io::Error> for ShellError {
    fn from(error: io::Error) -> Self {
        ShellError::Render(RenderError::Io(error))
    }
}

/// What the shell does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,

    /// Stop reading input.
    Quit,
}

/// Order desk shell
#[derive(Debug)]
pub struct Shell {
    session: OrderSession,
    prompt: bool,
}

impl Shell {
    /// Create a shell driving `session`.
    pub fn new(session: OrderSession) -> Self {
        Self {
            session,
            prompt: false,
        }
    }

    /// Print a prompt before reading each line.
    #[must_use]
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// The session being driven.
    pub fn session(&self) -> &OrderSession {
        &self.session
    }

    /// Run commands from `input` until it ends or `quit` is entered.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "Order desk ready. Type 'help' for commands.")?;

        let mut lines = input.lines();

        loop {
            if self.prompt {
                write!(out, "{}> ", self.prompt_label())?;
                out.flush()?;
            }

            let Some(line) = lines.next() else {
                break;
            };

            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            let command = match Command::parse_line(&line) {
                Ok(command) => command,
                Err(usage) => {
                    write!(out, "{}", usage.render())?;
                    continue;
                }
            };

            match self.execute(&command, &mut out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(ShellError::Render(RenderError::Io(error))) => return Err(error),
                Err(error) => writeln!(out, "error: {error}")?,
            }
        }

        Ok(())
    }

    /// Execute a single command, writing its output to `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] if the command is rejected or output fails.
    pub fn execute(&mut self, command: &Command, out: &mut impl Write) -> Result<Flow, ShellError> {
        debug!(?command, "executing command");

        match command {
            Command::Products => render::write_products(out, self.session.catalog().products())?,
            Command::Promotions => {
                render::write_promotions(out, self.session.catalog().promotions())?;
            }
            Command::Name { words } => {
                self.session.set_customer_name(words.join(" "))?;
                self.write_field_errors(out)?;
            }
            Command::Email { address } => {
                self.session.set_customer_email(address.as_str())?;
                self.write_field_errors(out)?;
            }
            Command::Phone { number } => {
                self.session.set_customer_phone(number.as_str())?;
                self.write_field_errors(out)?;
            }
            Command::Add { product } => {
                let id = ProductId::from(product.as_str());

                if !self.session.add_product(&id)? {
                    return Err(if self.session.catalog().products().get(&id).is_some() {
                        ShellError::AlreadyInCart(id)
                    } else {
                        ShellError::UnknownProduct(id)
                    });
                }

                self.write_cart(out)?;
            }
            Command::Qty { product, quantity } => {
                let id = ProductId::from(product.as_str());

                self.ensure_in_cart(&id)?;
                self.session.set_quantity(&id, *quantity)?;
                self.write_cart(out)?;
            }
            Command::Price { product, amount } => {
                let id = ProductId::from(product.as_str());
                let price = parse_amount(amount, self.session.catalog().currency())?;

                self.ensure_in_cart(&id)?;
                self.session.set_custom_price(&id, price)?;
                self.write_cart(out)?;
            }
            Command::Promo { product, code } => {
                let id = ProductId::from(product.as_str());
                let code = code.as_deref().map(PromotionCode::from);

                if let Some(code) = &code
                    && self.session.catalog().promotions().get(code).is_none()
                {
                    return Err(ShellError::UnknownPromotion(code.clone()));
                }

                self.ensure_in_cart(&id)?;
                self.session.set_promotion(&id, code)?;
                self.write_cart(out)?;
            }
            Command::Remove { product } => {
                let id = ProductId::from(product.as_str());

                if !self.session.remove_item(&id)? {
                    return Err(ShellError::NotInCart(id));
                }

                match self.session.draft() {
                    Some(draft) => render::write_confirmation_view(out, draft)?,
                    None => self.write_cart(out)?,
                }
            }
            Command::Pay { method } => {
                self.session.set_payment_method(*method)?;
                render::write_totals(out, &self.session)?;
            }
            Command::Cash { amount } => {
                let currency = self.session.catalog().currency();
                let cash = amount
                    .as_deref()
                    .map(|amount| parse_amount(amount, currency))
                    .transpose()?;

                self.session.set_cash_given(cash)?;
                render::write_totals(out, &self.session)?;
            }
            Command::Show => match self.session.draft() {
                Some(draft) => render::write_confirmation_view(out, draft)?,
                None => render::write_order_form(out, &self.session)?,
            },
            Command::Submit => {
                let draft = self.session.submit()?;

                render::write_confirmation_view(out, draft)?;
            }
            Command::Confirm => {
                let confirmation = self.session.confirm()?;

                render::write_confirmed(out, &confirmation)?;
            }
            Command::Cancel => {
                self.session.cancel()?;
                render::write_order_form(out, &self.session)?;
            }
            Command::Help => write!(out, "{}", CommandLine::command().render_help())?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn prompt_label(&self) -> &'static str {
        match self.session.phase() {
            Phase::Editing => "order",
            Phase::Confirming => "confirm",
        }
    }

    fn ensure_in_cart(&self, id: &ProductId) -> Result<(), ShellError> {
        if self.session.cart().get(id).is_none() {
            return Err(ShellError::NotInCart(id.clone()));
        }

        Ok(())
    }

    fn write_cart(&self, out: &mut impl Write) -> Result<(), ShellError> {
        render::write_cart(out, self.session.cart(), self.session.catalog().promotions())?;
        render::write_totals(out, &self.session)?;

        Ok(())
    }

    fn write_field_errors(&self, out: &mut impl Write) -> io::Result<()> {
        for error in self.session.field_errors().iter() {
            writeln!(out, " {}: {}", error.field, error.message)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use orderdesk::catalog::Catalog;
    use testresult::TestResult;

    use super::*;

    fn shell() -> TestResult<Shell> {
        Ok(Shell::new(OrderSession::new(Arc::new(Catalog::builtin()?))))
    }

    fn run(shell: &mut Shell, script: &str) -> TestResult<String> {
        let mut out = Vec::new();

        shell.run(script.as_bytes(), &mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn scripted_order_is_confirmed() -> TestResult {
        let mut shell = shell()?;

        let output = run(
            &mut shell,
            "name Nguyen Van A\n\
             email a@example.com\n\
             phone 0912345678\n\
             add sp01\n\
             promo sp01 P10\n\
             submit\n\
             confirm\n",
        )?;

        assert!(output.contains("Confirm order for Nguyen Van A"));
        assert!(output.contains("Order #1 confirmed."));
        assert_eq!(shell.session().confirmed_orders(), 1);
        assert!(shell.session().cart().is_empty());

        Ok(())
    }

    #[test]
    fn errors_are_reported_and_shell_continues() -> TestResult {
        let mut shell = shell()?;

        let output = run(&mut shell, "add sp99\nsubmit\nadd sp02\nadd sp02\nbogus\n")?;

        assert!(output.contains("error: unknown product 'sp99'"));
        assert!(output.contains("error: the cart is empty"));
        assert!(output.contains("error: 'sp02' is already in the cart"));
        assert!(output.contains("bogus"));
        assert_eq!(shell.session().cart().len(), 1);

        Ok(())
    }

    #[test]
    fn invalid_customer_blocks_submit() -> TestResult {
        let mut shell = shell()?;

        let output = run(&mut shell, "add sp01\nphone 123\nsubmit\n")?;

        assert!(output.contains("phone: Invalid phone number"));
        assert!(output.contains("error: customer details are invalid"));
        assert_eq!(shell.session().phase(), Phase::Editing);

        Ok(())
    }

    #[test]
    fn edits_are_locked_while_confirming_except_remove() -> TestResult {
        let mut shell = shell()?;

        let output = run(
            &mut shell,
            "name Tran Thi B\n\
             email b@example.com\n\
             phone 0987654321\n\
             add sp01\n\
             add sp02\n\
             submit\n\
             qty sp01 2\n\
             remove sp02\n",
        )?;

        assert!(output.contains("error: an order is awaiting confirmation"));
        assert_eq!(shell.session().phase(), Phase::Confirming);
        assert_eq!(
            shell.session().draft().map(|draft| draft.lines().len()),
            Some(1)
        );

        Ok(())
    }

    #[test]
    fn unknown_promotion_is_rejected() -> TestResult {
        let mut shell = shell()?;

        let output = run(&mut shell, "add sp01\npromo sp01 FREE\n")?;

        assert!(output.contains("error: unknown promotion 'FREE'"));
        assert_eq!(
            shell
                .session()
                .cart()
                .get(&ProductId::from("sp01"))
                .and_then(|item| item.promotion_code().cloned()),
            None
        );

        Ok(())
    }

    #[test]
    fn cash_without_amount_clears_it() -> TestResult {
        let mut shell = shell()?;

        run(&mut shell, "pay cash\ncash 300000\n")?;

        assert!(shell.session().cash_given().is_some());

        let output = run(&mut shell, "cash\n")?;

        assert_eq!(shell.session().cash_given(), None);
        assert!(output.contains(" Cash:     -"));

        Ok(())
    }

    #[test]
    fn quit_stops_reading() -> TestResult {
        let mut shell = shell()?;

        run(&mut shell, "quit\nadd sp01\n")?;

        assert!(shell.session().cart().is_empty());

        Ok(())
    }
}
