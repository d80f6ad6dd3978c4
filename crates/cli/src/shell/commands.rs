//! Shell command grammar.
//!
//! Each input line is split on whitespace and parsed as one subcommand.

use std::num::NonZeroU32;

use clap::{Parser, Subcommand};
use orderdesk::payment::PaymentMethod;

/// One line of shell input.
#[derive(Debug, Parser)]
#[command(
    name = "orderdesk",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true,
    help_template = "Commands:\n{subcommands}"
)]
pub struct CommandLine {
    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Order desk shell command.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the product catalog
    Products,

    /// List the available promotions
    Promotions,

    /// Set the customer name
    Name {
        /// Full name; may contain spaces
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Set the customer email
    Email {
        /// Email address
        address: String,
    },

    /// Set the customer phone number
    Phone {
        /// 10 or 11 digits
        number: String,
    },

    /// Add a product to the cart
    Add {
        /// Product ID
        product: String,
    },

    /// Set the quantity of a cart line
    Qty {
        /// Product ID
        product: String,

        /// New quantity, at least 1
        quantity: NonZeroU32,
    },

    /// Override the unit price of a cart line
    Price {
        /// Product ID
        product: String,

        /// Unit price in the catalog currency
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },

    /// Apply a promotion to a cart line; omit the code to clear it
    Promo {
        /// Product ID
        product: String,

        /// Promotion code
        code: Option<String>,
    },

    /// Remove a line from the cart
    Remove {
        /// Product ID
        product: String,
    },

    /// Select the payment method
    Pay {
        /// cash or card
        method: PaymentMethod,
    },

    /// Set the cash handed over; omit the amount to clear it
    Cash {
        /// Amount in the catalog currency
        #[arg(allow_negative_numbers = true)]
        amount: Option<String>,
    },

    /// Show the order form
    Show,

    /// Submit the order for confirmation
    Submit,

    /// Confirm the order awaiting confirmation
    Confirm,

    /// Go back to editing the order awaiting confirmation
    Cancel,

    /// Show this help
    Help,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

impl Command {
    /// Parse one whitespace-separated input line.
    ///
    /// # Errors
    ///
    /// Returns a [`clap::Error`] describing the usage problem.
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        CommandLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
    }
}
