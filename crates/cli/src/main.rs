//! Order Desk Shell

use std::{
    io::{self, IsTerminal},
    process,
    sync::Arc,
};

use orderdesk::{catalog::Catalog, session::OrderSession};
use tracing::{error, info};

use crate::{config::CliConfig, shell::Shell};

mod config;
mod observability;
mod render;
mod shell;

/// Order Desk Shell entry point
pub fn main() {
    // Load configuration from .env and CLI arguments
    let config = CliConfig::load().unwrap_or_else(|e| e.exit());

    // Initialize logging
    if let Err(init_error) = observability::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {init_error}");
        }

        process::exit(1);
    }

    let catalog = match Catalog::load(
        config.catalog.products.as_deref(),
        config.catalog.promotions.as_deref(),
    ) {
        Ok(catalog) => catalog,
        Err(load_error) => {
            error!("failed to load catalog: {load_error}");

            process::exit(1);
        }
    };

    info!(
        products = catalog.products().len(),
        promotions = catalog.promotions().len(),
        currency = catalog.currency().iso_alpha_code,
        "catalog loaded"
    );

    let session =
        OrderSession::with_default_payment_method(Arc::new(catalog), config.catalog.payment_method);

    let stdin = io::stdin();
    let mut shell = Shell::new(session).with_prompt(stdin.is_terminal());

    if let Err(io_error) = shell.run(stdin.lock(), io::stdout().lock()) {
        error!("shell terminated: {io_error}");

        process::exit(1);
    }

    info!(
        orders = shell.session().confirmed_orders(),
        "shell closed"
    );
}
