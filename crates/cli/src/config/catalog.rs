//! Catalog & Checkout Config

use std::path::PathBuf;

use clap::Args;
use orderdesk::payment::PaymentMethod;

/// Catalog sources and checkout defaults.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Product fixture file (YAML); the built-in catalog is used when omitted
    #[arg(long, env = "ORDERDESK_PRODUCTS")]
    pub products: Option<PathBuf>,

    /// Promotion fixture file (YAML); the built-in promotions are used when omitted
    #[arg(long, env = "ORDERDESK_PROMOTIONS")]
    pub promotions: Option<PathBuf>,

    /// Payment method selected for every new order (cash, card)
    #[arg(long, env = "ORDERDESK_PAYMENT_METHOD", default_value_t = PaymentMethod::Card)]
    pub payment_method: PaymentMethod,
}
