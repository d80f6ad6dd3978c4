//! Order desk configuration module

use clap::Parser;

use crate::config::{catalog::CatalogConfig, observability::LoggingConfig};

pub(crate) mod catalog;
pub(crate) mod observability;

/// Order desk configuration
#[derive(Debug, Parser)]
#[command(name = "orderdesk", about = "Point-of-sale order desk", long_about = None)]
pub struct CliConfig {
    /// Catalog and checkout settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
