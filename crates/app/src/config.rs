//! Application configuration

use std::{path::PathBuf, time::Duration};

use clap::Args;
use moonbeam::catalog::{Catalog, CatalogError};

/// Catalog compiled into the binary, used when no catalog file is configured.
const BUNDLED_CATALOG: &str = include_str!("../../core/fixtures/catalog/moonbeam.yml");

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Menu and store catalog (YAML); the bundled catalog is used when omitted
    #[arg(long, env = "MOONBEAM_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Simulated payment processing time in milliseconds
    #[arg(long, env = "MOONBEAM_PAYMENT_DELAY_MS", default_value_t = 1_500_u64, global = true)]
    pub payment_delay_ms: u64,

    /// How long checkout waits for payment, in milliseconds
    #[arg(long, env = "MOONBEAM_PAYMENT_TIMEOUT_MS", default_value_t = 10_000_u64, global = true)]
    pub payment_timeout_ms: u64,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load the configured catalog, or the bundled one.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be read or is invalid.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Catalog::from_yaml(BUNDLED_CATALOG),
        }
    }

    /// Simulated payment processing time
    pub fn payment_delay(&self) -> Duration {
        Duration::from_millis(self.payment_delay_ms)
    }

    /// Checkout payment timeout
    pub fn payment_timeout(&self) -> Duration {
        Duration::from_millis(self.payment_timeout_ms)
    }
}
