//! Application configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Exchange-rate source configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Ledger defaults.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Exchange-rate source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Whether default rates are fetched at all.
    #[serde(default = "default_rates_enabled")]
    pub enabled: bool,
    /// Base URL of the rate API.
    #[serde(default = "default_rates_base_url")]
    pub base_url: String,
    /// HTTP timeout in seconds.
    #[serde(default = "default_rates_timeout")]
    pub timeout_secs: u64,
    /// Maximum number of cached (pair, day) rates.
    #[serde(default = "default_rates_cache_capacity")]
    pub cache_capacity: u64,
}

fn default_rates_enabled() -> bool {
    true
}

fn default_rates_base_url() -> String {
    "https://api.frankfurter.app".to_string()
}

fn default_rates_timeout() -> u64 {
    5
}

fn default_rates_cache_capacity() -> u64 {
    256
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            enabled: default_rates_enabled(),
            base_url: default_rates_base_url(),
            timeout_secs: default_rates_timeout(),
            cache_capacity: default_rates_cache_capacity(),
        }
    }
}

/// Ledger defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Base currency for newly created trips.
    #[serde(default = "default_currency")]
    pub default_currency: Currency,
}

fn default_currency() -> Currency {
    Currency::Sek
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TRIPSPLIT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
