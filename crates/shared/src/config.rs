//! Application configuration management.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Reference currency and exchange rates.
    pub currency: CurrencyConfig,
    /// Settlement tolerance and output precision.
    pub settlement: SettlementConfig,
    /// Settlement report cache.
    pub cache: CacheConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Currency configuration.
///
/// `rates` holds overrides only; every currency without an entry keeps its
/// standard rate.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// Currency all balances are normalized into.
    #[serde(default = "default_reference")]
    pub reference: Currency,
    /// Rate overrides (1 reference unit = rate units of the currency).
    #[serde(default)]
    pub rates: BTreeMap<Currency, Decimal>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            reference: default_reference(),
            rates: BTreeMap::new(),
        }
    }
}

fn default_reference() -> Currency {
    Currency::Usd
}

impl CurrencyConfig {
    /// Returns the standard rate table with the configured overrides applied.
    #[must_use]
    pub fn resolved_rates(&self) -> BTreeMap<Currency, Decimal> {
        let mut rates: BTreeMap<Currency, Decimal> = Currency::ALL
            .iter()
            .map(|currency| (*currency, currency.standard_rate()))
            .collect();
        rates.extend(self.rates.iter().map(|(currency, rate)| (*currency, *rate)));
        rates
    }
}

/// Settlement configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Balances and transfers below this magnitude count as settled.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
    /// Decimal places emitted settlement amounts are rounded to.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_decimal_places() -> u32 {
    2
}

/// Settlement report cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached reports.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Time-to-live in seconds for each cached report.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_max_capacity() -> u64 {
    100
}

fn default_ttl_secs() -> u64 {
    300 // 5 minutes
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `TALLYUP__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLYUP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
