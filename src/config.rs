//! Configuration module for loading and parsing TOML configuration files.
//!
//! A file holds one `[profiles.<name>]` block per deployment environment plus
//! a shared `[markets]` section. The environment name picks the profile at
//! startup; command-line flags are folded into [`RuntimeSettings`].

use crate::models::{Instrument, InstrumentPair};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
    /// No profile with the requested name.
    #[error("invalid environment: {0}")]
    UnknownEnvironment(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Deployment profiles keyed by environment name.
    pub profiles: HashMap<String, Profile>,
    /// Market reference data shared by all profiles.
    #[serde(default)]
    pub markets: MarketsConfig,
}

/// Settings for one deployment environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Listener configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Ledger query collaborator.
    pub ledger: LedgerConfig,
    /// Response cache.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5993,
        }
    }
}

/// Ledger query service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// URL exercised-offer queries are POSTed to.
    pub endpoint: String,
    /// Deadline for a single sub-query, in milliseconds.
    #[serde(default = "default_ledger_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_ledger_timeout_ms() -> u64 {
    30_000
}

/// Cache store backend.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// Redis server.
    #[default]
    Redis,
    /// In-process map.
    Memory,
}

/// Response cache configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is requested.
    #[serde(default)]
    pub enabled: bool,
    /// Store backend.
    #[serde(default)]
    pub backend: CacheBackend,
    /// Store host.
    pub host: Option<String>,
    /// Store port.
    pub port: Option<u16>,
    /// Logical database index.
    pub db: Option<i64>,
    /// Store password.
    pub password: Option<String>,
    /// Entry limit for the memory backend.
    pub max_entries: Option<usize>,
}

impl CacheConfig {
    /// Builds the Redis connection URL.
    ///
    /// Returns `None` when host or port is missing or empty.
    #[must_use]
    pub fn redis_url(&self) -> Option<String> {
        let host = self.host.as_deref().filter(|h| !h.trim().is_empty())?;
        let port = self.port.filter(|p| *p != 0)?;
        let auth = self
            .password
            .as_deref()
            .map(|password| format!(":{}@", password))
            .unwrap_or_default();
        let db = self.db.unwrap_or(0);
        Some(format!("redis://{}{}:{}/{}", auth, host, port, db))
    }
}

/// One issued currency of the default market basket.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MarketConfig {
    /// Currency code.
    pub currency: String,
    /// Issuing account.
    pub issuer: String,
}

impl MarketConfig {
    fn new(currency: &str, issuer: &str) -> Self {
        Self {
            currency: currency.to_string(),
            issuer: issuer.to_string(),
        }
    }
}

/// Market reference data.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsConfig {
    /// Code of the network's native unit.
    #[serde(default = "default_native_currency")]
    pub native_currency: String,
    /// Markets queried when a request names no pair.
    #[serde(default = "default_basket")]
    pub default_pairs: Vec<MarketConfig>,
}

fn default_native_currency() -> String {
    "XRP".to_string()
}

fn default_basket() -> Vec<MarketConfig> {
    vec![
        MarketConfig::new("USD", "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B"),
        MarketConfig::new("BTC", "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B"),
        MarketConfig::new("BTC", "rMwjYedjc7qqtKYVLiAccJSmCwih4LnE2q"),
        MarketConfig::new("BTC", "rfYv1TXnwgDDK4WQNbFALykYuEBnrR4pDX"),
        MarketConfig::new("BTC", "rNPRNzBB92BVpAhhZr4iXDTveCgV5Pofm9"),
        MarketConfig::new("USD", "rMwjYedjc7qqtKYVLiAccJSmCwih4LnE2q"),
        MarketConfig::new("CNY", "rnuF96W4SZoCJmbHYBFoJZpR8eCaxNvekK"),
        MarketConfig::new("CNY", "razqQKzJRdB4UxFPWf5NEpEG3WMkmwgcXA"),
        MarketConfig::new("JPY", "rMAz5ZnK73nyNUL4foAvaxdreczCkG3vA6"),
    ]
}

impl Default for MarketsConfig {
    fn default() -> Self {
        Self {
            native_currency: default_native_currency(),
            default_pairs: default_basket(),
        }
    }
}

impl MarketsConfig {
    /// Default basket as pairs, each quoted against the native unit.
    #[must_use]
    pub fn basket(&self) -> Vec<InstrumentPair> {
        self.default_pairs
            .iter()
            .map(|market| InstrumentPair {
                base: Instrument::native(&self.native_currency),
                counter: Instrument::issued(&market.currency, &market.issuer),
            })
            .collect()
    }

    /// Whether `code` names the native unit.
    #[must_use]
    pub fn is_native(&self, code: &str) -> bool {
        code.eq_ignore_ascii_case(&self.native_currency)
    }
}

/// Process-wide switches fixed at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeSettings {
    /// Verbose logging, including request bodies.
    pub debug: bool,
    /// Caching was not switched off on the command line.
    pub cache_allowed: bool,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the profile for an environment.
    ///
    /// # Errors
    /// Returns `UnknownEnvironment` if no such profile exists.
    pub fn profile(&self, environment: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(environment)
            .ok_or_else(|| ConfigError::UnknownEnvironment(environment.to_string()))
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.profiles.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one profile must be configured".to_string(),
            ));
        }

        for (name, profile) in &self.profiles {
            if profile.ledger.endpoint.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "profile {} ledger endpoint cannot be empty",
                    name
                )));
            }
            if profile.ledger.timeout_ms == 0 {
                return Err(ConfigError::InvalidValue(format!(
                    "profile {} ledger timeout_ms must be positive",
                    name
                )));
            }
        }

        if self.markets.native_currency.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "native currency cannot be empty".to_string(),
            ));
        }

        for market in &self.markets.default_pairs {
            if market.currency.is_empty() || market.issuer.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "default pairs need a currency and an issuer".to_string(),
                ));
            }
            if self.markets.is_native(&market.currency) {
                return Err(ConfigError::InvalidValue(format!(
                    "default pair {} cannot use the native currency",
                    market.currency
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[profiles.development.server]
host = "127.0.0.1"
port = 5993

[profiles.development.ledger]
endpoint = "http://localhost:5984/ledger/offers_exercised"
timeout_ms = 5000

[profiles.development.cache]
enabled = true
backend = "redis"
host = "127.0.0.1"
port = 6379

[profiles.production.ledger]
endpoint = "http://ledger.internal/offers_exercised"
"#;

    #[test]
    fn test_parse_config() {
        let config = Config::parse(SAMPLE).expect("should parse");
        let dev = config.profile("development").unwrap();
        assert_eq!(dev.server.host, "127.0.0.1");
        assert_eq!(dev.server.port, 5993);
        assert_eq!(dev.ledger.timeout_ms, 5000);
        assert!(dev.cache.enabled);
        assert_eq!(dev.cache.backend, CacheBackend::Redis);

        let prod = config.profile("production").unwrap();
        assert_eq!(prod.server.port, 5993);
        assert_eq!(prod.ledger.timeout_ms, 30_000);
        assert!(!prod.cache.enabled);
    }

    #[test]
    fn test_unknown_environment() {
        let config = Config::parse(SAMPLE).unwrap();
        let err = config.profile("staging").unwrap_err();
        assert_eq!(err.to_string(), "invalid environment: staging");
    }

    #[test]
    fn test_default_basket() {
        let config = Config::parse(SAMPLE).unwrap();
        let basket = config.markets.basket();
        assert_eq!(basket.len(), 9);
        assert!(basket.iter().all(|pair| pair.base == Instrument::native("XRP")));
        assert_eq!(
            basket[0].counter,
            Instrument::issued("USD", "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B")
        );
    }

    #[test]
    fn test_custom_basket() {
        let content = format!(
            "{}\n[markets]\nnative_currency = \"XRP\"\n[[markets.default_pairs]]\ncurrency = \"EUR\"\nissuer = \"rEuro\"\n",
            SAMPLE
        );
        let config = Config::parse(&content).unwrap();
        assert_eq!(config.markets.basket().len(), 1);
    }

    #[test]
    fn test_native_pair_rejected() {
        let content = format!(
            "{}\n[[markets.default_pairs]]\ncurrency = \"xrp\"\nissuer = \"rX\"\n",
            SAMPLE
        );
        assert!(Config::parse(&content).is_err());
    }

    #[test]
    fn test_validation_empty_profiles() {
        let config = Config {
            profiles: HashMap::new(),
            markets: MarketsConfig::default(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redis_url() {
        let mut cache = CacheConfig {
            enabled: true,
            host: Some("cache.local".to_string()),
            port: Some(6380),
            ..Default::default()
        };
        assert_eq!(cache.redis_url().unwrap(), "redis://cache.local:6380/0");

        cache.password = Some("secret".to_string());
        cache.db = Some(2);
        assert_eq!(cache.redis_url().unwrap(), "redis://:secret@cache.local:6380/2");
    }

    #[test]
    fn test_redis_url_requires_host_and_port() {
        let cache = CacheConfig {
            enabled: true,
            port: Some(6379),
            ..Default::default()
        };
        assert!(cache.redis_url().is_none());

        let cache = CacheConfig {
            enabled: true,
            host: Some("localhost".to_string()),
            ..Default::default()
        };
        assert!(cache.redis_url().is_none());
    }

    #[test]
    fn test_is_native_case_insensitive() {
        let markets = MarketsConfig::default();
        assert!(markets.is_native("xrp"));
        assert!(!markets.is_native("USD"));
    }
}
