use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tradelens_domain::value_objects::interval::{BarInterval, DEFAULT_INTERVAL};
use tradelens_domain::value_objects::lookback::{Lookback, DEFAULT_LOOKBACK_HOURS};
use tradelens_domain::value_objects::price_bin::{DEFAULT_PRICE_BINS, MAX_PRICE_BINS};

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub redis: RedisConfig,
    pub query: QueryConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub password: Option<String>,
    pub key_prefix: String,
    pub pool_max_size: u32,
    pub connect_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            password: None,
            key_prefix: "binance:".to_string(),
            pool_max_size: 4,
            connect_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct QueryConfig {
    pub lookback_hours: u32,
    pub interval: String,
    pub price_bins: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
            interval: DEFAULT_INTERVAL.to_string(),
            price_bins: DEFAULT_PRICE_BINS,
        }
    }
}

impl QueryConfig {
    pub fn lookback(&self) -> Result<Lookback, String> {
        Lookback::hours(self.lookback_hours)
            .map_err(|err| format!("invalid query.lookback_hours: {err}"))
    }

    pub fn bar_interval(&self) -> Result<BarInterval, String> {
        BarInterval::parse(&self.interval).map_err(|err| format!("invalid query.interval: {err}"))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<(), String> {
    if config.redis.host.trim().is_empty() {
        return Err("redis.host must not be empty".to_string());
    }
    if config.redis.pool_max_size == 0 {
        return Err("redis.pool_max_size must be > 0".to_string());
    }
    if config.query.price_bins == 0 || config.query.price_bins > MAX_PRICE_BINS {
        return Err(format!(
            "query.price_bins must be in 1..={MAX_PRICE_BINS} (got {})",
            config.query.price_bins
        ));
    }
    config.query.lookback()?;
    config.query.bar_interval()?;
    Ok(())
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}
