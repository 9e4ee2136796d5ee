use std::env;
use std::time::Duration;
use tradelens_application::client::TradeDataClient;
use tradelens_application::config::{Config, RedisConfig};
use tradelens_infrastructure::persistence::redis_trades::{RedisSettings, RedisTradeStore};

const PASSWORD_ENV: &str = "TRADELENS_REDIS_PASSWORD";

pub fn build_client(config: &Config) -> Result<TradeDataClient, String> {
    let settings = redis_settings(&config.redis, env::var(PASSWORD_ENV).ok());
    let store = RedisTradeStore::connect(&settings).map_err(|err| {
        format!(
            "failed to init redis store ({}:{}/{}): {err}",
            settings.host, settings.port, settings.db
        )
    })?;
    Ok(TradeDataClient::new(Box::new(store)))
}

/// A password in the config file wins over the environment.
pub fn redis_settings(config: &RedisConfig, env_password: Option<String>) -> RedisSettings {
    let password = match config.password.as_deref() {
        Some(password) if !password.is_empty() => Some(password.to_string()),
        _ => env_password.filter(|password| !password.is_empty()),
    };
    RedisSettings {
        host: config.host.clone(),
        port: config.port,
        db: config.db,
        password,
        key_prefix: config.key_prefix.clone(),
        pool_max_size: config.pool_max_size,
        connect_timeout: Duration::from_millis(config.connect_timeout_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::redis_settings;
    use std::time::Duration;
    use tradelens_application::config::RedisConfig;

    #[test]
    fn config_password_takes_precedence_over_env() {
        let config = RedisConfig {
            password: Some("from-file".to_string()),
            ..RedisConfig::default()
        };
        let settings = redis_settings(&config, Some("from-env".to_string()));
        assert_eq!(settings.password.as_deref(), Some("from-file"));
    }

    #[test]
    fn env_password_fills_missing_or_blank_config() {
        let settings = redis_settings(&RedisConfig::default(), Some("from-env".to_string()));
        assert_eq!(settings.password.as_deref(), Some("from-env"));

        let blank = RedisConfig {
            password: Some(String::new()),
            ..RedisConfig::default()
        };
        assert_eq!(redis_settings(&blank, Some(String::new())).password, None);
    }

    #[test]
    fn copies_connection_fields() {
        let config = RedisConfig {
            host: "redis.internal".to_string(),
            port: 6380,
            db: 3,
            connect_timeout_ms: 250,
            ..RedisConfig::default()
        };
        let settings = redis_settings(&config, None);
        assert_eq!(settings.host, "redis.internal");
        assert_eq!(settings.port, 6380);
        assert_eq!(settings.db, 3);
        assert_eq!(settings.key_prefix, "binance:");
        assert_eq!(settings.connect_timeout, Duration::from_millis(250));
    }
}
