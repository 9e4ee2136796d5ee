use crate::codec::envelope::{decode_envelope, decode_trade};
use crate::keys::{KeySpace, DEFAULT_KEY_PREFIX};
use r2d2::{Pool, PooledConnection};
use redis::{Commands, RedisResult};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tradelens_domain::repositories::trade_store::{
    EnvelopeError, ScoreRange, TradeRepository, TradeStoreError,
};
use tradelens_domain::value_objects::trade::{AggTradeEnvelope, TradeRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub password: Option<String>,
    pub key_prefix: String,
    pub pool_max_size: u32,
    pub connect_timeout: Duration,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            password: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            pool_max_size: 4,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedisTradeStore {
    pool: Pool<redis::Client>,
    keys: KeySpace,
}

impl RedisTradeStore {
    /// Builds the pool without opening a connection; an unreachable server
    /// surfaces as [`TradeStoreError::Connection`] on the first read.
    pub fn connect(settings: &RedisSettings) -> Result<Self, String> {
        if settings.host.trim().is_empty() {
            return Err("redis host is empty".to_string());
        }
        if settings.pool_max_size == 0 {
            return Err("redis pool_max_size must be > 0".to_string());
        }

        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(settings.host.clone(), settings.port),
            redis: redis::RedisConnectionInfo {
                db: settings.db,
                password: settings.password.clone(),
                ..Default::default()
            },
        };
        let client = redis::Client::open(info)
            .map_err(|err| format!("invalid redis connection info: {err}"))?;
        let pool = Pool::builder()
            .max_size(settings.pool_max_size)
            .min_idle(Some(0))
            .connection_timeout(settings.connect_timeout)
            .build_unchecked(client);

        tracing::debug!(
            host = %settings.host,
            port = settings.port,
            db = settings.db,
            key_prefix = %settings.key_prefix,
            "redis trade store configured"
        );
        Ok(Self {
            pool,
            keys: KeySpace::new(settings.key_prefix.clone()),
        })
    }

    fn checkout(
        &self,
        op: &'static str,
    ) -> Result<PooledConnection<redis::Client>, TradeStoreError> {
        let get_start = Instant::now();
        match self.pool.get() {
            Ok(conn) => {
                metrics::histogram!("tradelens.infra.redis.pool.get_ms")
                    .record(get_start.elapsed().as_secs_f64() * 1000.0);
                Ok(conn)
            }
            Err(err) => {
                metrics::counter!("tradelens.infra.redis.pool.get.errors_total", "op" => op)
                    .increment(1);
                tracing::error!(error = %err, "failed to checkout redis connection");
                Err(TradeStoreError::Connection(format!(
                    "failed to checkout redis connection: {err}"
                )))
            }
        }
    }
}

impl TradeRepository for RedisTradeStore {
    fn symbols(&self) -> Result<BTreeSet<String>, TradeStoreError> {
        let key = self.keys.symbols();
        let span = tracing::info_span!("infra.redis.symbols", key = %key);
        let _enter = span.enter();
        let start = Instant::now();

        let result = self.checkout("symbols").and_then(|mut pooled| {
            let conn: &mut redis::Connection = &mut pooled;
            let members: RedisResult<BTreeSet<String>> = conn.smembers(&key);
            members.map_err(|err| classify("SMEMBERS", &key, err))
        });

        record_call("symbols", start, result.is_ok());
        if let Ok(symbols) = &result {
            tracing::debug!(symbols = symbols.len(), "loaded symbols");
        }
        result
    }

    fn latest_trade(&self, symbol: &str) -> Result<Option<AggTradeEnvelope>, TradeStoreError> {
        let key = self.keys.latest(symbol);
        let span = tracing::info_span!("infra.redis.latest_trade", key = %key, symbol = %symbol);
        let _enter = span.enter();
        let start = Instant::now();

        let result = self
            .checkout("latest_trade")
            .and_then(|mut pooled| {
                let conn: &mut redis::Connection = &mut pooled;
                let raw: RedisResult<Option<String>> = conn.get(&key);
                raw.map_err(|err| classify("GET", &key, err))
            })
            .and_then(|raw| match raw {
                None => Ok(None),
                Some(raw) => decode_envelope(&raw)
                    .map(Some)
                    .map_err(|error| payload_error(&key, error)),
            });

        record_call("latest_trade", start, result.is_ok());
        if let Ok(latest) = &result {
            tracing::debug!(found = latest.is_some(), "loaded latest trade");
        }
        result
    }

    fn trades_by_score(
        &self,
        symbol: &str,
        range: ScoreRange,
    ) -> Result<Vec<TradeRecord>, TradeStoreError> {
        let key = self.keys.history(symbol);
        let span = tracing::info_span!(
            "infra.redis.trades_by_score",
            key = %key,
            symbol = %symbol,
            min = range.min,
            max = range.max
        );
        let _enter = span.enter();
        let start = Instant::now();

        let result = self
            .checkout("trades_by_score")
            .and_then(|mut pooled| {
                let conn: &mut redis::Connection = &mut pooled;
                let members: RedisResult<Vec<String>> =
                    conn.zrangebyscore(&key, range.min, range.max);
                members.map_err(|err| classify("ZRANGEBYSCORE", &key, err))
            })
            .and_then(|members| {
                metrics::counter!("tradelens.infra.redis.trades_by_score.members_total")
                    .increment(members.len() as u64);
                members
                    .iter()
                    .map(|raw| decode_trade(raw).map_err(|error| payload_error(&key, error)))
                    .collect::<Result<Vec<_>, _>>()
            });

        record_call("trades_by_score", start, result.is_ok());
        if let Ok(trades) = &result {
            tracing::debug!(trades = trades.len(), "loaded trade history");
        }
        result
    }
}

fn classify(command: &str, key: &str, err: redis::RedisError) -> TradeStoreError {
    let connection_level = err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.kind() == redis::ErrorKind::AuthenticationFailed;
    tracing::error!(command, key, error = %err, "redis command failed");
    if connection_level {
        TradeStoreError::Connection(format!("{command} {key}: {err}"))
    } else {
        TradeStoreError::Command(format!("{command} {key}: {err}"))
    }
}

fn payload_error(key: &str, error: EnvelopeError) -> TradeStoreError {
    metrics::counter!("tradelens.infra.redis.payload.errors_total").increment(1);
    tracing::warn!(key, error = %error, "malformed trade payload");
    TradeStoreError::Payload {
        key: key.to_string(),
        error,
    }
}

fn record_call(op: &'static str, start: Instant, ok: bool) {
    let result = if ok { "ok" } else { "err" };
    metrics::counter!("tradelens.infra.redis.calls_total", "op" => op, "result" => result)
        .increment(1);
    metrics::histogram!("tradelens.infra.redis.call_ms", "op" => op)
        .record(start.elapsed().as_secs_f64() * 1000.0);
}
