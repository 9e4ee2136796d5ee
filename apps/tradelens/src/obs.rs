use std::net::SocketAddr;
use tradelens_application::config::{LogConfig, LogFormat};

/// Logs go to stderr so table/JSON output on stdout stays clean.
pub fn init_tracing(log: &LogConfig) -> Result<(), String> {
    let filter = std::env::var("TRADELENS_LOG").unwrap_or_else(|_| log.level.clone());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    match log.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}

/// Used when `--metrics-addr` is passed without a value.
pub const DEFAULT_METRICS_ADDR: &str = "127.0.0.1:9184";

pub fn parse_metrics_addr(raw: &str) -> Result<SocketAddr, String> {
    let raw = raw.trim();
    let raw = if raw.is_empty() { DEFAULT_METRICS_ADDR } else { raw };
    raw.parse()
        .map_err(|err| format!("invalid --metrics-addr '{raw}' (expected host:port): {err}"))
}

/// Exporter for scraping a long-running `watch`; one-shot queries rarely need it.
#[cfg(feature = "prometheus")]
pub fn init_metrics(metrics_addr: Option<&str>) -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = metrics_addr else {
        return Ok(None);
    };
    let addr = parse_metrics_addr(raw)?;
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to start metrics exporter on {addr}: {err}"))?;
    describe_metrics();

    tracing::info!(metrics_addr = %addr, "serving tradelens metrics");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
pub fn init_metrics(metrics_addr: Option<&str>) -> Result<Option<SocketAddr>, String> {
    match metrics_addr {
        Some(raw) => {
            parse_metrics_addr(raw)?;
            Err("tradelens was built without the `prometheus` feature".to_string())
        }
        None => Ok(None),
    }
}

#[cfg(feature = "prometheus")]
fn describe_metrics() {
    metrics::describe_counter!(
        "tradelens.infra.redis.calls_total",
        "Redis reads by operation and result"
    );
    metrics::describe_histogram!(
        "tradelens.infra.redis.call_ms",
        metrics::Unit::Milliseconds,
        "Redis read latency including decoding"
    );
    metrics::describe_histogram!(
        "tradelens.infra.redis.pool.get_ms",
        metrics::Unit::Milliseconds,
        "Time to check out a pooled Redis connection"
    );
    metrics::describe_counter!(
        "tradelens.infra.redis.pool.get.errors_total",
        "Failed Redis connection checkouts"
    );
    metrics::describe_counter!(
        "tradelens.infra.redis.payload.errors_total",
        "Stored trade payloads that failed to decode"
    );
    metrics::describe_counter!(
        "tradelens.infra.redis.trades_by_score.members_total",
        "History members returned by range reads"
    );
    metrics::describe_gauge!(
        "tradelens.watch.last_price",
        "Latest trade price seen by watch, per symbol"
    );
}

#[cfg(test)]
mod tests {
    use super::{parse_metrics_addr, DEFAULT_METRICS_ADDR};

    #[test]
    fn blank_metrics_addr_uses_default() {
        let addr = parse_metrics_addr("").unwrap();
        assert_eq!(addr.to_string(), DEFAULT_METRICS_ADDR);
        assert_eq!(parse_metrics_addr("0.0.0.0:9000").unwrap().port(), 9000);
        assert!(parse_metrics_addr("localhost")
            .unwrap_err()
            .contains("host:port"));
    }
}
