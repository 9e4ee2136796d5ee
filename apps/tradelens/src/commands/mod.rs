mod query;
mod stats;
mod watch;

use crate::output::OutputMode;
use std::path::Path;
use tradelens_application::client::TradeDataClient;
use tradelens_application::config::{load_config, Config};
use tradelens_domain::value_objects::interval::BarInterval;
use tradelens_domain::value_objects::lookback::Lookback;

pub enum Command {
    Symbols,
    Latest {
        symbol: String,
    },
    History {
        symbol: String,
        period: Option<String>,
        limit: Option<usize>,
    },
    Ohlcv {
        symbol: String,
        interval: Option<String>,
        period: Option<String>,
    },
    Profile {
        symbol: String,
        bins: Option<usize>,
        period: Option<String>,
    },
    Stats {
        symbols: Vec<String>,
        period: Option<String>,
    },
    Watch {
        symbols: Vec<String>,
        interval_secs: u64,
        iterations: Option<u64>,
    },
}

pub fn run(
    command: Command,
    client: &TradeDataClient,
    config: &Config,
    mode: OutputMode,
) -> Result<(), String> {
    match command {
        Command::Symbols => query::run_symbols(client, mode),
        Command::Latest { symbol } => query::run_latest(client, &normalize_symbol(&symbol), mode),
        Command::History {
            symbol,
            period,
            limit,
        } => {
            let lookback = resolve_lookback(period.as_deref(), config)?;
            query::run_history(client, &normalize_symbol(&symbol), lookback, limit, mode)
        }
        Command::Ohlcv {
            symbol,
            interval,
            period,
        } => {
            let lookback = resolve_lookback(period.as_deref(), config)?;
            let interval = match interval {
                Some(raw) => BarInterval::parse(&raw)
                    .map_err(|err| format!("invalid --interval: {err}"))?,
                None => config.query.bar_interval()?,
            };
            query::run_ohlcv(client, &normalize_symbol(&symbol), &interval, lookback, mode)
        }
        Command::Profile {
            symbol,
            bins,
            period,
        } => {
            let lookback = resolve_lookback(period.as_deref(), config)?;
            let bins = bins.unwrap_or(config.query.price_bins);
            query::run_profile(client, &normalize_symbol(&symbol), bins, lookback, mode)
        }
        Command::Stats { symbols, period } => {
            let lookback = resolve_lookback(period.as_deref(), config)?;
            stats::run_stats(client, normalize_symbols(&symbols), lookback, mode)
        }
        Command::Watch {
            symbols,
            interval_secs,
            iterations,
        } => watch::run_watch(
            client,
            normalize_symbols(&symbols),
            interval_secs,
            iterations,
            mode,
        ),
    }
}

pub fn load_or_default(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

fn resolve_lookback(period: Option<&str>, config: &Config) -> Result<Lookback, String> {
    match period {
        Some(raw) => Lookback::parse(raw).map_err(|err| format!("invalid --period: {err}")),
        None => config.query.lookback(),
    }
}

/// Symbols are stored upper-case.
fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn normalize_symbols(symbols: &[String]) -> Vec<String> {
    symbols.iter().map(|s| normalize_symbol(s)).collect()
}
