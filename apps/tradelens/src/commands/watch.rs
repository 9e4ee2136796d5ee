use crate::output::{self, OutputMode};
use serde::Serialize;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;
use tradelens_application::client::TradeDataClient;
use tradelens_domain::value_objects::trade::AggTradeEnvelope;

#[derive(Debug, Clone, PartialEq, Serialize)]
struct WatchTick {
    symbol: String,
    price: f64,
    quantity: f64,
    trade_time_ms: i64,
    change: Option<f64>,
    change_pct: Option<f64>,
}

/// Polls the latest trade of each symbol and reports price moves since the
/// previous poll. Runs until interrupted unless `iterations` is set.
pub fn run_watch(
    client: &TradeDataClient,
    symbols: Vec<String>,
    interval_secs: u64,
    iterations: Option<u64>,
    mode: OutputMode,
) -> Result<(), String> {
    let symbols = if symbols.is_empty() {
        client
            .available_symbols()
            .map_err(|err| err.to_string())?
            .into_iter()
            .collect()
    } else {
        symbols
    };
    if symbols.is_empty() {
        return Err("no symbols found to watch".to_string());
    }

    let interval = Duration::from_secs(interval_secs.max(1));
    tracing::info!(symbols = symbols.len(), interval_secs = interval.as_secs(), "watch started");

    let mut last_prices: HashMap<String, f64> = HashMap::new();
    let mut poll: u64 = 0;
    loop {
        for symbol in &symbols {
            let latest = client.latest_trade(symbol).map_err(|err| err.to_string())?;
            let Some(envelope) = latest else {
                tracing::debug!(symbol = %symbol, "no latest trade");
                continue;
            };
            let tick = next_tick(&mut last_prices, &envelope);
            metrics::gauge!("tradelens.watch.last_price", "symbol" => symbol.clone())
                .set(tick.price);
            match mode {
                OutputMode::Json => println!("{}", output::to_json(&tick)?),
                OutputMode::Table => println!("{}", tick_line(&tick)),
            }
        }

        poll += 1;
        if iterations.is_some_and(|limit| poll >= limit) {
            return Ok(());
        }
        thread::sleep(interval);
    }
}

fn next_tick(last_prices: &mut HashMap<String, f64>, envelope: &AggTradeEnvelope) -> WatchTick {
    let trade = &envelope.trade;
    let previous = last_prices.insert(trade.symbol.clone(), trade.price);
    let change = previous.map(|prev| trade.price - prev);
    let change_pct = previous
        .filter(|prev| *prev != 0.0)
        .map(|prev| (trade.price - prev) / prev * 100.0);
    WatchTick {
        symbol: trade.symbol.clone(),
        price: trade.price,
        quantity: trade.quantity,
        trade_time_ms: trade.trade_time_ms,
        change,
        change_pct,
    }
}

fn tick_line(tick: &WatchTick) -> String {
    let change = match (tick.change, tick.change_pct) {
        (Some(change), Some(pct)) => format!("{change:+.8} ({pct:+.4}%)"),
        (Some(change), None) => format!("{change:+.8}"),
        _ => "-".to_string(),
    };
    format!(
        "{} {:<10} {:>14} qty {:>14} {}",
        output::format_time_ms(tick.trade_time_ms),
        tick.symbol,
        tick.price,
        tick.quantity,
        change
    )
}
