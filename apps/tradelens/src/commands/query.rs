use crate::output::{self, OutputMode};
use tradelens_application::client::TradeDataClient;
use tradelens_domain::value_objects::interval::BarInterval;
use tradelens_domain::value_objects::lookback::Lookback;
use tradelens_domain::value_objects::trade::TradeRecord;

pub fn run_symbols(client: &TradeDataClient, mode: OutputMode) -> Result<(), String> {
    let symbols = client.available_symbols().map_err(|err| err.to_string())?;
    match mode {
        OutputMode::Json => println!("{}", output::to_json(&symbols)?),
        OutputMode::Table => print!("{}", output::symbols_table(&symbols)),
    }
    Ok(())
}

pub fn run_latest(client: &TradeDataClient, symbol: &str, mode: OutputMode) -> Result<(), String> {
    let latest = client.latest_trade(symbol).map_err(|err| err.to_string())?;
    match (mode, latest) {
        (OutputMode::Json, latest) => println!("{}", output::to_json(&latest)?),
        (OutputMode::Table, Some(envelope)) => print!("{}", output::latest_table(&envelope)),
        (OutputMode::Table, None) => println!("no latest trade stored for {symbol}"),
    }
    Ok(())
}

pub fn run_history(
    client: &TradeDataClient,
    symbol: &str,
    lookback: Lookback,
    limit: Option<usize>,
    mode: OutputMode,
) -> Result<(), String> {
    let history = client
        .trade_history(symbol, lookback)
        .map_err(|err| err.to_string())?;
    let trades = tail(history.trades(), limit);
    match mode {
        OutputMode::Json => println!("{}", output::to_json(trades)?),
        OutputMode::Table => {
            if trades.is_empty() {
                println!("no trades for {symbol} in the last {lookback}");
            } else {
                print!("{}", output::trades_table(trades));
                println!(
                    "{} of {} trades, volume {:.6}",
                    trades.len(),
                    history.len(),
                    history.total_volume()
                );
            }
        }
    }
    Ok(())
}

pub fn run_ohlcv(
    client: &TradeDataClient,
    symbol: &str,
    interval: &BarInterval,
    lookback: Lookback,
    mode: OutputMode,
) -> Result<(), String> {
    let bars = client
        .price_summary_with_lookback(symbol, interval, lookback)
        .map_err(|err| err.to_string())?;
    match mode {
        OutputMode::Json => println!("{}", output::to_json(&bars)?),
        OutputMode::Table if bars.is_empty() => {
            println!("no trades for {symbol} in the last {lookback}")
        }
        OutputMode::Table => print!("{}", output::bars_table(&bars)),
    }
    Ok(())
}

pub fn run_profile(
    client: &TradeDataClient,
    symbol: &str,
    bins: usize,
    lookback: Lookback,
    mode: OutputMode,
) -> Result<(), String> {
    let profile = client
        .volume_profile_with_lookback(symbol, bins, lookback)
        .map_err(|err| err.to_string())?;
    match mode {
        OutputMode::Json => println!("{}", output::to_json(&profile)?),
        OutputMode::Table if profile.is_empty() => {
            println!("no trades for {symbol} in the last {lookback}")
        }
        OutputMode::Table => print!("{}", output::profile_table(&profile)),
    }
    Ok(())
}

/// Most recent `limit` trades, still in ascending time order.
fn tail(trades: &[TradeRecord], limit: Option<usize>) -> &[TradeRecord] {
    match limit {
        Some(limit) if limit < trades.len() => &trades[trades.len() - limit..],
        _ => trades,
    }
}

#[cfg(test)]
mod tests {
    use super::tail;
    use tradelens_domain::value_objects::trade::TradeRecord;

    fn trade(id: i64) -> TradeRecord {
        TradeRecord {
            symbol: "BTCUSDT".to_string(),
            price: 100.0,
            quantity: 1.0,
            trade_time_ms: id,
            is_buyer_maker: false,
            trade_id: id,
        }
    }

    #[test]
    fn tail_keeps_most_recent_trades() {
        let trades: Vec<TradeRecord> = (1..=5).map(trade).collect();
        let ids: Vec<i64> = tail(&trades, Some(2)).iter().map(|t| t.trade_id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(tail(&trades, Some(10)).len(), 5);
        assert_eq!(tail(&trades, None).len(), 5);
        assert!(tail(&trades, Some(0)).is_empty());
    }
}
