use crate::output::{self, OutputMode};
use tradelens_application::client::TradeDataClient;
use tradelens_domain::services::trade_stats::TradeStats;
use tradelens_domain::value_objects::lookback::Lookback;

/// Summary rows for `symbols`, or for every stored symbol when none are given.
/// Symbols without trades in the window are skipped.
pub fn run_stats(
    client: &TradeDataClient,
    symbols: Vec<String>,
    lookback: Lookback,
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

    let rows = collect_stats(client, &symbols, lookback)?;
    match mode {
        OutputMode::Json => println!("{}", output::to_json(&rows)?),
        OutputMode::Table if rows.is_empty() => {
            println!("No data found for any symbols in the last {lookback}")
        }
        OutputMode::Table => print!("{}", output::stats_table(&rows)),
    }
    Ok(())
}

fn collect_stats(
    client: &TradeDataClient,
    symbols: &[String],
    lookback: Lookback,
) -> Result<Vec<TradeStats>, String> {
    let mut rows = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        match client
            .trade_stats(symbol, lookback)
            .map_err(|err| err.to_string())?
        {
            Some(stats) => rows.push(stats),
            None => tracing::debug!(symbol = %symbol, "no trades in window"),
        }
    }
    Ok(rows)
}
