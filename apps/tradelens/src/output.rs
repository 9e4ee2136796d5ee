use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use tradelens_domain::services::trade_stats::TradeStats;
use tradelens_domain::value_objects::bar::Bar;
use tradelens_domain::value_objects::price_bin::VolumeProfile;
use tradelens_domain::value_objects::trade::{AggTradeEnvelope, TradeRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|err| format!("failed to encode JSON output: {err}"))
}

pub fn format_time_ms(ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ms) {
        Some(at) => at.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => ms.to_string(),
    }
}

fn side(trade: &TradeRecord) -> &'static str {
    if trade.is_buyer_maker {
        "SELL"
    } else {
        "BUY"
    }
}

pub fn symbols_table(symbols: &BTreeSet<String>) -> String {
    if symbols.is_empty() {
        return "no symbols stored\n".to_string();
    }
    let mut out = String::new();
    for symbol in symbols {
        let _ = writeln!(out, "{symbol}");
    }
    out
}

pub fn latest_table(envelope: &AggTradeEnvelope) -> String {
    let trade = &envelope.trade;
    let mut out = String::new();
    let _ = writeln!(out, "symbol:     {}", trade.symbol);
    let _ = writeln!(out, "price:      {}", trade.price);
    let _ = writeln!(out, "quantity:   {}", trade.quantity);
    let _ = writeln!(out, "side:       {}", side(trade));
    let _ = writeln!(out, "trade_id:   {}", trade.trade_id);
    let _ = writeln!(out, "trade_time: {}", format_time_ms(trade.trade_time_ms));
    if let Some(event_time) = envelope.event_time_ms {
        let _ = writeln!(out, "event_time: {}", format_time_ms(event_time));
    }
    out
}

pub fn trades_table(trades: &[TradeRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<26} {:>14} {:>14} {:>5} {:>12}",
        "Time", "Price", "Quantity", "Side", "TradeId"
    );
    for trade in trades {
        let _ = writeln!(
            out,
            "{:<26} {:>14} {:>14} {:>5} {:>12}",
            format_time_ms(trade.trade_time_ms),
            trade.price,
            trade.quantity,
            side(trade),
            trade.trade_id
        );
    }
    out
}

pub fn bars_table(bars: &[Bar]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<26} {:>12} {:>12} {:>12} {:>12} {:>14} {:>8}",
        "Time", "Open", "High", "Low", "Close", "Volume", "Trades"
    );
    for bar in bars {
        let _ = writeln!(
            out,
            "{:<26} {:>12} {:>12} {:>12} {:>12} {:>14.6} {:>8}",
            format_time_ms(bar.timestamp_ms),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume,
            bar.trades
        );
    }
    out
}

pub fn profile_table(profile: &VolumeProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<34} {:>14} {:>8}", "Price", "Volume", "Trades");
    let poc = profile.point_of_control().cloned();
    for bin in &profile.bins {
        let marker = if poc.as_ref() == Some(bin) { " <- poc" } else { "" };
        let _ = writeln!(
            out,
            "{:<34} {:>14.6} {:>8}{}",
            bin.to_string(),
            bin.volume,
            bin.trades,
            marker
        );
    }
    out
}

pub fn stats_table(rows: &[TradeStats]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>12} {:>12} {:>12} {:>12} {:>15} {:>8} {:>12}",
        "Symbol", "Open", "High", "Low", "Close", "Volume", "Trades", "VWAP"
    );
    let _ = writeln!(out, "{}", "-".repeat(100));
    for stats in rows {
        let vwap = stats
            .vwap
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<10} {:>12} {:>12} {:>12} {:>12} {:>15.4} {:>8} {:>12}",
            stats.symbol,
            stats.open,
            stats.high,
            stats.low,
            stats.close,
            stats.volume,
            stats.trades,
            vwap
        );
    }
    out
}
