use crate::value_objects::trade::TradeRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeStats {
    pub symbol: String,
    pub first_trade_ms: i64,
    pub last_trade_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub trades: u64,
    /// Volume where the buyer was the taker (`is_buyer_maker == false`).
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub notional: f64,
    pub vwap: Option<f64>,
}

/// Summary over trades ordered by trade time. `None` for an empty slice.
pub fn trade_stats(trades: &[TradeRecord]) -> Option<TradeStats> {
    let first = trades.first()?;
    let last = trades.last()?;

    let mut stats = TradeStats {
        symbol: first.symbol.clone(),
        first_trade_ms: first.trade_time_ms,
        last_trade_ms: last.trade_time_ms,
        open: first.price,
        high: first.price,
        low: first.price,
        close: last.price,
        volume: 0.0,
        trades: 0,
        buy_volume: 0.0,
        sell_volume: 0.0,
        notional: 0.0,
        vwap: None,
    };

    for trade in trades {
        stats.high = stats.high.max(trade.price);
        stats.low = stats.low.min(trade.price);
        stats.volume += trade.quantity;
        stats.notional += trade.notional();
        stats.trades += 1;
        if trade.is_buyer_maker {
            stats.sell_volume += trade.quantity;
        } else {
            stats.buy_volume += trade.quantity;
        }
    }

    if stats.volume > 0.0 {
        stats.vwap = Some(stats.notional / stats.volume);
    }
    Some(stats)
}
