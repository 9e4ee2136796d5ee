use crate::value_objects::lookback::TimeWindow;
use crate::value_objects::trade::TradeRecord;
use serde::Serialize;

/// Trades of one symbol inside a query window, ordered by trade time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeHistory {
    pub symbol: String,
    pub window: TimeWindow,
    trades: Vec<TradeRecord>,
}

impl TradeHistory {
    /// Stable sort keeps store order for trades sharing a millisecond.
    pub fn new(symbol: &str, window: TimeWindow, mut trades: Vec<TradeRecord>) -> Self {
        trades.sort_by_key(|trade| trade.trade_time_ms);
        Self {
            symbol: symbol.to_string(),
            window,
            trades,
        }
    }

    pub fn empty(symbol: &str, window: TimeWindow) -> Self {
        Self {
            symbol: symbol.to_string(),
            window,
            trades: Vec::new(),
        }
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn total_volume(&self) -> f64 {
        self.trades.iter().map(|trade| trade.quantity).sum()
    }
}
