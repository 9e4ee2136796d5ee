use chrono::{DateTime, Utc};
use serde::Serialize;

/// One aggregated trade as recorded by the exchange feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRecord {
    pub symbol: String,
    pub price: f64,
    pub quantity: f64,
    /// Exchange trade time, epoch milliseconds.
    pub trade_time_ms: i64,
    pub is_buyer_maker: bool,
    pub trade_id: i64,
}

impl TradeRecord {
    pub fn trade_time(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.trade_time_ms)
    }

    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }
}

/// Full stored envelope. Only the fields of [`TradeRecord`] are required;
/// the rest are kept when the feed provided them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggTradeEnvelope {
    pub stream: Option<String>,
    pub event_type: Option<String>,
    pub event_time_ms: Option<i64>,
    pub first_trade_id: Option<i64>,
    pub last_trade_id: Option<i64>,
    pub trade: TradeRecord,
}
