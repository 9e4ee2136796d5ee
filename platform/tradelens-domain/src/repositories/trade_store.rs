use crate::value_objects::lookback::TimeWindow;
use crate::value_objects::trade::{AggTradeEnvelope, TradeRecord};
use std::collections::BTreeSet;

/// Inclusive score bounds for the per-symbol history collection.
/// Scores are epoch nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
}

impl ScoreRange {
    pub fn from_window(window: &TimeWindow) -> Result<Self, String> {
        let min = window
            .start
            .timestamp_nanos_opt()
            .ok_or_else(|| format!("window start out of range: {}", window.start))?;
        let max = window
            .end
            .timestamp_nanos_opt()
            .ok_or_else(|| format!("window end out of range: {}", window.end))?;
        Ok(Self { min, max })
    }

    pub fn contains(&self, score: i64) -> bool {
        self.min <= score && score <= self.max
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    InvalidJson(String),
    MissingField(&'static str),
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    InvalidNumber {
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeError::InvalidJson(msg) => write!(f, "invalid json: {msg}"),
            EnvelopeError::MissingField(field) => write!(f, "missing field `{field}`"),
            EnvelopeError::WrongType { field, expected } => {
                write!(f, "field `{field}` has wrong type (expected {expected})")
            }
            EnvelopeError::InvalidNumber { field, value } => {
                write!(f, "field `{field}` is not a finite number: {value:?}")
            }
        }
    }
}

impl std::error::Error for EnvelopeError {}

#[derive(Debug, Clone, PartialEq)]
pub enum TradeStoreError {
    Connection(String),
    Command(String),
    Payload { key: String, error: EnvelopeError },
}

impl std::fmt::Display for TradeStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeStoreError::Connection(msg) => write!(f, "store connection: {msg}"),
            TradeStoreError::Command(msg) => write!(f, "store command: {msg}"),
            TradeStoreError::Payload { key, error } => {
                write!(f, "malformed payload at {key}: {error}")
            }
        }
    }
}

impl std::error::Error for TradeStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TradeStoreError::Payload { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Read-only port over the trade store.
pub trait TradeRepository {
    /// Members of the symbol set; empty when the set does not exist.
    fn symbols(&self) -> Result<BTreeSet<String>, TradeStoreError>;

    /// `Ok(None)` when no latest value is stored for `symbol`.
    fn latest_trade(&self, symbol: &str) -> Result<Option<AggTradeEnvelope>, TradeStoreError>;

    /// History members whose score lies in `range` (both ends inclusive), in score order.
    fn trades_by_score(
        &self,
        symbol: &str,
        range: ScoreRange,
    ) -> Result<Vec<TradeRecord>, TradeStoreError>;
}

#[cfg(test)]
mod tests {
    use super::{EnvelopeError, ScoreRange, TradeStoreError};
    use crate::value_objects::lookback::Lookback;
    use chrono::{TimeZone, Utc};
    use std::error::Error;

    #[test]
    fn score_range_uses_nanoseconds() {
        let end = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let window = Lookback::hours(1).unwrap().window_ending_at(end);
        let range = ScoreRange::from_window(&window).unwrap();
        assert_eq!(range.max, 1_700_000_000_000_000_000);
        assert_eq!(range.min, 1_699_996_400_000_000_000);
        assert!(range.contains(range.min));
        assert!(range.contains(range.max));
        assert!(!range.contains(range.max + 1));
    }

    #[test]
    fn payload_error_exposes_envelope_error_as_source() {
        let err = TradeStoreError::Payload {
            key: "binance:aggTrade:BTCUSDT:latest".to_string(),
            error: EnvelopeError::MissingField("p"),
        };
        assert!(err.to_string().contains("missing field `p`"));
        assert!(err.source().is_some());
    }
}
