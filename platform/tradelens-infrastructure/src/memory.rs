use crate::codec::envelope::{decode_envelope, decode_trade, encode_envelope, encode_trade};
use crate::keys::KeySpace;
use std::collections::{BTreeMap, BTreeSet};
use tradelens_domain::repositories::trade_store::{ScoreRange, TradeRepository, TradeStoreError};
use tradelens_domain::value_objects::trade::{AggTradeEnvelope, TradeRecord};

/// Holds raw payloads under the same key layout as Redis, so decoding and
/// range semantics match the Redis adapter.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTradeStore {
    keys: KeySpace,
    sets: BTreeMap<String, BTreeSet<String>>,
    strings: BTreeMap<String, String>,
    sorted: BTreeMap<String, Vec<(i64, String)>>,
}

impl InMemoryTradeStore {
    pub fn new(keys: KeySpace) -> Self {
        Self {
            keys,
            ..Self::default()
        }
    }

    pub fn add_symbol(&mut self, symbol: &str) -> &mut Self {
        self.sets
            .entry(self.keys.symbols())
            .or_default()
            .insert(symbol.to_string());
        self
    }

    pub fn set_latest_raw(&mut self, symbol: &str, payload: impl Into<String>) -> &mut Self {
        self.strings.insert(self.keys.latest(symbol), payload.into());
        self
    }

    pub fn set_latest(&mut self, envelope: &AggTradeEnvelope) -> &mut Self {
        let symbol = envelope.trade.symbol.clone();
        self.set_latest_raw(&symbol, encode_envelope(envelope))
    }

    /// ZADD semantics: an identical member only has its score updated.
    pub fn add_history_raw(
        &mut self,
        symbol: &str,
        score_ns: i64,
        payload: impl Into<String>,
    ) -> &mut Self {
        let payload = payload.into();
        let entries = self.sorted.entry(self.keys.history(symbol)).or_default();
        entries.retain(|(_, member)| *member != payload);
        entries.push((score_ns, payload));
        entries.sort();
        self
    }

    pub fn add_history(&mut self, score_ns: i64, trade: &TradeRecord) -> &mut Self {
        let symbol = trade.symbol.clone();
        self.add_history_raw(&symbol, score_ns, encode_trade(trade))
    }
}

impl TradeRepository for InMemoryTradeStore {
    fn symbols(&self) -> Result<BTreeSet<String>, TradeStoreError> {
        Ok(self
            .sets
            .get(&self.keys.symbols())
            .cloned()
            .unwrap_or_default())
    }

    fn latest_trade(&self, symbol: &str) -> Result<Option<AggTradeEnvelope>, TradeStoreError> {
        let key = self.keys.latest(symbol);
        match self.strings.get(&key) {
            None => Ok(None),
            Some(raw) => decode_envelope(raw)
                .map(Some)
                .map_err(|error| TradeStoreError::Payload { key, error }),
        }
    }

    fn trades_by_score(
        &self,
        symbol: &str,
        range: ScoreRange,
    ) -> Result<Vec<TradeRecord>, TradeStoreError> {
        let key = self.keys.history(symbol);
        let Some(entries) = self.sorted.get(&key) else {
            return Ok(Vec::new());
        };
        entries
            .iter()
            .filter(|(score, _)| range.contains(*score))
            .map(|(_, raw)| {
                decode_trade(raw).map_err(|error| TradeStoreError::Payload {
                    key: key.clone(),
                    error,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryTradeStore;
    use crate::keys::KeySpace;
    use tradelens_domain::repositories::trade_store::{
        EnvelopeError, ScoreRange, TradeRepository, TradeStoreError,
    };
    use tradelens_domain::value_objects::trade::TradeRecord;

    fn trade(id: i64, price: f64) -> TradeRecord {
        TradeRecord {
            symbol: "BTCUSDT".to_string(),
            price,
            quantity: 1.0,
            trade_time_ms: id,
            is_buyer_maker: false,
            trade_id: id,
        }
    }

    #[test]
    fn range_is_inclusive_and_score_ordered() {
        let mut store = InMemoryTradeStore::new(KeySpace::default());
        store
            .add_history(30, &trade(3, 3.0))
            .add_history(10, &trade(1, 1.0))
            .add_history(20, &trade(2, 2.0))
            .add_history(40, &trade(4, 4.0));

        let trades = store
            .trades_by_score("BTCUSDT", ScoreRange { min: 10, max: 30 })
            .unwrap();
        let ids: Vec<i64> = trades.iter().map(|t| t.trade_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn readding_a_member_moves_its_score() {
        let mut store = InMemoryTradeStore::new(KeySpace::default());
        store.add_history(10, &trade(1, 1.0)).add_history(50, &trade(1, 1.0));
        let early = store
            .trades_by_score("BTCUSDT", ScoreRange { min: 0, max: 20 })
            .unwrap();
        assert!(early.is_empty());
        let late = store
            .trades_by_score("BTCUSDT", ScoreRange { min: 0, max: 60 })
            .unwrap();
        assert_eq!(late.len(), 1);
    }

    #[test]
    fn malformed_member_is_reported_with_its_key() {
        let mut store = InMemoryTradeStore::new(KeySpace::new("t:"));
        store.add_history_raw("BTCUSDT", 5, r#"{"data":{"s":"BTCUSDT"}}"#);
        let err = store
            .trades_by_score("BTCUSDT", ScoreRange { min: 0, max: 10 })
            .expect_err("missing fields");
        assert_eq!(
            err,
            TradeStoreError::Payload {
                key: "t:aggTrade:BTCUSDT:history".to_string(),
                error: EnvelopeError::MissingField("p"),
            }
        );
    }

    #[test]
    fn missing_keys_read_as_empty() {
        let store = InMemoryTradeStore::new(KeySpace::default());
        assert!(store.symbols().unwrap().is_empty());
        assert_eq!(store.latest_trade("BTCUSDT").unwrap(), None);
        assert!(store
            .trades_by_score("BTCUSDT", ScoreRange { min: i64::MIN, max: i64::MAX })
            .unwrap()
            .is_empty());
    }
}
