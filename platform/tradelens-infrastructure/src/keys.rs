pub const DEFAULT_KEY_PREFIX: &str = "binance:";

/// Key layout written by the streamer:
///
/// | key | type |
/// |---|---|
/// | `<prefix>symbols` | set |
/// | `<prefix>aggTrade:<symbol>:latest` | string (JSON) |
/// | `<prefix>aggTrade:<symbol>:history` | sorted set scored by epoch ns |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    prefix: String,
}

impl KeySpace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn symbols(&self) -> String {
        format!("{}symbols", self.prefix)
    }

    pub fn latest(&self, symbol: &str) -> String {
        format!("{}aggTrade:{}:latest", self.prefix, symbol)
    }

    pub fn history(&self, symbol: &str) -> String {
        format!("{}aggTrade:{}:history", self.prefix, symbol)
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::KeySpace;

    #[test]
    fn default_layout_matches_streamer_keys() {
        let keys = KeySpace::default();
        assert_eq!(keys.symbols(), "binance:symbols");
        assert_eq!(keys.latest("BTCUSDT"), "binance:aggTrade:BTCUSDT:latest");
        assert_eq!(keys.history("BTCUSDT"), "binance:aggTrade:BTCUSDT:history");
    }

    #[test]
    fn custom_prefix_is_used_verbatim() {
        let keys = KeySpace::new("staging:");
        assert_eq!(keys.symbols(), "staging:symbols");
    }
}
