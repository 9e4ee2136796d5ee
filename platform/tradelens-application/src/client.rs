use std::collections::BTreeSet;
use tradelens_domain::repositories::clock::{Clock, SystemClock};
use tradelens_domain::repositories::trade_store::{ScoreRange, TradeRepository, TradeStoreError};
use tradelens_domain::services::ohlcv::resample_trades;
use tradelens_domain::services::trade_stats::{trade_stats, TradeStats};
use tradelens_domain::services::volume_profile::volume_profile;
use tradelens_domain::value_objects::bar::Bar;
use tradelens_domain::value_objects::interval::BarInterval;
use tradelens_domain::value_objects::lookback::Lookback;
use tradelens_domain::value_objects::price_bin::{VolumeProfile, MAX_PRICE_BINS};
use tradelens_domain::value_objects::trade::AggTradeEnvelope;
use tradelens_domain::value_objects::trade_history::TradeHistory;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    Store(TradeStoreError),
    InvalidArgument(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Store(err) => write!(f, "{err}"),
            ClientError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Store(err) => Some(err),
            ClientError::InvalidArgument(_) => None,
        }
    }
}

impl From<TradeStoreError> for ClientError {
    fn from(err: TradeStoreError) -> Self {
        ClientError::Store(err)
    }
}

/// Read-only facade over the trade store.
///
/// Every call goes to the store; nothing is cached between calls. Reads that
/// find no data return empty values, never errors.
pub struct TradeDataClient {
    store: Box<dyn TradeRepository>,
    clock: Box<dyn Clock>,
}

impl TradeDataClient {
    pub fn new(store: Box<dyn TradeRepository>) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    pub fn with_clock(store: Box<dyn TradeRepository>, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn available_symbols(&self) -> Result<BTreeSet<String>, ClientError> {
        Ok(self.store.symbols()?)
    }

    pub fn latest_trade(&self, symbol: &str) -> Result<Option<AggTradeEnvelope>, ClientError> {
        Ok(self.store.latest_trade(symbol)?)
    }

    /// Trades in `[now - lookback, now]`, ordered by trade time.
    pub fn trade_history(
        &self,
        symbol: &str,
        lookback: Lookback,
    ) -> Result<TradeHistory, ClientError> {
        let window = lookback.window_ending_at(self.clock.now());
        let range = ScoreRange::from_window(&window).map_err(ClientError::InvalidArgument)?;
        let trades = self.store.trades_by_score(symbol, range)?;
        tracing::debug!(
            symbol = %symbol,
            lookback_seconds = lookback.as_seconds(),
            trades = trades.len(),
            "trade history loaded"
        );
        if trades.is_empty() {
            return Ok(TradeHistory::empty(symbol, window));
        }
        Ok(TradeHistory::new(symbol, window, trades))
    }

    /// OHLCV bars over the default lookback. `interval` only sets the bucket width.
    pub fn price_summary(
        &self,
        symbol: &str,
        interval: &BarInterval,
    ) -> Result<Vec<Bar>, ClientError> {
        self.price_summary_with_lookback(symbol, interval, Lookback::default())
    }

    pub fn price_summary_with_lookback(
        &self,
        symbol: &str,
        interval: &BarInterval,
        lookback: Lookback,
    ) -> Result<Vec<Bar>, ClientError> {
        let history = self.trade_history(symbol, lookback)?;
        if history.is_empty() {
            return Ok(Vec::new());
        }
        let bars = resample_trades(history.trades(), interval);
        tracing::debug!(symbol = %symbol, interval = %interval, bars = bars.len(), "ohlcv built");
        Ok(bars)
    }

    /// Volume by price over the default lookback, `bins` quantile bins.
    pub fn volume_profile(&self, symbol: &str, bins: usize) -> Result<VolumeProfile, ClientError> {
        self.volume_profile_with_lookback(symbol, bins, Lookback::default())
    }

    pub fn volume_profile_with_lookback(
        &self,
        symbol: &str,
        bins: usize,
        lookback: Lookback,
    ) -> Result<VolumeProfile, ClientError> {
        if bins == 0 {
            return Err(ClientError::InvalidArgument(
                "price bins must be > 0".to_string(),
            ));
        }
        if bins > MAX_PRICE_BINS {
            return Err(ClientError::InvalidArgument(format!(
                "price bins must be <= {MAX_PRICE_BINS} (got {bins})"
            )));
        }
        let history = self.trade_history(symbol, lookback)?;
        if history.is_empty() {
            return Ok(VolumeProfile::empty(symbol));
        }
        let bins =
            volume_profile(history.trades(), bins).map_err(ClientError::InvalidArgument)?;
        tracing::debug!(symbol = %symbol, bins = bins.len(), "volume profile built");
        Ok(VolumeProfile {
            symbol: symbol.to_string(),
            bins,
        })
    }

    pub fn trade_stats(
        &self,
        symbol: &str,
        lookback: Lookback,
    ) -> Result<Option<TradeStats>, ClientError> {
        let history = self.trade_history(symbol, lookback)?;
        Ok(trade_stats(history.trades()))
    }
}
