pub mod ohlcv;
pub mod trade_stats;
pub mod volume_profile;
