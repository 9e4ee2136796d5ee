pub mod bar;
pub mod interval;
pub mod lookback;
pub mod price_bin;
pub mod trade;
pub mod trade_history;
