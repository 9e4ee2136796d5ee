pub mod clock;
pub mod trade_store;
