pub mod redis_trades;
