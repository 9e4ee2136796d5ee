use crate::value_objects::bar::Bar;
use crate::value_objects::interval::BarInterval;
use crate::value_objects::trade::TradeRecord;

/// Groups trades into epoch-aligned buckets of `interval`.
///
/// Trades must be ordered by trade time. Buckets without trades are not
/// emitted, so consecutive bars may be more than one interval apart.
pub fn resample_trades(trades: &[TradeRecord], interval: &BarInterval) -> Vec<Bar> {
    let mut output = Vec::new();
    let mut current_bucket_start: Option<i64> = None;
    let mut bucket: Option<Bar> = None;

    for trade in trades {
        let bucket_start = interval.bucket_start(trade.trade_time_ms);

        match current_bucket_start {
            Some(active_start) if active_start == bucket_start => {
                if let Some(ref mut agg) = bucket {
                    agg.high = agg.high.max(trade.price);
                    agg.low = agg.low.min(trade.price);
                    agg.close = trade.price;
                    agg.volume += trade.quantity;
                    agg.trades += 1;
                }
            }
            _ => {
                if let Some(agg) = bucket.take() {
                    output.push(agg);
                }
                current_bucket_start = Some(bucket_start);
                bucket = Some(open_bar(trade, bucket_start));
            }
        }
    }

    if let Some(agg) = bucket {
        output.push(agg);
    }

    output
}

fn open_bar(trade: &TradeRecord, bucket_start: i64) -> Bar {
    Bar {
        symbol: trade.symbol.clone(),
        timestamp_ms: bucket_start,
        open: trade.price,
        high: trade.price,
        low: trade.price,
        close: trade.price,
        volume: trade.quantity,
        trades: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::resample_trades;
    use crate::value_objects::interval::BarInterval;
    use crate::value_objects::trade::TradeRecord;

    fn trade(ts: i64, price: f64, quantity: f64) -> TradeRecord {
        TradeRecord {
            symbol: "BTCUSDT".to_string(),
            price,
            quantity,
            trade_time_ms: ts,
            is_buyer_maker: false,
            trade_id: ts,
        }
    }

    #[test]
    fn single_bucket_tracks_first_max_min_last() {
        let trades = vec![
            trade(1_000, 100.0, 0.5),
            trade(2_000, 101.0, 0.25),
            trade(3_000, 99.0, 1.0),
        ];
        let bars = resample_trades(&trades, &BarInterval::default());
        assert_eq!(bars.len(), 1);
        let bar = &bars[0];
        assert_eq!(bar.timestamp_ms, 0);
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 101.0);
        assert_eq!(bar.low, 99.0);
        assert_eq!(bar.close, 99.0);
        assert!((bar.volume - 1.75).abs() < 1e-12);
        assert_eq!(bar.trades, 3);
    }

    #[test]
    fn empty_buckets_are_skipped() {
        let trades = vec![
            trade(0, 10.0, 1.0),
            trade(59_999, 11.0, 1.0),
            trade(180_000, 12.0, 2.0),
        ];
        let bars = resample_trades(&trades, &BarInterval::default());
        let starts: Vec<i64> = bars.iter().map(|b| b.timestamp_ms).collect();
        assert_eq!(starts, vec![0, 180_000]);
        assert_eq!(bars[0].close, 11.0);
        assert_eq!(bars[1].open, 12.0);
    }

    #[test]
    fn no_trades_no_bars() {
        assert!(resample_trades(&[], &BarInterval::default()).is_empty());
    }
}
