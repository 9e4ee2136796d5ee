use crate::value_objects::price_bin::{PriceBin, MAX_PRICE_BINS};
use crate::value_objects::trade::TradeRecord;

/// Sums traded quantity over equal-count (quantile) price bins.
///
/// Edges are the `0, 1/bins, .., 1` quantiles of the observed prices using
/// linear interpolation between order statistics. Repeated prices can make
/// neighbouring edges equal; duplicates are collapsed, so the result may hold
/// fewer than `bins` bins. Every bin is `(lower, upper]` except the first one,
/// which also includes the minimum price. When all prices are equal a single
/// `[p, p]` bin is returned.
pub fn volume_profile(trades: &[TradeRecord], bins: usize) -> Result<Vec<PriceBin>, String> {
    if bins == 0 {
        return Err("price bins must be > 0".to_string());
    }
    if bins > MAX_PRICE_BINS {
        return Err(format!("price bins must be <= {MAX_PRICE_BINS} (got {bins})"));
    }
    if trades.is_empty() {
        return Ok(Vec::new());
    }

    let mut prices: Vec<f64> = trades.iter().map(|trade| trade.price).collect();
    if prices.iter().any(|price| !price.is_finite()) {
        return Err("volume profile requires finite prices".to_string());
    }
    prices.sort_by(f64::total_cmp);

    let edges = quantile_edges(&prices, bins);
    let mut profile: Vec<PriceBin> = if edges.len() < 2 {
        vec![PriceBin {
            lower: prices[0],
            upper: prices[0],
            lower_inclusive: true,
            volume: 0.0,
            trades: 0,
        }]
    } else {
        edges
            .windows(2)
            .enumerate()
            .map(|(idx, pair)| PriceBin {
                lower: pair[0],
                upper: pair[1],
                lower_inclusive: idx == 0,
                volume: 0.0,
                trades: 0,
            })
            .collect()
    };

    for trade in trades {
        let idx = edges
            .partition_point(|edge| *edge < trade.price)
            .saturating_sub(1)
            .min(profile.len() - 1);
        let bin = &mut profile[idx];
        bin.volume += trade.quantity;
        bin.trades += 1;
    }

    Ok(profile)
}

fn quantile_edges(sorted: &[f64], bins: usize) -> Vec<f64> {
    let n = sorted.len();
    let span = (n - 1) as f64;
    let mut edges: Vec<f64> = Vec::with_capacity(bins.min(n) + 1);
    for i in 0..=bins {
        let pos = i as f64 * span / bins as f64;
        let lo = (pos.floor() as usize).min(n - 1);
        let hi = (lo + 1).min(n - 1);
        let frac = pos - lo as f64;
        let edge = if frac > 0.0 {
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        } else {
            sorted[lo]
        };
        match edges.last() {
            Some(prev) if edge <= *prev => {}
            _ => edges.push(edge),
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::{quantile_edges, volume_profile};
    use crate::value_objects::price_bin::MAX_PRICE_BINS;
    use crate::value_objects::trade::TradeRecord;

    fn trade(price: f64, quantity: f64) -> TradeRecord {
        TradeRecord {
            symbol: "BTCUSDT".to_string(),
            price,
            quantity,
            trade_time_ms: 0,
            is_buyer_maker: false,
            trade_id: 0,
        }
    }

    #[test]
    fn quantile_edges_interpolate_linearly() {
        let edges = quantile_edges(&[1.0, 2.0, 3.0, 4.0, 5.0], 4);
        assert_eq!(edges, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let edges = quantile_edges(&[0.0, 10.0], 4);
        assert_eq!(edges, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn equal_count_bins_split_by_rank_not_width() {
        let trades = vec![
            trade(1.0, 1.0),
            trade(2.0, 1.0),
            trade(3.0, 1.0),
            trade(100.0, 5.0),
        ];
        let profile = volume_profile(&trades, 2).unwrap();
        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].lower, 1.0);
        assert_eq!(profile[0].upper, 2.5);
        assert!(profile[0].lower_inclusive);
        assert!(!profile[1].lower_inclusive);
        assert_eq!(profile[0].trades, 2);
        assert_eq!(profile[1].trades, 2);
        assert!((profile[1].volume - 6.0).abs() < 1e-12);
    }

    #[test]
    fn tied_edges_collapse_into_fewer_bins() {
        let trades = vec![
            trade(5.0, 1.0),
            trade(5.0, 1.0),
            trade(5.0, 1.0),
            trade(6.0, 2.0),
        ];
        let profile = volume_profile(&trades, 4).unwrap();
        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].lower, 5.0);
        assert!((profile[0].volume - 3.0).abs() < 1e-12);
        assert!((profile[1].volume - 2.0).abs() < 1e-12);
        let total: f64 = profile.iter().map(|b| b.volume).sum();
        assert!((total - 5.0).abs() < 1e-12);
    }

    #[test]
    fn single_price_gives_one_degenerate_bin() {
        let trades = vec![trade(42.0, 1.5), trade(42.0, 0.5)];
        let profile = volume_profile(&trades, 100).unwrap();
        assert_eq!(profile.len(), 1);
        assert_eq!(profile[0].lower, 42.0);
        assert_eq!(profile[0].upper, 42.0);
        assert!(profile[0].lower_inclusive);
        assert!((profile[0].volume - 2.0).abs() < 1e-12);
    }

    #[test]
    fn price_on_interior_edge_falls_in_lower_bin() {
        let trades = vec![trade(1.0, 1.0), trade(2.0, 10.0), trade(3.0, 100.0)];
        let profile = volume_profile(&trades, 2).unwrap();
        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].to_string(), "[1, 2]");
        assert_eq!(profile[1].to_string(), "(2, 3]");
        assert!((profile[0].volume - 11.0).abs() < 1e-12);
        assert_eq!(profile[0].trades, 2);
        assert!((profile[1].volume - 100.0).abs() < 1e-12);
        assert_eq!(profile[1].trades, 1);
    }

    #[test]
    fn rejects_oversized_bin_counts() {
        let trades = vec![trade(1.0, 1.0), trade(2.0, 1.0)];
        assert!(volume_profile(&trades, usize::MAX)
            .unwrap_err()
            .contains("<="));
        assert!(volume_profile(&trades, MAX_PRICE_BINS + 1).is_err());
        assert!(volume_profile(&trades, MAX_PRICE_BINS).unwrap().len() <= MAX_PRICE_BINS);
    }

    #[test]
    fn rejects_zero_bins_and_handles_empty_input() {
        assert!(volume_profile(&[trade(1.0, 1.0)], 0).is_err());
        assert!(volume_profile(&[], 10).unwrap().is_empty());
    }
}
