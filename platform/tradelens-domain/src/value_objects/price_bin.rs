use serde::Serialize;

pub const DEFAULT_PRICE_BINS: usize = 100;

/// Upper bound on requested bins; each bin needs one quantile edge.
pub const MAX_PRICE_BINS: usize = 10_000;

/// Price interval `(lower, upper]`, or `[lower, upper]` when `lower_inclusive`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBin {
    pub lower: f64,
    pub upper: f64,
    pub lower_inclusive: bool,
    pub volume: f64,
    pub trades: u64,
}

impl PriceBin {
    pub fn contains(&self, price: f64) -> bool {
        if self.lower_inclusive {
            self.lower <= price && price <= self.upper
        } else {
            self.lower < price && price <= self.upper
        }
    }
}

impl std::fmt::Display for PriceBin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let open = if self.lower_inclusive { '[' } else { '(' };
        write!(f, "{}{}, {}]", open, self.lower, self.upper)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeProfile {
    pub symbol: String,
    pub bins: Vec<PriceBin>,
}

impl VolumeProfile {
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            bins: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total_volume(&self) -> f64 {
        self.bins.iter().map(|bin| bin.volume).sum()
    }

    /// Bin with the largest traded volume (the point of control).
    pub fn point_of_control(&self) -> Option<&PriceBin> {
        self.bins
            .iter()
            .max_by(|a, b| a.volume.total_cmp(&b.volume))
    }
}
