use crate::value_objects::interval::parse_duration_like_seconds;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;

// 10 years; keeps window arithmetic far away from chrono's limits.
const MAX_LOOKBACK_SECONDS: i64 = 10 * 365 * 86_400;

/// Trailing window length for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookback {
    seconds: i64,
}

impl Lookback {
    pub fn hours(hours: u32) -> Result<Self, String> {
        Self::from_seconds(i64::from(hours) * 3600)
    }

    /// Accepts the `--period` style used by operators: `90m`, `1h`, `24h`, `7d`.
    pub fn parse(value: &str) -> Result<Self, String> {
        let seconds = parse_duration_like_seconds(value)
            .map_err(|err| format!("invalid lookback '{value}': {err}"))?;
        Self::from_seconds(seconds)
    }

    pub fn from_seconds(seconds: i64) -> Result<Self, String> {
        if seconds <= 0 {
            return Err(format!("lookback must be > 0 seconds (got {seconds})"));
        }
        if seconds > MAX_LOOKBACK_SECONDS {
            return Err(format!(
                "lookback too large: {seconds}s (max {MAX_LOOKBACK_SECONDS}s)"
            ));
        }
        Ok(Self { seconds })
    }

    pub fn as_seconds(&self) -> i64 {
        self.seconds
    }

    pub fn window_ending_at(&self, end: DateTime<Utc>) -> TimeWindow {
        TimeWindow {
            start: end - Duration::seconds(self.seconds),
            end,
        }
    }
}

impl std::fmt::Display for Lookback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.seconds;
        if s % 86_400 == 0 {
            write!(f, "{}d", s / 86_400)
        } else if s % 3600 == 0 {
            write!(f, "{}h", s / 3600)
        } else if s % 60 == 0 {
            write!(f, "{}m", s / 60)
        } else {
            write!(f, "{s}s")
        }
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self {
            seconds: i64::from(DEFAULT_LOOKBACK_HOURS) * 3600,
        }
    }
}

/// Closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::{Lookback, DEFAULT_LOOKBACK_HOURS};
    use chrono::{TimeZone, Utc};

    #[test]
    fn default_is_a_day() {
        assert_eq!(
            Lookback::default(),
            Lookback::hours(DEFAULT_LOOKBACK_HOURS).unwrap()
        );
        assert_eq!(Lookback::default().as_seconds(), 86_400);
    }

    #[test]
    fn parse_supports_period_syntax() {
        assert_eq!(Lookback::parse("1h").unwrap().as_seconds(), 3600);
        assert_eq!(Lookback::parse("7d").unwrap().as_seconds(), 7 * 86_400);
        assert_eq!(Lookback::parse("90m").unwrap().as_seconds(), 5400);
        assert!(Lookback::parse("0h").is_err());
        assert!(Lookback::parse("soon").is_err());
        assert!(Lookback::parse("100000w").is_err());
        assert!(Lookback::hours(0).is_err());
    }

    #[test]
    fn display_uses_largest_whole_unit() {
        assert_eq!(Lookback::default().to_string(), "1d");
        assert_eq!(Lookback::hours(6).unwrap().to_string(), "6h");
        assert_eq!(Lookback::parse("90m").unwrap().to_string(), "90m");
        assert_eq!(Lookback::from_seconds(45).unwrap().to_string(), "45s");
    }

    #[test]
    fn window_is_closed_on_both_ends() {
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let window = Lookback::hours(2).unwrap().window_ending_at(end);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        assert!(window.contains(window.start));
        assert!(window.contains(end));
        assert!(!window.contains(end + chrono::Duration::milliseconds(1)));
    }
}
