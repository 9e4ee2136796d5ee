use serde::Serialize;

pub const DEFAULT_INTERVAL: &str = "1min";

/// Fixed bucket width used when resampling trades into bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarInterval {
    pub label: String,
    pub step_ms: i64,
}

impl BarInterval {
    pub fn parse(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        let seconds = parse_duration_like_seconds(trimmed)?;
        if seconds <= 0 {
            return Err(format!("interval must be > 0: {value}"));
        }
        let step_ms = seconds
            .checked_mul(1000)
            .ok_or_else(|| format!("interval too large: {value}"))?;
        Ok(Self {
            label: trimmed.to_lowercase(),
            step_ms,
        })
    }

    pub fn from_seconds(seconds: i64) -> Result<Self, String> {
        if seconds <= 0 {
            return Err(format!("interval must be > 0: {seconds}"));
        }
        let step_ms = seconds
            .checked_mul(1000)
            .ok_or_else(|| format!("interval too large: {seconds}"))?;
        Ok(Self {
            label: format!("{seconds}s"),
            step_ms,
        })
    }

    /// Start of the bucket containing `timestamp_ms`.
    pub fn bucket_start(&self, timestamp_ms: i64) -> i64 {
        timestamp_ms.saturating_sub(timestamp_ms.rem_euclid(self.step_ms))
    }
}

impl Default for BarInterval {
    fn default() -> Self {
        Self {
            label: DEFAULT_INTERVAL.to_string(),
            step_ms: 60_000,
        }
    }
}

impl std::fmt::Display for BarInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

pub fn parse_duration_like_seconds(value: &str) -> Result<i64, String> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(seconds) = trimmed.parse::<i64>() {
        return Ok(seconds);
    }

    let (number_part, unit) = if let Some(stripped) = trimmed.strip_suffix("sec") {
        (stripped, "sec")
    } else if let Some(stripped) = trimmed.strip_suffix("min") {
        (stripped, "min")
    } else if let Some(stripped) = trimmed.strip_suffix("hour") {
        (stripped, "hour")
    } else if let Some(stripped) = trimmed.strip_suffix("day") {
        (stripped, "day")
    } else if let Some(stripped) = trimmed.strip_suffix("week") {
        (stripped, "week")
    } else {
        let (number_part, unit) = trimmed.split_at(trimmed.len().saturating_sub(1));
        (number_part, unit)
    };

    let multiplier: i64 = match unit {
        "s" | "sec" => 1,
        "m" | "min" => 60,
        "h" | "hour" => 3600,
        "d" | "day" => 86400,
        "w" | "week" => 604800,
        _ => return Err(format!("unsupported duration unit: {unit}")),
    };

    let number: i64 = number_part
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration: {value}"))?;
    number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("duration too large: {value}"))
}

#[cfg(test)]
mod tests {
    use super::{parse_duration_like_seconds, BarInterval};

    #[test]
    fn parses_pandas_style_and_short_labels() {
        assert_eq!(BarInterval::parse("1min").unwrap().step_ms, 60_000);
        assert_eq!(BarInterval::parse("5m").unwrap().step_ms, 300_000);
        assert_eq!(BarInterval::parse("30s").unwrap().step_ms, 30_000);
        assert_eq!(BarInterval::parse("1H").unwrap().step_ms, 3_600_000);
        assert_eq!(BarInterval::parse("15").unwrap().step_ms, 15_000);
        assert_eq!(BarInterval::default(), BarInterval::parse("1min").unwrap());
    }

    #[test]
    fn rejects_zero_and_unknown_units() {
        assert!(BarInterval::parse("0m").is_err());
        assert!(BarInterval::parse("-5").is_err());
        assert!(BarInterval::parse("3x").is_err());
        assert!(BarInterval::parse("").is_err());
        assert!(parse_duration_like_seconds("9223372036854775807w").is_err());
    }

    #[test]
    fn bucket_start_aligns_to_epoch_multiples() {
        let interval = BarInterval::from_seconds(60).unwrap();
        assert_eq!(interval.bucket_start(0), 0);
        assert_eq!(interval.bucket_start(59_999), 0);
        assert_eq!(interval.bucket_start(60_000), 60_000);
        assert_eq!(interval.bucket_start(-1), -60_000);
    }
}
