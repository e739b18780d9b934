//! Conversion between compact duration text (`"1d2h"`) and seconds.

use chrono::{DateTime, Utc};

use anvil_core::{DomainError, DomainResult};

/// Parses and renders durations for command arguments and messages.
pub trait TimeConversionService: Send + Sync {
    /// Parse compact duration text (e.g. `"1w2d3h4m5s"`) into seconds.
    fn parse_seconds(&self, input: &str) -> DomainResult<u64>;

    /// Render seconds as `"1 day, 2 hours"`.
    fn format_seconds(&self, seconds: u64) -> String;

    /// Render the time left until `end`; `"0 seconds"` once it has passed.
    fn format_duration_until(&self, end: DateTime<Utc>, now: DateTime<Utc>) -> String;
}

struct Unit {
    suffix: &'static str,
    seconds: u64,
    name: &'static str,
}

/// Largest first. A month is 30 days and a year 365.
const UNITS: [Unit; 7] = [
    Unit { suffix: "y", seconds: 31_536_000, name: "year" },
    Unit { suffix: "mo", seconds: 2_592_000, name: "month" },
    Unit { suffix: "w", seconds: 604_800, name: "week" },
    Unit { suffix: "d", seconds: 86_400, name: "day" },
    Unit { suffix: "h", seconds: 3_600, name: "hour" },
    Unit { suffix: "m", seconds: 60, name: "minute" },
    Unit { suffix: "s", seconds: 1, name: "second" },
];

#[derive(Debug, Default, Copy, Clone)]
pub struct CommonTimeConversionService;

impl CommonTimeConversionService {
    pub fn new() -> Self {
        Self
    }
}

impl TimeConversionService for CommonTimeConversionService {
    fn parse_seconds(&self, input: &str) -> DomainResult<u64> {
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        if compact.is_empty() {
            return Err(DomainError::validation("duration is empty"));
        }

        let invalid = |reason: String| DomainError::validation(format!("{input:?}: {reason}"));
        let overflow = || invalid("duration is too large".to_string());

        let mut rest = compact.as_str();
        let mut total: u64 = 0;
        while !rest.is_empty() {
            let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            if digits_end == 0 {
                return Err(invalid(format!("expected a number before {rest:?}")));
            }
            let amount: u64 = rest[..digits_end].parse().map_err(|_| overflow())?;
            rest = &rest[digits_end..];

            let suffix_end = rest
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(rest.len());
            let suffix = &rest[..suffix_end];
            rest = &rest[suffix_end..];

            let unit_seconds = if suffix.is_empty() {
                1
            } else {
                UNITS
                    .iter()
                    .find(|unit| unit.suffix == suffix)
                    .map(|unit| unit.seconds)
                    .ok_or_else(|| invalid(format!("unknown unit {suffix:?}")))?
            };

            total = amount
                .checked_mul(unit_seconds)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(overflow)?;
        }
        Ok(total)
    }

    fn format_seconds(&self, seconds: u64) -> String {
        if seconds == 0 {
            return "0 seconds".to_string();
        }
        let mut remaining = seconds;
        let mut parts = Vec::new();
        for unit in &UNITS {
            let count = remaining / unit.seconds;
            if count == 0 {
                continue;
            }
            remaining %= unit.seconds;
            let plural = if count == 1 { "" } else { "s" };
            parts.push(format!("{count} {}{plural}", unit.name));
        }
        parts.join(", ")
    }

    fn format_duration_until(&self, end: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let remaining = (end - now).num_seconds();
        self.format_seconds(u64::try_from(remaining).unwrap_or(0))
    }
}
