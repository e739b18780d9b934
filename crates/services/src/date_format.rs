//! Date formatting service.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use anvil_core::{DomainError, DomainResult};

/// Renders and parses instants for display to players and operators.
pub trait DateFormatService: Send + Sync {
    fn format(&self, instant: DateTime<Utc>) -> String;

    fn parse(&self, text: &str) -> DomainResult<DateTime<Utc>>;
}

/// [`DateFormatService`] driven by a single `strftime` pattern, in UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonDateFormatService {
    pattern: String,
}

impl CommonDateFormatService {
    pub const DEFAULT_PATTERN: &'static str = "%Y-%m-%d %H:%M:%S";

    pub fn new() -> Self {
        Self {
            pattern: Self::DEFAULT_PATTERN.to_string(),
        }
    }

    /// Use a custom pattern. Rejects patterns chrono cannot interpret.
    pub fn with_pattern(pattern: impl Into<String>) -> DomainResult<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() || StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(DomainError::validation(format!(
                "invalid date format pattern {pattern:?}"
            )));
        }
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Default for CommonDateFormatService {
    fn default() -> Self {
        Self::new()
    }
}

impl DateFormatService for CommonDateFormatService {
    fn format(&self, instant: DateTime<Utc>) -> String {
        instant.format(&self.pattern).to_string()
    }

    /// Offsets in the text (`%z`) are applied; otherwise the text is read as
    /// UTC. Date-only patterns parse to midnight UTC.
    fn parse(&self, text: &str) -> DomainResult<DateTime<Utc>> {
        let text = text.trim();
        DateTime::parse_from_str(text, &self.pattern)
            .map(|instant| instant.with_timezone(&Utc))
            .or_else(|_| NaiveDateTime::parse_from_str(text, &self.pattern).map(|naive| naive.and_utc()))
            .or_else(|_| {
                NaiveDate::parse_from_str(text, &self.pattern)
                    .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            })
            .map_err(|_| {
                DomainError::validation(format!(
                    "{text:?} does not match date format {:?}",
                    self.pattern
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_default_pattern() {
        let svc = CommonDateFormatService::new();
        let instant = Utc.with_ymd_and_hms(2020, 3, 14, 15, 9, 26).unwrap();
        assert_eq!(svc.format(instant), "2020-03-14 15:09:26");
    }

    #[test]
    fn parse_inverts_format() {
        let svc = CommonDateFormatService::new();
        let instant = Utc.with_ymd_and_hms(2021, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(svc.parse(&svc.format(instant)).unwrap(), instant);
        assert_eq!(svc.parse("  2021-12-31 23:59:59 ").unwrap(), instant);
    }

    #[test]
    fn date_only_pattern_parses_to_midnight() {
        let svc = CommonDateFormatService::with_pattern("%d/%m/%Y").unwrap();
        let parsed = svc.parse("01/02/2020").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn offset_in_input_is_applied() {
        let svc = CommonDateFormatService::with_pattern("%Y-%m-%d %H:%M:%S %z").unwrap();
        let parsed = svc.parse("2020-01-01 02:00:00 +0200").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

        let instant = Utc.with_ymd_and_hms(2022, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(svc.format(instant), "2022-06-01 12:00:00 +0000");
        assert_eq!(svc.parse(&svc.format(instant)).unwrap(), instant);
    }

    #[test]
    fn mismatched_text_is_a_validation_error() {
        let svc = CommonDateFormatService::new();
        let err = svc.parse("yesterday").unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("yesterday")));
    }

    #[test]
    fn bad_patterns_are_rejected() {
        assert!(CommonDateFormatService::with_pattern("%Q").is_err());
        assert!(CommonDateFormatService::with_pattern("").is_err());
        assert!(CommonDateFormatService::with_pattern("%H:%M").is_ok());
    }
}
