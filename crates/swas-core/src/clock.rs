//! Effective "today" for the pipeline
//!
//! The forecast window is anchored on the current week, so every run needs a
//! date. Production uses the local clock; tests and backdated runs pin a date
//! either explicitly (`FixedClock`) or through the `SWAS_CURRENT_DATE`
//! environment variable, which is read once into a `Clock` value.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

/// Environment variable holding an optional date override
pub const CURRENT_DATE_ENV: &str = "SWAS_CURRENT_DATE";

/// Date-only formats accepted for the override
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Date-time formats accepted for the override
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Source of the effective current date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Live local clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parse an override value into a date
///
/// Returns None for blank or unrecognized input. RFC 3339 timestamps with an
/// offset are converted to UTC before the date is taken.
pub fn parse_override(value: &str) -> Option<NaiveDate> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Read the override from the environment, if set and valid
pub fn override_from_env() -> Option<NaiveDate> {
    let raw = std::env::var(CURRENT_DATE_ENV).ok()?;
    let parsed = parse_override(&raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        warn!(value = %raw, "Ignoring unparseable {}", CURRENT_DATE_ENV);
    }
    parsed
}

/// Pinned date for this run: the explicit date, else the environment override
///
/// The environment is only consulted when no explicit date is given.
pub fn pinned_date(explicit: Option<NaiveDate>) -> Option<NaiveDate> {
    explicit.or_else(override_from_env)
}

/// Clock for an already-resolved pinned date, live when None
pub fn clock_for(pinned: Option<NaiveDate>) -> Box<dyn Clock> {
    match pinned {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    }
}

/// Resolve the clock for this run
///
/// An explicit date wins, then the environment override, then the live clock.
pub fn resolve_clock(explicit: Option<NaiveDate>) -> Box<dyn Clock> {
    clock_for(pinned_date(explicit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(date(2025, 3, 12));
        assert_eq!(clock.today(), date(2025, 3, 12));
    }

    #[test]
    fn test_parse_override_date_formats() {
        assert_eq!(parse_override("2025-03-12"), Some(date(2025, 3, 12)));
        assert_eq!(parse_override("03/12/2025"), Some(date(2025, 3, 12)));
        assert_eq!(parse_override("2025/03/12"), Some(date(2025, 3, 12)));
    }

    #[test]
    fn test_parse_override_datetime_formats() {
        assert_eq!(parse_override("2025-03-12 08:30"), Some(date(2025, 3, 12)));
        assert_eq!(
            parse_override("2025-03-12T23:59:59"),
            Some(date(2025, 3, 12))
        );
        // 23:30 at -05:00 is already the next day in UTC
        assert_eq!(
            parse_override("2025-03-12T23:30:00-05:00"),
            Some(date(2025, 3, 13))
        );
    }

    #[test]
    fn test_parse_override_rejects_garbage() {
        assert_eq!(parse_override(""), None);
        assert_eq!(parse_override("   "), None);
        assert_eq!(parse_override("next tuesday"), None);
    }

    #[test]
    fn test_resolve_clock_explicit_wins() {
        let clock = resolve_clock(Some(date(2024, 1, 1)));
        assert_eq!(clock.today(), date(2024, 1, 1));
    }

    #[test]
    fn test_clock_for_pinned_date() {
        assert_eq!(clock_for(Some(date(2023, 6, 5))).today(), date(2023, 6, 5));
        assert_eq!(pinned_date(Some(date(2023, 6, 5))), Some(date(2023, 6, 5)));
    }
}
