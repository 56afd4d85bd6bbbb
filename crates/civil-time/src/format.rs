//! Text rendering and parsing of [`CivilInstant`]s.
//!
//! Rendering uses a fixed en-US layout in the calendar's time zone; there is
//! no locale database. Parsing takes chrono strftime patterns.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::Calendar;
use crate::error::{CivilTimeError, Result};
use crate::instant::CivilInstant;

/// Verbosity of a rendered date or time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    None,
    Short,
    Medium,
    Long,
    Full,
}

impl Style {
    fn date_pattern(self) -> Option<&'static str> {
        match self {
            Style::None => None,
            Style::Short => Some("%-m/%-d/%y"),
            Style::Medium => Some("%b %-d, %Y"),
            Style::Long => Some("%B %-d, %Y"),
            Style::Full => Some("%A, %B %-d, %Y"),
        }
    }

    fn time_pattern(self) -> Option<&'static str> {
        match self {
            Style::None => None,
            Style::Short => Some("%-I:%M %p"),
            Style::Medium => Some("%-I:%M:%S %p"),
            Style::Long | Style::Full => Some("%-I:%M:%S %p %Z"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Style::None => "none",
            Style::Short => "short",
            Style::Medium => "medium",
            Style::Long => "long",
            Style::Full => "full",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = CivilTimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Style::None),
            "short" => Ok(Style::Short),
            "medium" => Ok(Style::Medium),
            "long" => Ok(Style::Long),
            "full" => Ok(Style::Full),
            _ => Err(CivilTimeError::ParseFailure(format!("unknown style: {s}"))),
        }
    }
}

// ── Formatting ──────────────────────────────────────────────────────────────

/// Render `instant` with independent date and time styles.
///
/// Long and Full dates are joined to the time with `" at "`, shorter dates
/// with `", "`. Both styles `None` yields an empty string.
///
/// # Examples
///
/// ```
/// use civil_time::{format, make_instant, Calendar, Style};
///
/// let calendar = Calendar::utc().shared();
/// let dt = make_instant(None, 2014, 8, 14, 20, 25, 43, 0, &calendar).unwrap();
/// assert_eq!(format(&dt, Style::Long, Style::Medium), "August 14, 2014 at 8:25:43 PM");
/// assert_eq!(format(&dt, Style::Short, Style::Short), "8/14/14, 8:25 PM");
/// ```
pub fn format(instant: &CivilInstant, date_style: Style, time_style: Style) -> String {
    let date = format_date(instant, date_style);
    let time = format_time(instant, time_style);
    match (date.is_empty(), time.is_empty()) {
        (true, _) => time,
        (false, true) => date,
        (false, false) => {
            let sep = match date_style {
                Style::Long | Style::Full => " at ",
                _ => ", ",
            };
            format!("{date}{sep}{time}")
        }
    }
}

/// Render only the date portion of `instant`.
pub fn format_date(instant: &CivilInstant, style: Style) -> String {
    style
        .date_pattern()
        .map(|p| instant.local().format(p).to_string())
        .unwrap_or_default()
}

/// Render only the time portion of `instant`.
pub fn format_time(instant: &CivilInstant, style: Style) -> String {
    style
        .time_pattern()
        .map(|p| instant.local().format(p).to_string())
        .unwrap_or_default()
}

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse `text` with a chrono strftime `pattern`.
///
/// Patterns with a UTC offset (`%z`, `%:z`) yield that absolute instant.
/// Patterns without one are read as wall-clock time in the calendar's time
/// zone, and date-only patterns resolve to midnight.
///
/// # Errors
///
/// Returns [`CivilTimeError::ParseFailure`] when `text` does not match
/// `pattern` or names a wall-clock time skipped by DST.
///
/// # Examples
///
/// ```
/// use civil_time::{parse, Calendar};
///
/// let calendar = Calendar::utc().shared();
/// let dt = parse("2014/8/14", "%Y/%m/%d", &calendar).unwrap();
/// assert_eq!(dt.to_string(), "2014-08-14T00:00:00+00:00");
/// ```
pub fn parse(text: &str, pattern: &str, calendar: &Arc<Calendar>) -> Result<CivilInstant> {
    if let Ok(dt) = DateTime::parse_from_str(text, pattern) {
        return Ok(CivilInstant::new(dt.with_timezone(&Utc), calendar));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
        return resolve(text, naive, calendar);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, pattern) {
        return resolve(text, date.and_time(NaiveTime::default()), calendar);
    }
    debug!(text, pattern, "text does not match pattern");
    Err(CivilTimeError::ParseFailure(format!(
        "'{text}' does not match '{pattern}'"
    )))
}

/// Parse an ISO 8601 timestamp.
///
/// Accepts RFC 3339 (`2014-08-14T20:25:43+09:00`, `…Z`), a basic offset
/// (`2014-08-14T20:25:43+0900`), optional fractional seconds, a timestamp
/// without offset (read in the calendar's time zone) and a bare date.
///
/// # Errors
///
/// Returns [`CivilTimeError::ParseFailure`] for anything else.
pub fn parse_iso8601(text: &str, calendar: &Arc<Calendar>) -> Result<CivilInstant> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(CivilInstant::new(dt.with_timezone(&Utc), calendar));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(CivilInstant::new(dt.with_timezone(&Utc), calendar));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return resolve(text, naive, calendar);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return resolve(text, date.and_time(NaiveTime::default()), calendar);
    }
    debug!(text, "not an ISO 8601 timestamp");
    Err(CivilTimeError::ParseFailure(format!(
        "'{text}' is not an ISO 8601 timestamp"
    )))
}

fn resolve(text: &str, naive: NaiveDateTime, calendar: &Arc<Calendar>) -> Result<CivilInstant> {
    let local = calendar.resolve_local(&naive).ok_or_else(|| {
        CivilTimeError::ParseFailure(format!(
            "'{text}' does not exist in {} (skipped by a DST transition)",
            calendar.time_zone().name()
        ))
    })?;
    Ok(CivilInstant::new(local.with_timezone(&Utc), calendar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instant::make_instant;

    fn sample() -> CivilInstant {
        make_instant(None, 2014, 8, 14, 20, 25, 43, 0, &Calendar::utc().shared()).unwrap()
    }

    #[test]
    fn test_date_styles() {
        let dt = sample();
        assert_eq!(format_date(&dt, Style::None), "");
        assert_eq!(format_date(&dt, Style::Short), "8/14/14");
        assert_eq!(format_date(&dt, Style::Medium), "Aug 14, 2014");
        assert_eq!(format_date(&dt, Style::Long), "August 14, 2014");
        assert_eq!(format_date(&dt, Style::Full), "Thursday, August 14, 2014");
    }

    #[test]
    fn test_time_styles() {
        let dt = sample();
        assert_eq!(format_time(&dt, Style::None), "");
        assert_eq!(format_time(&dt, Style::Short), "8:25 PM");
        assert_eq!(format_time(&dt, Style::Medium), "8:25:43 PM");
        assert_eq!(format_time(&dt, Style::Long), "8:25:43 PM UTC");
    }

    #[test]
    fn test_combined_styles() {
        let dt = sample();
        assert_eq!(format(&dt, Style::Long, Style::Medium), "August 14, 2014 at 8:25:43 PM");
        assert_eq!(format(&dt, Style::Medium, Style::Short), "Aug 14, 2014, 8:25 PM");
        assert_eq!(format(&dt, Style::None, Style::Short), "8:25 PM");
        assert_eq!(format(&dt, Style::Full, Style::None), "Thursday, August 14, 2014");
        assert_eq!(format(&dt, Style::None, Style::None), "");
    }

    #[test]
    fn test_format_uses_calendar_time_zone() {
        let tokyo = Calendar::gregorian(chrono_tz::Asia::Tokyo).shared();
        let dt = sample().with_calendar(&tokyo);
        assert_eq!(format(&dt, Style::Medium, Style::Long), "Aug 15, 2014, 5:25:43 AM JST");
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("Medium".parse::<Style>().unwrap(), Style::Medium);
        assert!("tiny".parse::<Style>().is_err());
    }

    #[test]
    fn test_parse_date_only_pattern() {
        let calendar = Calendar::utc().shared();
        let dt = parse("2014/8/14", "%Y/%m/%d", &calendar).unwrap();
        assert_eq!(dt.to_string(), "2014-08-14T00:00:00+00:00");
    }

    #[test]
    fn test_parse_reads_wall_clock_in_calendar_zone() {
        let ny = Calendar::gregorian(chrono_tz::America::New_York).shared();
        let dt = parse("2014-08-14 20:25", "%Y-%m-%d %H:%M", &ny).unwrap();
        assert_eq!(dt.as_utc().to_rfc3339(), "2014-08-15T00:25:00+00:00");
    }

    #[test]
    fn test_parse_with_offset_is_absolute() {
        let ny = Calendar::gregorian(chrono_tz::America::New_York).shared();
        let dt = parse("2014-08-14 20:25 +0000", "%Y-%m-%d %H:%M %z", &ny).unwrap();
        assert_eq!(dt.as_utc().to_rfc3339(), "2014-08-14T20:25:00+00:00");
    }

    #[test]
    fn test_parse_mismatch_is_parse_failure() {
        let calendar = Calendar::utc().shared();
        let err = parse("14 August", "%Y-%m-%d", &calendar).unwrap_err();
        assert!(matches!(err, CivilTimeError::ParseFailure(_)));
        let err = parse("2014-02-30", "%Y-%m-%d", &calendar).unwrap_err();
        assert!(matches!(err, CivilTimeError::ParseFailure(_)));
    }

    #[test]
    fn test_parse_iso8601_variants() {
        let calendar = Calendar::utc().shared();
        let expected = "2014-08-14T11:25:43+00:00";
        for text in [
            "2014-08-14T20:25:43+0900",
            "2014-08-14T20:25:43+09:00",
            "2014-08-14T11:25:43Z",
            "2014-08-14T11:25:43",
        ] {
            let dt = parse_iso8601(text, &calendar).unwrap();
            assert_eq!(dt.to_string(), expected, "input: {text}");
        }
        let dt = parse_iso8601("2014-08-14T11:25:43.250Z", &calendar).unwrap();
        assert_eq!(dt.nanosecond().unwrap(), 250_000_000);
        let dt = parse_iso8601("2014-08-14", &calendar).unwrap();
        assert_eq!(dt.to_string(), "2014-08-14T00:00:00+00:00");
    }

    #[test]
    fn test_parse_iso8601_rejects_garbage() {
        let calendar = Calendar::utc().shared();
        for text in ["", "yesterday", "2014-13-01", "2014-08-14T25:00:00Z"] {
            let err = parse_iso8601(text, &calendar).unwrap_err();
            assert!(matches!(err, CivilTimeError::ParseFailure(_)), "input: {text}");
        }
    }

    #[test]
    fn test_parse_dst_gap_is_parse_failure() {
        let ny = Calendar::gregorian(chrono_tz::America::New_York).shared();
        let err = parse_iso8601("2026-03-08T02:30:00", &ny).unwrap_err();
        assert!(err.to_string().contains("DST"), "got: {err}");
    }
}
