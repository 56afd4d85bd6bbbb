//! Calendar configuration shared by every [`CivilInstant`](crate::CivilInstant).
//!
//! A [`Calendar`] bundles the calendar identifier, the IANA time zone used to
//! decompose instants into wall-clock fields, and the day that begins a week.
//! It is immutable and shared by `Arc`, so any number of instants (and
//! threads) can read it without coordination.
//!
//! Arithmetic is always proleptic Gregorian. Identifiers other than
//! `gregorian`/`iso8601` are carried through opaquely.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{CivilTimeError, Result};

// ── Weekday ─────────────────────────────────────────────────────────────────

/// A day of the week, numbered `Sunday = 1` through `Saturday = 7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday = 1,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// The 1-based ordinal (`Sunday = 1`).
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    /// Look up a weekday by its 1-based ordinal.
    pub fn from_ordinal(ordinal: u32) -> Option<Weekday> {
        Self::ALL.get(ordinal.checked_sub(1)? as usize).copied()
    }

    /// Days forward from `self` until `target` is reached, in `0..7`.
    pub fn days_until(self, target: Weekday) -> i64 {
        (target.ordinal() as i64 + 7 - self.ordinal() as i64) % 7
    }

    /// Days backward from `self` until `target` is reached, in `0..7`.
    pub fn days_since(self, target: Weekday) -> i64 {
        (self.ordinal() as i64 + 7 - target.ordinal() as i64) % 7
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(wd: chrono::Weekday) -> Self {
        Self::ALL[wd.num_days_from_sunday() as usize]
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(wd: Weekday) -> Self {
        match wd {
            Weekday::Sunday => chrono::Weekday::Sun,
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        };
        f.write_str(name)
    }
}

impl FromStr for Weekday {
    type Err = CivilTimeError;

    /// Parse a weekday name (case-insensitive, full or abbreviated).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(Weekday::Sunday),
            "monday" | "mon" => Ok(Weekday::Monday),
            "tuesday" | "tue" | "tues" => Ok(Weekday::Tuesday),
            "wednesday" | "wed" => Ok(Weekday::Wednesday),
            "thursday" | "thu" | "thurs" => Ok(Weekday::Thursday),
            "friday" | "fri" => Ok(Weekday::Friday),
            "saturday" | "sat" => Ok(Weekday::Saturday),
            _ => Err(CivilTimeError::ParseFailure(format!("unknown weekday '{s}'"))),
        }
    }
}

// ── Configurable week start ─────────────────────────────────────────────────

/// Which day begins a week, for `with_weekday` and week truncation.
///
/// Does **not** affect `next_weekday`/`last_weekday`, which only look at the
/// cyclic weekday distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    /// US convention, and the ordinal origin of [`Weekday`].
    #[default]
    Sunday,
    /// ISO 8601 standard.
    Monday,
}

impl WeekStartDay {
    /// The weekday that opens a week.
    pub fn first_day(self) -> Weekday {
        match self {
            WeekStartDay::Sunday => Weekday::Sunday,
            WeekStartDay::Monday => Weekday::Monday,
        }
    }

    /// How many days `weekday` is from the week-start day.
    pub fn days_from_start(self, weekday: Weekday) -> i64 {
        weekday.days_since(self.first_day())
    }
}

impl FromStr for WeekStartDay {
    type Err = CivilTimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStartDay::Sunday),
            "monday" | "mon" => Ok(WeekStartDay::Monday),
            other => Err(CivilTimeError::InvalidConfig(format!(
                "week start must be 'sunday' or 'monday', got '{other}'"
            ))),
        }
    }
}

// ── Calendar identifier ─────────────────────────────────────────────────────

/// The calendar system an instant is described in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CalendarIdentifier {
    Gregorian,
    Iso8601,
    /// Any other identifier (e.g. `japanese`); carried as configuration only.
    Other(String),
}

impl CalendarIdentifier {
    pub fn as_str(&self) -> &str {
        match self {
            CalendarIdentifier::Gregorian => "gregorian",
            CalendarIdentifier::Iso8601 => "iso8601",
            CalendarIdentifier::Other(name) => name,
        }
    }
}

impl fmt::Display for CalendarIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarIdentifier {
    type Err = CivilTimeError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CivilTimeError::InvalidConfig(
                "calendar identifier is empty".to_string(),
            ));
        }
        Ok(match s.to_lowercase().as_str() {
            "gregorian" => CalendarIdentifier::Gregorian,
            "iso8601" | "iso-8601" => CalendarIdentifier::Iso8601,
            other => CalendarIdentifier::Other(other.to_string()),
        })
    }
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Serializable calendar settings, e.g. loaded from a JSON file.
///
/// ```
/// use civil_time::CalendarConfig;
///
/// let config = CalendarConfig::from_json(r#"{"timezone": "Asia/Tokyo"}"#).unwrap();
/// assert_eq!(config.calendar, "gregorian");
/// assert_eq!(config.timezone, "Asia/Tokyo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Calendar identifier (`gregorian`, `iso8601`, or anything else).
    pub calendar: String,
    /// IANA time zone name.
    pub timezone: String,
    /// Which day starts the week.
    pub week_start: WeekStartDay,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            calendar: "gregorian".to_string(),
            timezone: "UTC".to_string(),
            week_start: WeekStartDay::default(),
        }
    }
}

impl CalendarConfig {
    /// Parse a config from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CivilTimeError::InvalidConfig(e.to_string()))
    }
}

// ── Calendar ────────────────────────────────────────────────────────────────

/// The read-only context used to decompose and compose civil instants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    identifier: CalendarIdentifier,
    time_zone: Tz,
    week_start: WeekStartDay,
}

impl Calendar {
    pub fn new(identifier: CalendarIdentifier, time_zone: Tz, week_start: WeekStartDay) -> Self {
        Self {
            identifier,
            time_zone,
            week_start,
        }
    }

    /// A Gregorian calendar in the given time zone, weeks starting Sunday.
    pub fn gregorian(time_zone: Tz) -> Self {
        Self::new(CalendarIdentifier::Gregorian, time_zone, WeekStartDay::Sunday)
    }

    /// A Gregorian calendar in UTC.
    pub fn utc() -> Self {
        Self::gregorian(Tz::UTC)
    }

    /// Build a calendar from configuration, validating the time zone.
    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        let identifier = config.calendar.parse()?;
        let time_zone = parse_timezone(&config.timezone)?;
        Ok(Self::new(identifier, time_zone, config.week_start))
    }

    /// Wrap in an `Arc` so instants can share it.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn identifier(&self) -> &CalendarIdentifier {
        &self.identifier
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn week_start(&self) -> WeekStartDay {
        self.week_start
    }

    /// Resolve a wall-clock datetime in this calendar's time zone.
    ///
    /// Ambiguous times (DST fold) resolve to the earlier instant. Returns
    /// `None` for times that fall in a DST gap.
    pub(crate) fn resolve_local(&self, naive: &NaiveDateTime) -> Option<chrono::DateTime<Tz>> {
        self.time_zone.from_local_datetime(naive).earliest()
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| CivilTimeError::InvalidTimezone(format!("'{s}'")))
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (ny, nm) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(ny, nm, 1)?;
    let last = first_next.pred_opt()?;
    if last.month() != month {
        return None;
    }
    Some(last.day())
}
