//! Relative-date resolution: "next Friday", "last week", "between these two".
//!
//! Every function takes its reference instant explicitly; pass
//! [`CivilInstant::now`] to resolve against the system clock.

use std::fmt;
use std::ops::{RangeBounds, RangeInclusive};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::arithmetic::{apply, Sign};
use crate::calendar::Weekday;
use crate::error::{CivilTimeError, Result};
use crate::instant::CivilInstant;
use crate::offset::{CalendarField, CalendarOffset};

// ── Periods ─────────────────────────────────────────────────────────────────

/// A calendar unit used for comparison, truncation and relative ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarPeriod {
    Era,
    Year,
    Month,
    Week,
    Day,
    Weekday,
    Hour,
    Minute,
    Second,
    Nanosecond,
}

impl CalendarPeriod {
    pub const ALL: [CalendarPeriod; 10] = [
        CalendarPeriod::Era,
        CalendarPeriod::Year,
        CalendarPeriod::Month,
        CalendarPeriod::Week,
        CalendarPeriod::Day,
        CalendarPeriod::Weekday,
        CalendarPeriod::Hour,
        CalendarPeriod::Minute,
        CalendarPeriod::Second,
        CalendarPeriod::Nanosecond,
    ];

    /// One unit of this period as an offset. A week is seven days and a
    /// weekday step is one day.
    pub fn unit(self) -> CalendarOffset {
        match self {
            CalendarPeriod::Era => CalendarOffset::single(CalendarField::Era, 1),
            CalendarPeriod::Year => CalendarOffset::single(CalendarField::Year, 1),
            CalendarPeriod::Month => CalendarOffset::single(CalendarField::Month, 1),
            CalendarPeriod::Week => CalendarOffset::single(CalendarField::Day, 7),
            CalendarPeriod::Day | CalendarPeriod::Weekday => {
                CalendarOffset::single(CalendarField::Day, 1)
            }
            CalendarPeriod::Hour => CalendarOffset::single(CalendarField::Hour, 1),
            CalendarPeriod::Minute => CalendarOffset::single(CalendarField::Minute, 1),
            CalendarPeriod::Second => CalendarOffset::single(CalendarField::Second, 1),
            CalendarPeriod::Nanosecond => CalendarOffset::single(CalendarField::Nanosecond, 1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CalendarPeriod::Era => "era",
            CalendarPeriod::Year => "year",
            CalendarPeriod::Month => "month",
            CalendarPeriod::Week => "week",
            CalendarPeriod::Day => "day",
            CalendarPeriod::Weekday => "weekday",
            CalendarPeriod::Hour => "hour",
            CalendarPeriod::Minute => "minute",
            CalendarPeriod::Second => "second",
            CalendarPeriod::Nanosecond => "nanosecond",
        }
    }
}

impl fmt::Display for CalendarPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarPeriod {
    type Err = CivilTimeError;

    /// Accepts singular or plural names, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let name = lower.strip_suffix('s').unwrap_or(&lower);
        CalendarPeriod::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| CivilTimeError::ParseFailure(format!("unknown calendar period: {s}")))
    }
}

// ── Weekday navigation ──────────────────────────────────────────────────────

/// The nearest `weekday` at or after `reference`, keeping the time of day.
///
/// If `reference` already falls on `weekday` it is returned unchanged.
///
/// # Examples
///
/// ```
/// use civil_time::{next_weekday, Calendar, CivilInstant, Weekday};
///
/// let calendar = Calendar::utc().shared();
/// let wednesday = CivilInstant::from_ymd(2026, 2, 18, &calendar).unwrap();
/// let friday = next_weekday(Weekday::Friday, &wednesday).unwrap();
/// assert_eq!(friday.to_string(), "2026-02-20T00:00:00+00:00");
/// ```
pub fn next_weekday(weekday: Weekday, reference: &CivilInstant) -> Result<CivilInstant> {
    let delta = reference.weekday()?.days_until(weekday);
    trace!(%reference, %weekday, delta, "resolving next weekday");
    shift_days(reference, delta)
}

/// The nearest `weekday` at or before `reference`, keeping the time of day.
///
/// If `reference` already falls on `weekday` it is returned unchanged.
pub fn last_weekday(weekday: Weekday, reference: &CivilInstant) -> Result<CivilInstant> {
    let delta = reference.weekday()?.days_since(weekday);
    trace!(%reference, %weekday, delta, "resolving last weekday");
    shift_days(reference, -delta)
}

fn shift_days(reference: &CivilInstant, delta: i64) -> Result<CivilInstant> {
    if delta == 0 {
        return Ok(reference.clone());
    }
    apply(
        reference,
        &CalendarOffset::single(CalendarField::Day, delta),
        Sign::Plus,
    )
}

// ── Period ranges ───────────────────────────────────────────────────────────

/// The closed range from `reference` to one `period` later.
///
/// ```
/// use civil_time::{next_period, Calendar, CalendarPeriod, CivilInstant};
///
/// let calendar = Calendar::utc().shared();
/// let now = CivilInstant::from_ymd(2026, 2, 18, &calendar).unwrap();
/// let week = next_period(CalendarPeriod::Week, &now).unwrap();
/// assert_eq!(week.end().to_string(), "2026-02-25T00:00:00+00:00");
/// ```
pub fn next_period(
    period: CalendarPeriod,
    reference: &CivilInstant,
) -> Result<RangeInclusive<CivilInstant>> {
    let end = apply(reference, &period.unit(), Sign::Plus)?;
    Ok(ordered(reference.clone(), end))
}

/// The closed range from one `period` before `reference` up to `reference`.
pub fn last_period(
    period: CalendarPeriod,
    reference: &CivilInstant,
) -> Result<RangeInclusive<CivilInstant>> {
    let start = apply(reference, &period.unit(), Sign::Minus)?;
    Ok(ordered(start, reference.clone()))
}

fn ordered(a: CivilInstant, b: CivilInstant) -> RangeInclusive<CivilInstant> {
    if a <= b {
        a..=b
    } else {
        b..=a
    }
}

// ── Range tests ─────────────────────────────────────────────────────────────

/// True when `instant` lies in `range`. Both half-open and closed ranges
/// work, compared on the absolute instant.
pub fn in_range<R: RangeBounds<CivilInstant>>(instant: &CivilInstant, range: &R) -> bool {
    range.contains(instant)
}

/// True when `instant` lies between `low` and `high`, inclusive. The bounds
/// may be given in either order.
pub fn between(instant: &CivilInstant, low: &CivilInstant, high: &CivilInstant) -> bool {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    low <= instant && instant <= high
}
