//! Calendar arithmetic: adding offsets to instants and subtracting instants.
//!
//! # Month-end policy
//!
//! Adding months or years keeps the day of month when it exists and
//! otherwise **clamps** to the last day of the target month:
//!
//! ```
//! use civil_time::{Calendar, CalendarUnits, CivilInstant};
//!
//! let calendar = Calendar::utc().shared();
//! let jan31 = CivilInstant::from_ymd(2016, 1, 31, &calendar).unwrap();
//! let feb = jan31.add(&1.month()).unwrap();
//! assert_eq!(feb.day().unwrap(), 29);
//!
//! // Clamping loses information: subtracting the month again lands on the 29th.
//! let back = feb.subtract(&1.month()).unwrap();
//! assert_eq!(back.day().unwrap(), 29);
//! ```
//!
//! # Wall clock vs. elapsed time
//!
//! Era, year, month and day move the wall-clock date in the calendar's time
//! zone and keep the time of day. Hours, minutes, seconds and nanoseconds are
//! elapsed time, so `+24 hours` and `+1 day` differ across a DST transition.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use crate::calendar::days_in_month;
use crate::error::{CivilTimeError, Result};
use crate::instant::{CivilInstant, Components};
use crate::offset::CalendarOffset;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Direction in which an offset is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    fn factor(self) -> i64 {
        match self {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }
}

// ── apply ───────────────────────────────────────────────────────────────────

/// Add (`Sign::Plus`) or subtract (`Sign::Minus`) `offset` to `instant`.
///
/// Set fields are applied coarsest first: era, then years and months
/// together (clamping the day of month), then days, then the time-of-day
/// fields as elapsed time. Unset fields are left untouched, and an empty
/// offset returns `instant` unchanged.
///
/// # Errors
///
/// Returns [`CivilTimeError::InvalidResult`] if the result cannot be
/// represented: integer overflow, a date outside chrono's range, an era
/// other than BCE/CE, or a wall-clock time skipped by a DST transition.
///
/// # Examples
///
/// ```
/// use civil_time::{apply, Calendar, CalendarUnits, CivilInstant, Sign};
///
/// let calendar = Calendar::utc().shared();
/// let dt = CivilInstant::from_ymd_hms(2014, 12, 31, 23, 0, 0, &calendar).unwrap();
/// let next = apply(&dt, &(1.day() + 2.hours()), Sign::Plus).unwrap();
/// assert_eq!(next.to_string(), "2015-01-02T01:00:00+00:00");
/// ```
pub fn apply(instant: &CivilInstant, offset: &CalendarOffset, sign: Sign) -> Result<CivilInstant> {
    if offset.is_empty() {
        return Ok(instant.clone());
    }
    trace!(%instant, %offset, ?sign, "applying calendar offset");

    let scaled = |value: Option<i64>| -> Result<Option<i64>> {
        value
            .map(|v| {
                v.checked_mul(sign.factor())
                    .ok_or_else(|| overflow(instant, offset))
            })
            .transpose()
    };
    let era = scaled(offset.era)?;
    let years = scaled(offset.year)?;
    let months = scaled(offset.month)?;
    let days = scaled(offset.day)?;

    let mut utc = instant.as_utc();

    if era.is_some() || years.is_some() || months.is_some() || days.is_some() {
        let local = instant.local();
        let mut date = local.date_naive();

        if let Some(era) = era {
            date = shift_era(date, era).ok_or_else(|| {
                CivilTimeError::InvalidResult(format!(
                    "moving {} by {era} era(s) leaves the Gregorian eras",
                    instant
                ))
            })?;
        }

        if years.is_some() || months.is_some() {
            let total = years
                .unwrap_or(0)
                .checked_mul(12)
                .and_then(|y| y.checked_add(months.unwrap_or(0)))
                .ok_or_else(|| overflow(instant, offset))?;
            date = add_months(date, total).ok_or_else(|| overflow(instant, offset))?;
        }

        if let Some(days) = days {
            date = TimeDelta::try_days(days)
                .and_then(|d| date.checked_add_signed(d))
                .ok_or_else(|| overflow(instant, offset))?;
        }

        let wall = date.and_time(local.time());
        let resolved = instant.calendar().resolve_local(&wall).ok_or_else(|| {
            debug!(%wall, tz = instant.calendar().time_zone().name(), "wall-clock time skipped by DST");
            CivilTimeError::InvalidResult(format!(
                "{wall} does not exist in {} (skipped by a DST transition)",
                instant.calendar().time_zone().name()
            ))
        })?;
        utc = resolved.with_timezone(&Utc);
    }

    let elapsed = elapsed_delta(
        scaled(offset.hour)?,
        scaled(offset.minute)?,
        scaled(offset.second)?,
        scaled(offset.nanosecond)?,
    )
    .ok_or_else(|| overflow(instant, offset))?;

    let utc: DateTime<Utc> = utc
        .checked_add_signed(elapsed)
        .ok_or_else(|| overflow(instant, offset))?;

    Ok(instant.with_utc(utc))
}

fn overflow(instant: &CivilInstant, offset: &CalendarOffset) -> CivilTimeError {
    debug!(%instant, %offset, "calendar arithmetic out of range");
    CivilTimeError::InvalidResult(format!("{instant} {offset} is out of range"))
}

/// Move `date` by `delta` months, clamping the day to the target month.
fn add_months(date: NaiveDate, delta: i64) -> Option<NaiveDate> {
    let current = i64::from(date.year()) * 12 + i64::from(date.month0());
    let target = current.checked_add(delta)?;
    let year = i32::try_from(target.div_euclid(12)).ok()?;
    let month = u32::try_from(target.rem_euclid(12)).ok()? + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Move `date` by `delta` eras, keeping the year of era.
fn shift_era(date: NaiveDate, delta: i64) -> Option<NaiveDate> {
    let (is_ce, year_of_era) = date.year_ce();
    let era = i64::from(is_ce).checked_add(delta)?;
    let year = match era {
        0 => 1 - i32::try_from(year_of_era).ok()?,
        1 => i32::try_from(year_of_era).ok()?,
        _ => return None,
    };
    let day = date.day().min(days_in_month(year, date.month())?);
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

fn elapsed_delta(
    hours: Option<i64>,
    minutes: Option<i64>,
    seconds: Option<i64>,
    nanos: Option<i64>,
) -> Option<TimeDelta> {
    TimeDelta::try_hours(hours.unwrap_or(0))?
        .checked_add(&TimeDelta::try_minutes(minutes.unwrap_or(0))?)?
        .checked_add(&TimeDelta::try_seconds(seconds.unwrap_or(0))?)?
        .checked_add(&TimeDelta::nanoseconds(nanos.unwrap_or(0)))
}

// ── difference ──────────────────────────────────────────────────────────────

/// The calendar offset from `b` to `a` (`a - b`), positive when `a` is later.
///
/// Both instants are decomposed under `a`'s calendar and subtracted field by
/// field from the nanosecond up to the year. A negative field borrows one
/// unit from the next coarser field: 1e9 nanoseconds, 60 seconds, 60 minutes,
/// 24 hours, and for days the length of the borrowed month (the month
/// `b + months` lands in). All fields share one sign, every field is set,
/// and the era is `Some(0)` because years are counted proleptically.
///
/// The result satisfies `apply(b, difference(a, b), Plus) == a` whenever the
/// calendar has no DST transition between the two instants.
///
/// # Examples
///
/// ```
/// use civil_time::{difference, Calendar, CivilInstant};
///
/// let calendar = Calendar::utc().shared();
/// let a = CivilInstant::from_ymd(2016, 3, 1, &calendar).unwrap();
/// let b = CivilInstant::from_ymd(2016, 2, 1, &calendar).unwrap();
/// let d = difference(&a, &b).unwrap();
/// assert_eq!((d.year, d.month, d.day), (Some(0), Some(1), Some(0)));
/// ```
pub fn difference(a: &CivilInstant, b: &CivilInstant) -> Result<CalendarOffset> {
    let b = b.with_calendar(a.calendar());
    let (ca, cb) = (a.components()?, b.components()?);

    let wall = |c: &Components| (c.year, c.month, c.day, c.hour, c.minute, c.second, c.nanosecond);
    let sign: i64 = if wall(&ca) >= wall(&cb) { 1 } else { -1 };

    // Time of day, finest first. `carry` is the borrow passed upward.
    let mut carry = 0i64;
    let mut settle = |diff: i64, unit: i64| -> i64 {
        let mut v = diff + carry;
        carry = 0;
        if sign > 0 && v < 0 {
            v += unit;
            carry = -1;
        } else if sign < 0 && v > 0 {
            v -= unit;
            carry = 1;
        }
        v
    };
    let nanosecond = settle(
        i64::from(ca.nanosecond) - i64::from(cb.nanosecond),
        NANOS_PER_SECOND,
    );
    let second = settle(i64::from(ca.second) - i64::from(cb.second), 60);
    let minute = settle(i64::from(ca.minute) - i64::from(cb.minute), 60);
    let hour = settle(i64::from(ca.hour) - i64::from(cb.hour), 24);
    let day_carry = carry;

    let invalid = || CivilTimeError::InvalidResult(format!("difference of {a} and {b}"));

    let a_date = ca
        .date()
        .and_then(|d| d.checked_add_signed(TimeDelta::days(day_carry)))
        .ok_or_else(invalid)?;
    let b_date = cb.date().ok_or_else(invalid)?;

    let mut months = (i64::from(a_date.year()) - i64::from(b_date.year())) * 12
        + (i64::from(a_date.month()) - i64::from(b_date.month()));
    if sign > 0 && a_date.day() < b_date.day() {
        months -= 1;
    } else if sign < 0 && a_date.day() > b_date.day() {
        months += 1;
    }
    let anchor = add_months(b_date, months).ok_or_else(invalid)?;
    let day = (a_date - anchor).num_days();

    let offset = CalendarOffset {
        era: Some(0),
        year: Some(months / 12),
        month: Some(months % 12),
        day: Some(day),
        hour: Some(hour),
        minute: Some(minute),
        second: Some(second),
        nanosecond: Some(nanosecond),
    };
    trace!(%a, %b, %offset, "computed calendar difference");
    Ok(offset)
}
