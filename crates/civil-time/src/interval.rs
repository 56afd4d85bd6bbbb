//! Elapsed-time quantities measured in seconds.
//!
//! An [`Interval`] is a plain signed number of seconds. Unlike a
//! [`CalendarOffset`](crate::CalendarOffset) it knows nothing about months
//! or days of varying length: a day is always 86 400 seconds.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::calendar::Calendar;
use crate::error::{CivilTimeError, Result};
use crate::instant::CivilInstant;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const SECONDS_PER_HOUR: f64 = 60.0 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: f64 = 24.0 * SECONDS_PER_HOUR;
pub const SECONDS_PER_WEEK: f64 = 7.0 * SECONDS_PER_DAY;
pub const MICROSECONDS_PER_SECOND: f64 = 1e6;
pub const NANOSECONDS_PER_SECOND: f64 = 1e9;

/// A signed amount of elapsed time, possibly fractional.
///
/// ```
/// use civil_time::IntervalUnits;
///
/// let total = 1.0.weeks() + 1.0.days();
/// assert_eq!(total.days(), 8.0);
/// assert_eq!(1.0.weeks().hours(), 168.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
pub struct Interval {
    seconds: f64,
}

impl Interval {
    pub const ZERO: Interval = Interval { seconds: 0.0 };

    pub const fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn weeks(self) -> f64 {
        self.seconds / SECONDS_PER_WEEK
    }

    pub fn days(self) -> f64 {
        self.seconds / SECONDS_PER_DAY
    }

    pub fn hours(self) -> f64 {
        self.seconds / SECONDS_PER_HOUR
    }

    pub fn minutes(self) -> f64 {
        self.seconds / SECONDS_PER_MINUTE
    }

    pub fn seconds(self) -> f64 {
        self.seconds
    }

    pub fn microseconds(self) -> f64 {
        self.seconds * MICROSECONDS_PER_SECOND
    }

    pub fn nanoseconds(self) -> f64 {
        self.seconds * NANOSECONDS_PER_SECOND
    }

    /// Convert to a chrono `TimeDelta`, rounding to the nearest nanosecond.
    ///
    /// # Errors
    ///
    /// Returns [`CivilTimeError::InvalidResult`] for non-finite values or
    /// values outside chrono's representable range.
    pub fn to_time_delta(self) -> Result<TimeDelta> {
        if !self.seconds.is_finite() {
            return Err(CivilTimeError::InvalidResult(format!(
                "interval of {} seconds is not finite",
                self.seconds
            )));
        }
        let whole = self.seconds.trunc();
        let nanos = ((self.seconds - whole) * NANOSECONDS_PER_SECOND).round() as i64;
        if whole.abs() >= i64::MAX as f64 / 1000.0 {
            return Err(out_of_range(self));
        }
        TimeDelta::try_seconds(whole as i64)
            .and_then(|d| d.checked_add(&TimeDelta::nanoseconds(nanos)))
            .ok_or_else(|| out_of_range(self))
    }

    /// The instant this interval after `reference`.
    pub fn after(self, reference: &CivilInstant) -> Result<CivilInstant> {
        let delta = self.to_time_delta()?;
        shift(reference, delta)
    }

    /// The instant this interval before `reference`.
    pub fn before(self, reference: &CivilInstant) -> Result<CivilInstant> {
        (-self).after(reference)
    }

    /// This interval from now, reading the system clock.
    pub fn later(self, calendar: &Arc<Calendar>) -> Result<CivilInstant> {
        self.after(&CivilInstant::now(calendar))
    }

    /// This interval before now, reading the system clock.
    pub fn ago(self, calendar: &Arc<Calendar>) -> Result<CivilInstant> {
        self.before(&CivilInstant::now(calendar))
    }
}

fn shift(reference: &CivilInstant, delta: TimeDelta) -> Result<CivilInstant> {
    let shifted: DateTime<Utc> = reference
        .as_utc()
        .checked_add_signed(delta)
        .ok_or_else(|| {
            CivilTimeError::InvalidResult(format!(
                "{} shifted by {delta} is out of range",
                reference.as_utc().to_rfc3339()
            ))
        })?;
    Ok(reference.with_utc(shifted))
}

fn out_of_range(interval: Interval) -> CivilTimeError {
    CivilTimeError::InvalidResult(format!(
        "interval of {} seconds is out of range",
        interval.seconds
    ))
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        Interval::from_seconds(self.seconds + rhs.seconds)
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Interval) -> Interval {
        Interval::from_seconds(self.seconds - rhs.seconds)
    }
}

impl Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        Interval::from_seconds(-self.seconds)
    }
}

impl Mul<f64> for Interval {
    type Output = Interval;

    fn mul(self, rhs: f64) -> Interval {
        Interval::from_seconds(self.seconds * rhs)
    }
}

impl Mul<Interval> for f64 {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        rhs * self
    }
}

impl Div<f64> for Interval {
    type Output = Interval;

    fn div(self, rhs: f64) -> Interval {
        Interval::from_seconds(self.seconds / rhs)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds)
    }
}

/// Unit suffixes turning a floating-point literal into an [`Interval`].
pub trait IntervalUnits: Sized {
    fn weeks(self) -> Interval;
    fn days(self) -> Interval;
    fn hours(self) -> Interval;
    fn minutes(self) -> Interval;
    fn seconds(self) -> Interval;
    fn microseconds(self) -> Interval;
    fn nanoseconds(self) -> Interval;

    fn week(self) -> Interval {
        self.weeks()
    }

    fn day(self) -> Interval {
        self.days()
    }

    fn hour(self) -> Interval {
        self.hours()
    }

    fn minute(self) -> Interval {
        self.minutes()
    }

    fn second(self) -> Interval {
        self.seconds()
    }
}

impl IntervalUnits for f64 {
    fn weeks(self) -> Interval {
        Interval::from_seconds(self * SECONDS_PER_WEEK)
    }

    fn days(self) -> Interval {
        Interval::from_seconds(self * SECONDS_PER_DAY)
    }

    fn hours(self) -> Interval {
        Interval::from_seconds(self * SECONDS_PER_HOUR)
    }

    fn minutes(self) -> Interval {
        Interval::from_seconds(self * SECONDS_PER_MINUTE)
    }

    fn seconds(self) -> Interval {
        Interval::from_seconds(self)
    }

    fn microseconds(self) -> Interval {
        Interval::from_seconds(self / MICROSECONDS_PER_SECOND)
    }

    fn nanoseconds(self) -> Interval {
        Interval::from_seconds(self / NANOSECONDS_PER_SECOND)
    }
}
