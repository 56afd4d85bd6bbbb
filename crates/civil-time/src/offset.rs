//! Calendar offsets: signed amounts expressed in calendar fields.
//!
//! A [`CalendarOffset`] is what you add to a date when "one month" must mean
//! the same day next month rather than a fixed number of seconds. Each field
//! is optional, and an unset field is different from an explicit zero: unset
//! means "leave this field alone".
//!
//! Integer literals become single-field offsets through [`CalendarUnits`]:
//!
//! ```
//! use civil_time::{CalendarOffset, CalendarUnits};
//!
//! let offset = 1.year() + 2.months();
//! assert_eq!(offset.year, Some(1));
//! assert_eq!(offset.month, Some(2));
//! assert_eq!(offset.day, None);
//! assert_eq!(3.weeks(), CalendarOffset { day: Some(21), ..Default::default() });
//! ```

use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;

use crate::arithmetic::{apply, Sign};
use crate::calendar::Calendar;
use crate::error::{CivilTimeError, Result};
use crate::instant::CivilInstant;

// ── Fields ──────────────────────────────────────────────────────────────────

/// One settable field of a [`CalendarOffset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarField {
    Era,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Nanosecond,
}

impl CalendarField {
    /// Every field, coarsest first.
    pub const ALL: [CalendarField; 8] = [
        CalendarField::Era,
        CalendarField::Year,
        CalendarField::Month,
        CalendarField::Day,
        CalendarField::Hour,
        CalendarField::Minute,
        CalendarField::Second,
        CalendarField::Nanosecond,
    ];
}

// ── CalendarOffset ──────────────────────────────────────────────────────────

/// A signed offset in calendar fields. `None` means "untouched".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarOffset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nanosecond: Option<i64>,
}

impl CalendarOffset {
    pub fn new() -> Self {
        Self::default()
    }

    /// An offset with exactly one field set.
    pub fn single(field: CalendarField, value: i64) -> Self {
        Self::new().with(field, value)
    }

    pub fn get(&self, field: CalendarField) -> Option<i64> {
        match field {
            CalendarField::Era => self.era,
            CalendarField::Year => self.year,
            CalendarField::Month => self.month,
            CalendarField::Day => self.day,
            CalendarField::Hour => self.hour,
            CalendarField::Minute => self.minute,
            CalendarField::Second => self.second,
            CalendarField::Nanosecond => self.nanosecond,
        }
    }

    pub fn set(&mut self, field: CalendarField, value: Option<i64>) {
        let slot = match field {
            CalendarField::Era => &mut self.era,
            CalendarField::Year => &mut self.year,
            CalendarField::Month => &mut self.month,
            CalendarField::Day => &mut self.day,
            CalendarField::Hour => &mut self.hour,
            CalendarField::Minute => &mut self.minute,
            CalendarField::Second => &mut self.second,
            CalendarField::Nanosecond => &mut self.nanosecond,
        };
        *slot = value;
    }

    /// Builder-style setter.
    pub fn with(mut self, field: CalendarField, value: i64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        CalendarField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// The set fields with their values, coarsest first.
    pub fn fields(&self) -> impl Iterator<Item = (CalendarField, i64)> + '_ {
        CalendarField::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f, v)))
    }

    /// Apply this offset forward from `reference`.
    pub fn after(&self, reference: &CivilInstant) -> Result<CivilInstant> {
        apply(reference, self, Sign::Plus)
    }

    /// Apply this offset backward from `reference`.
    pub fn before(&self, reference: &CivilInstant) -> Result<CivilInstant> {
        apply(reference, self, Sign::Minus)
    }

    /// This offset from now, reading the system clock.
    pub fn later(&self, calendar: &Arc<Calendar>) -> Result<CivilInstant> {
        self.after(&CivilInstant::now(calendar))
    }

    /// This offset before now, reading the system clock.
    pub fn ago(&self, calendar: &Arc<Calendar>) -> Result<CivilInstant> {
        self.before(&CivilInstant::now(calendar))
    }

    /// Render the set, non-zero fields as human-readable text.
    ///
    /// ```
    /// use civil_time::{CalendarUnits, UnitsStyle};
    ///
    /// assert_eq!(3.days().format(UnitsStyle::Full), "3 days");
    /// assert_eq!((1.hour() + 30.minutes()).format(UnitsStyle::Abbreviated), "1h 30m");
    /// ```
    pub fn format(&self, style: UnitsStyle) -> String {
        let parts: Vec<String> = self
            .fields()
            .filter(|(_, v)| *v != 0)
            .map(|(f, v)| style.render(f, v))
            .collect();
        if parts.is_empty() {
            return style.render(CalendarField::Second, 0);
        }
        parts.join(style.separator())
    }

    fn zip_with(self, rhs: Self, op: fn(i64, i64) -> i64) -> Self {
        let mut out = Self::new();
        for field in CalendarField::ALL {
            let value = match (self.get(field), rhs.get(field)) {
                (None, None) => None,
                (l, r) => Some(op(l.unwrap_or(0), r.unwrap_or(0))),
            };
            out.set(field, value);
        }
        out
    }
}

/// Negates every set field; unset fields stay unset. `i64::MIN` saturates
/// to `i64::MAX`.
impl Neg for CalendarOffset {
    type Output = CalendarOffset;

    fn neg(self) -> CalendarOffset {
        let mut out = self;
        for field in CalendarField::ALL {
            out.set(field, self.get(field).map(i64::saturating_neg));
        }
        out
    }
}

/// Field-wise sum. A field set on either side is set in the result.
/// Sums saturate at the `i64` bounds.
impl Add for CalendarOffset {
    type Output = CalendarOffset;

    fn add(self, rhs: CalendarOffset) -> CalendarOffset {
        self.zip_with(rhs, i64::saturating_add)
    }
}

/// Field-wise difference, saturating at the `i64` bounds.
impl Sub for CalendarOffset {
    type Output = CalendarOffset;

    fn sub(self, rhs: CalendarOffset) -> CalendarOffset {
        self.zip_with(rhs, i64::saturating_sub)
    }
}

impl fmt::Display for CalendarOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(UnitsStyle::Abbreviated))
    }
}

/// Parse compact offsets such as `"1y2mo3d"`, `"-1d30m"` or `"+2w 4h"`.
///
/// Units are `era`, `y`, `mo`, `w` (7 days), `d`, `h`, `m`, `s`, `us`
/// (1000 ns) and `ns`. A sign applies to its component and every following
/// unsigned one, so `"-1d30m"` is minus one day and minus thirty minutes.
/// Repeated units accumulate, and the abbreviated [`Display`](fmt::Display)
/// output of a single-signed offset parses back to its non-zero fields.
impl FromStr for CalendarOffset {
    type Err = CivilTimeError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let fail = |msg: String| CivilTimeError::ParseFailure(msg);
        if s.is_empty() {
            return Err(fail("empty offset".to_string()));
        }

        let mut offset = CalendarOffset::new();
        let mut sign = 1i64;
        let mut chars = s.chars().peekable();

        while chars.peek().is_some() {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.peek().is_none() {
                break;
            }
            match chars.next_if(|c| *c == '+' || *c == '-') {
                Some('-') => sign = -1,
                Some(_) => sign = 1,
                None => {}
            }

            let mut digits = String::new();
            while let Some(c) = chars.next_if(char::is_ascii_digit) {
                digits.push(c);
            }
            let mut unit = String::new();
            while let Some(c) = chars.next_if(char::is_ascii_alphabetic) {
                unit.push(c.to_ascii_lowercase());
            }
            if digits.is_empty() {
                let found = match chars.peek() {
                    Some(c) if unit.is_empty() => c.to_string(),
                    _ => unit,
                };
                return Err(fail(format!("expected number before '{found}' in '{s}'")));
            }
            if unit.is_empty() {
                return Err(fail(format!("number without unit in '{s}'")));
            }

            let n: i64 = digits
                .parse()
                .map_err(|_| fail(format!("invalid number in '{s}'")))?;
            let (field, scale) = match unit.as_str() {
                "era" => (CalendarField::Era, 1),
                "y" => (CalendarField::Year, 1),
                "mo" => (CalendarField::Month, 1),
                "w" => (CalendarField::Day, 7),
                "d" => (CalendarField::Day, 1),
                "h" => (CalendarField::Hour, 1),
                "m" => (CalendarField::Minute, 1),
                "s" => (CalendarField::Second, 1),
                "us" => (CalendarField::Nanosecond, 1000),
                "ns" => (CalendarField::Nanosecond, 1),
                _ => return Err(fail(format!("unknown unit '{unit}' in '{s}'"))),
            };
            let value = n
                .checked_mul(scale)
                .and_then(|v| v.checked_mul(sign))
                .and_then(|v| v.checked_add(offset.get(field).unwrap_or(0)))
                .ok_or_else(|| fail(format!("'{s}' overflows")))?;
            offset.set(field, Some(value));
        }

        if offset.is_empty() {
            return Err(fail(format!("no components in '{s}'")));
        }
        Ok(offset)
    }
}

// ── Rendering ───────────────────────────────────────────────────────────────

/// How [`CalendarOffset::format`] spells units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitsStyle {
    /// `1y 2mo 3d 4h 5m 6s`
    Abbreviated,
    /// `1 yr, 2 mos, 3 days, 4 hr, 5 min, 6 sec`
    Short,
    /// `1 year, 2 months, 3 days, 4 hours, 5 minutes, 6 seconds`
    #[default]
    Full,
}

impl UnitsStyle {
    fn separator(self) -> &'static str {
        match self {
            UnitsStyle::Abbreviated => " ",
            UnitsStyle::Short | UnitsStyle::Full => ", ",
        }
    }

    fn render(self, field: CalendarField, value: i64) -> String {
        let plural = value.unsigned_abs() != 1;
        let unit = match self {
            UnitsStyle::Abbreviated => {
                return format!("{value}{}", abbreviated_unit(field));
            }
            UnitsStyle::Short => match field {
                CalendarField::Era => "era",
                CalendarField::Year => "yr",
                CalendarField::Month => "mo",
                CalendarField::Day => "day",
                CalendarField::Hour => "hr",
                CalendarField::Minute => "min",
                CalendarField::Second => "sec",
                CalendarField::Nanosecond => "ns",
            },
            UnitsStyle::Full => match field {
                CalendarField::Era => "era",
                CalendarField::Year => "year",
                CalendarField::Month => "month",
                CalendarField::Day => "day",
                CalendarField::Hour => "hour",
                CalendarField::Minute => "minute",
                CalendarField::Second => "second",
                CalendarField::Nanosecond => "nanosecond",
            },
        };
        let suffix = match (self, field) {
            (_, _) if !plural => "",
            (UnitsStyle::Short, CalendarField::Hour)
            | (UnitsStyle::Short, CalendarField::Minute)
            | (UnitsStyle::Short, CalendarField::Second)
            | (UnitsStyle::Short, CalendarField::Nanosecond) => "",
            _ => "s",
        };
        format!("{value} {unit}{suffix}")
    }
}

impl FromStr for UnitsStyle {
    type Err = CivilTimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "abbreviated" | "abbrev" => Ok(UnitsStyle::Abbreviated),
            "short" => Ok(UnitsStyle::Short),
            "full" => Ok(UnitsStyle::Full),
            _ => Err(CivilTimeError::ParseFailure(format!("unknown units style: {s}"))),
        }
    }
}

fn abbreviated_unit(field: CalendarField) -> &'static str {
    match field {
        CalendarField::Era => "era",
        CalendarField::Year => "y",
        CalendarField::Month => "mo",
        CalendarField::Day => "d",
        CalendarField::Hour => "h",
        CalendarField::Minute => "m",
        CalendarField::Second => "s",
        CalendarField::Nanosecond => "ns",
    }
}

// ── Integer literal units ───────────────────────────────────────────────────

/// Unit suffixes turning an integer into a single-field [`CalendarOffset`].
///
/// Weeks become days (`n * 7`) and microseconds become nanoseconds
/// (`n * 1000`); both saturate at the `i64` bounds.
pub trait CalendarUnits: Sized {
    fn years(self) -> CalendarOffset;
    fn months(self) -> CalendarOffset;
    fn weeks(self) -> CalendarOffset;
    fn days(self) -> CalendarOffset;
    fn hours(self) -> CalendarOffset;
    fn minutes(self) -> CalendarOffset;
    fn seconds(self) -> CalendarOffset;
    fn microseconds(self) -> CalendarOffset;
    fn nanoseconds(self) -> CalendarOffset;

    fn year(self) -> CalendarOffset {
        self.years()
    }

    fn month(self) -> CalendarOffset {
        self.months()
    }

    fn week(self) -> CalendarOffset {
        self.weeks()
    }

    fn day(self) -> CalendarOffset {
        self.days()
    }

    fn hour(self) -> CalendarOffset {
        self.hours()
    }

    fn minute(self) -> CalendarOffset {
        self.minutes()
    }

    fn second(self) -> CalendarOffset {
        self.seconds()
    }

    fn microsecond(self) -> CalendarOffset {
        self.microseconds()
    }

    fn nanosecond(self) -> CalendarOffset {
        self.nanoseconds()
    }
}

impl CalendarUnits for i64 {
    fn years(self) -> CalendarOffset {
        CalendarOffset::single(CalendarField::Year, self)
    }

    fn months(self) -> CalendarOffset {
        CalendarOffset::single(CalendarField::Month, self)
    }

    // saturates: `i64::MAX.weeks()` is `i64::MAX` days
    fn weeks(self) -> CalendarOffset {
        CalendarOffset::single(CalendarField::Day, self.saturating_mul(7))
    }

    fn days(self) -> CalendarOffset {
        CalendarOffset::single(CalendarField::Day, self)
    }

    fn hours(self) -> CalendarOffset {
        CalendarOffset::single(CalendarField::Hour, self)
    }

    fn minutes(self) -> CalendarOffset {
        CalendarOffset::single(CalendarField::Minute, self)
    }

    fn seconds(self) -> CalendarOffset {
        CalendarOffset::single(CalendarField::Second, self)
    }

    // saturates like `weeks`
    fn microseconds(self) -> CalendarOffset {
        CalendarOffset::single(CalendarField::Nanosecond, self.saturating_mul(1000))
    }

    fn nanoseconds(self) -> CalendarOffset {
        CalendarOffset::single(CalendarField::Nanosecond, self)
    }
}

// ── Time-of-day literals ────────────────────────────────────────────────────

fn time_literal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(1?\d|2[0-3])(\.[0-5]\d?)?$").expect("time literal pattern is valid")
    })
}

/// Half of the day a time-of-day literal refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// Build an hour/minute offset from an `H.MM` number, e.g. `9.20` → 09:20.
///
/// The number's shortest decimal rendering must match
/// `^(1?\d|2[0-3])(\.[0-5]\d?)?$`. A single fractional digit counts as tens
/// of minutes (`9.2` is 9:20). Hours 13–23 are already on the 24-hour clock
/// and ignore the meridiem.
///
/// # Errors
///
/// Returns [`CivilTimeError::InvalidTimeLiteral`] when the literal does not
/// match the pattern.
pub fn time_of_day(value: f64, meridiem: Meridiem) -> Result<CalendarOffset> {
    let literal = value.to_string();
    let caps = time_literal_pattern()
        .captures(&literal)
        .ok_or_else(|| CivilTimeError::InvalidTimeLiteral(format!("'{literal}'")))?;

    let hour: i64 = caps[1]
        .parse()
        .map_err(|_| CivilTimeError::InvalidTimeLiteral(format!("'{literal}'")))?;
    let minute: i64 = match caps.get(2) {
        Some(frac) => {
            let digits = &frac.as_str()[1..];
            let padded = format!("{digits:0<2}");
            padded
                .parse()
                .map_err(|_| CivilTimeError::InvalidTimeLiteral(format!("'{literal}'")))?
        }
        None => 0,
    };

    let hour = match (meridiem, hour) {
        (_, h) if h > 12 => h,
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, h) => h,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, h) => h + 12,
    };

    Ok(CalendarOffset {
        hour: Some(hour),
        minute: Some(minute),
        ..Default::default()
    })
}

/// `AM`/`PM` suffixes for floating-point time literals.
///
/// ```
/// use civil_time::TimeOfDayLiteral;
///
/// let t = 9.20.pm().unwrap();
/// assert_eq!((t.hour, t.minute), (Some(21), Some(20)));
/// assert!(24.0.am().is_err());
/// ```
pub trait TimeOfDayLiteral {
    fn am(self) -> Result<CalendarOffset>;
    fn pm(self) -> Result<CalendarOffset>;
}

impl TimeOfDayLiteral for f64 {
    fn am(self) -> Result<CalendarOffset> {
        time_of_day(self, Meridiem::Am)
    }

    fn pm(self) -> Result<CalendarOffset> {
        time_of_day(self, Meridiem::Pm)
    }
}
