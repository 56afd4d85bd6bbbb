//! Points in time paired with the calendar that interprets them.
//!
//! A [`CivilInstant`] stores an absolute UTC instant and an `Arc<Calendar>`.
//! Calendar fields (year, month, weekday, …) are never stored; every
//! accessor decomposes the instant through the calendar's time zone on
//! demand. Equality and ordering look only at the absolute instant, so two
//! instants with different calendars still compare chronologically.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::arithmetic::{apply, Sign};
use crate::calendar::{Calendar, Weekday};
use crate::error::{CivilTimeError, Result};
use crate::offset::{CalendarField, CalendarOffset};
use crate::resolver::CalendarPeriod;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// An absolute instant interpreted through a shared calendar.
#[derive(Debug, Clone)]
pub struct CivilInstant {
    utc: DateTime<Utc>,
    calendar: Arc<Calendar>,
}

/// Wall-clock fields of an instant under its calendar, with a proleptic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Components {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nanosecond: u32,
}

impl Components {
    pub(crate) fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// Build an instant from calendar fields.
///
/// `era` follows the Gregorian convention: `0` is BCE, `1` is CE, and `year`
/// is then the year within that era (`>= 1`). Without an era, `year` is the
/// proleptic year (`0` is 1 BCE). The local wall-clock time is resolved in
/// the calendar's time zone; a time repeated by a DST fold resolves to the
/// earlier instant.
///
/// # Errors
///
/// Returns [`CivilTimeError::InvalidDate`] when the fields do not name a real
/// point in time: month 13, February 30, hour 24, an unknown era, or a local
/// time skipped by a DST transition. Nothing is normalized.
///
/// # Examples
///
/// ```
/// use civil_time::{make_instant, Calendar, CivilTimeError};
///
/// let calendar = Calendar::utc().shared();
/// let ok = make_instant(None, 2014, 8, 14, 20, 25, 43, 0, &calendar).unwrap();
/// assert_eq!(ok.to_string(), "2014-08-14T20:25:43+00:00");
///
/// let err = make_instant(None, 2014, 2, 30, 0, 0, 0, 0, &calendar).unwrap_err();
/// assert!(matches!(err, CivilTimeError::InvalidDate(_)));
/// ```
#[allow(clippy::too_many_arguments)]
pub fn make_instant(
    era: Option<i64>,
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
    nanosecond: i64,
    calendar: &Arc<Calendar>,
) -> Result<CivilInstant> {
    let proleptic_year = match era {
        None => year,
        Some(_) if year < 1 => {
            return Err(CivilTimeError::InvalidDate(format!(
                "year of era must be at least 1, got {year}"
            )));
        }
        Some(0) => 1 - year,
        Some(1) => year,
        Some(other) => {
            return Err(CivilTimeError::InvalidDate(format!(
                "era {other} does not exist in the {} calendar",
                calendar.identifier()
            )));
        }
    };

    let invalid = || {
        CivilTimeError::InvalidDate(format!(
            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{nanosecond:09} (era {era:?})"
        ))
    };
    let narrow = |v: i64| u32::try_from(v).map_err(|_| invalid());

    let y = i32::try_from(proleptic_year).map_err(|_| invalid())?;
    let date = NaiveDate::from_ymd_opt(y, narrow(month)?, narrow(day)?).ok_or_else(invalid)?;

    let nanos = narrow(nanosecond)?;
    if nanos >= NANOS_PER_SECOND {
        return Err(invalid());
    }
    let time = NaiveTime::from_hms_nano_opt(narrow(hour)?, narrow(minute)?, narrow(second)?, nanos)
        .ok_or_else(invalid)?;

    let local = date.and_time(time);
    let resolved = calendar.resolve_local(&local).ok_or_else(|| {
        CivilTimeError::InvalidDate(format!(
            "{local} does not exist in {} (skipped by a DST transition)",
            calendar.time_zone().name()
        ))
    })?;

    Ok(CivilInstant::new(resolved.with_timezone(&Utc), calendar))
}

impl CivilInstant {
    pub fn new(utc: DateTime<Utc>, calendar: &Arc<Calendar>) -> Self {
        Self {
            utc,
            calendar: Arc::clone(calendar),
        }
    }

    /// Midnight at the start of the given proleptic date.
    pub fn from_ymd(year: i64, month: i64, day: i64, calendar: &Arc<Calendar>) -> Result<Self> {
        make_instant(None, year, month, day, 0, 0, 0, 0, calendar)
    }

    pub fn from_ymd_hms(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
        calendar: &Arc<Calendar>,
    ) -> Result<Self> {
        make_instant(None, year, month, day, hour, minute, second, 0, calendar)
    }

    /// The current instant, read from the system clock.
    pub fn now(calendar: &Arc<Calendar>) -> Self {
        Self::new(Utc::now(), calendar)
    }

    /// Start of today in the calendar's time zone.
    pub fn today(calendar: &Arc<Calendar>) -> Result<Self> {
        Self::now(calendar).start_of_day()
    }

    /// Start of yesterday in the calendar's time zone.
    pub fn yesterday(calendar: &Arc<Calendar>) -> Result<Self> {
        let now = Self::now(calendar);
        let date = now.local().date_naive().pred_opt().ok_or_else(|| {
            CivilTimeError::InvalidResult("yesterday is before the first supported date".into())
        })?;
        now.day_start(date)
    }

    /// Start of tomorrow in the calendar's time zone.
    pub fn tomorrow(calendar: &Arc<Calendar>) -> Result<Self> {
        let now = Self::now(calendar);
        let date = now.local().date_naive().succ_opt().ok_or_else(|| {
            CivilTimeError::InvalidResult("tomorrow is after the last supported date".into())
        })?;
        now.day_start(date)
    }

    pub fn as_utc(&self) -> DateTime<Utc> {
        self.utc
    }

    pub fn calendar(&self) -> &Arc<Calendar> {
        &self.calendar
    }

    /// The same instant expressed in the calendar's time zone.
    pub fn local(&self) -> DateTime<Tz> {
        self.utc.with_timezone(&self.calendar.time_zone())
    }

    /// The same instant interpreted through another calendar.
    pub fn with_calendar(&self, calendar: &Arc<Calendar>) -> Self {
        Self::new(self.utc, calendar)
    }

    pub(crate) fn with_utc(&self, utc: DateTime<Utc>) -> Self {
        Self::new(utc, &self.calendar)
    }

    pub(crate) fn components(&self) -> Result<Components> {
        let local = self.local();
        Ok(Components {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
            nanosecond: checked_nanosecond(local.nanosecond(), &local)?,
        })
    }

    // ── Field accessors ─────────────────────────────────────────────────

    /// `0` for BCE, `1` for CE.
    pub fn era(&self) -> Result<i64> {
        let (is_ce, _) = self.local().year_ce();
        Ok(i64::from(is_ce))
    }

    /// The year within the era (always `>= 1`).
    pub fn year(&self) -> Result<i64> {
        let (_, year) = self.local().year_ce();
        Ok(i64::from(year))
    }

    pub fn month(&self) -> Result<i64> {
        Ok(i64::from(self.local().month()))
    }

    pub fn day(&self) -> Result<i64> {
        Ok(i64::from(self.local().day()))
    }

    pub fn hour(&self) -> Result<i64> {
        Ok(i64::from(self.local().hour()))
    }

    pub fn minute(&self) -> Result<i64> {
        Ok(i64::from(self.local().minute()))
    }

    pub fn second(&self) -> Result<i64> {
        Ok(i64::from(self.local().second()))
    }

    /// Fails with [`CivilTimeError::UnrepresentableField`] during a leap
    /// second, which has no Gregorian nanosecond value.
    pub fn nanosecond(&self) -> Result<i64> {
        let local = self.local();
        checked_nanosecond(local.nanosecond(), &local).map(i64::from)
    }

    pub fn weekday(&self) -> Result<Weekday> {
        Ok(Weekday::from(self.local().weekday()))
    }

    /// True when both instants fall in the same bucket of every field from
    /// the era down to `period` under this instant's calendar.
    pub fn field_eq(&self, other: &CivilInstant, period: CalendarPeriod) -> Result<bool> {
        let other = other.with_calendar(&self.calendar);
        let (a, b) = (self.components()?, other.components()?);
        let same = match period {
            CalendarPeriod::Era => (a.year > 0) == (b.year > 0),
            CalendarPeriod::Year => a.year == b.year,
            CalendarPeriod::Month => (a.year, a.month) == (b.year, b.month),
            CalendarPeriod::Week => {
                let ws = self.calendar.week_start();
                let start = |c: &Components, i: &CivilInstant| -> Result<Option<NaiveDate>> {
                    let back = ws.days_from_start(i.weekday()?);
                    Ok(c.date().and_then(|d| d.checked_sub_days(chrono::Days::new(back as u64))))
                };
                start(&a, self)? == start(&b, &other)?
            }
            CalendarPeriod::Day | CalendarPeriod::Weekday => a.date() == b.date(),
            CalendarPeriod::Hour => (a.date(), a.hour) == (b.date(), b.hour),
            CalendarPeriod::Minute => {
                (a.date(), a.hour, a.minute) == (b.date(), b.hour, b.minute)
            }
            CalendarPeriod::Second => {
                (a.date(), a.hour, a.minute, a.second) == (b.date(), b.hour, b.minute, b.second)
            }
            CalendarPeriod::Nanosecond => a == b,
        };
        Ok(same)
    }

    // ── Derived instants ────────────────────────────────────────────────

    /// Replace every set field of `fields` with its value, keeping the rest.
    ///
    /// Values are absolute (`day: Some(1)` means "the 1st"), and the era and
    /// year follow [`make_instant`]'s era convention.
    ///
    /// # Errors
    ///
    /// Returns [`CivilTimeError::InvalidDate`] if the result is not a real
    /// date; February 30 is never rolled into March.
    pub fn changed(&self, fields: &CalendarOffset) -> Result<Self> {
        let current = self.components()?;
        let era = fields.era.unwrap_or(self.era()?);
        let year = fields.year.unwrap_or(self.year()?);
        make_instant(
            Some(era),
            year,
            fields.month.unwrap_or(i64::from(current.month)),
            fields.day.unwrap_or(i64::from(current.day)),
            fields.hour.unwrap_or(i64::from(current.hour)),
            fields.minute.unwrap_or(i64::from(current.minute)),
            fields.second.unwrap_or(i64::from(current.second)),
            fields.nanosecond.unwrap_or(i64::from(current.nanosecond)),
            &self.calendar,
        )
    }

    /// The first instant of the same calendar date.
    ///
    /// This is local midnight, except on days where a DST transition skips
    /// midnight (America/Havana, America/Santiago, …); the day then starts
    /// where the gap ends.
    pub fn start_of_day(&self) -> Result<Self> {
        self.day_start(self.local().date_naive())
    }

    /// The first instant of `date` in this instant's calendar.
    fn day_start(&self, date: NaiveDate) -> Result<Self> {
        let tz = self.calendar.time_zone();
        let midnight = date.and_time(NaiveTime::default());
        let start = match self.calendar.resolve_local(&midnight) {
            Some(local) => local.with_timezone(&Utc),
            None => first_instant_of(date, tz).ok_or_else(|| {
                CivilTimeError::InvalidDate(format!("{date} has no start in {}", tz.name()))
            })?,
        };
        Ok(self.with_utc(start))
    }

    /// The same date at the hour and minute of `time` (unset fields are 0),
    /// with seconds cleared.
    ///
    /// ```
    /// use civil_time::{Calendar, CivilInstant, TimeOfDayLiteral};
    ///
    /// let calendar = Calendar::utc().shared();
    /// let day = CivilInstant::from_ymd(2026, 2, 20, &calendar).unwrap();
    /// let at = day.at(&9.20.am().unwrap()).unwrap();
    /// assert_eq!(at.to_string(), "2026-02-20T09:20:00+00:00");
    /// ```
    pub fn at(&self, time: &CalendarOffset) -> Result<Self> {
        self.changed(&CalendarOffset {
            hour: Some(time.hour.unwrap_or(0)),
            minute: Some(time.minute.unwrap_or(0)),
            second: Some(0),
            nanosecond: Some(0),
            ..Default::default()
        })
    }

    /// Move to `weekday` within the same week, keeping the time of day.
    /// Weeks begin on the calendar's configured first day.
    pub fn with_weekday(&self, weekday: Weekday) -> Result<Self> {
        let ws = self.calendar.week_start();
        let delta = ws.days_from_start(weekday) - ws.days_from_start(self.weekday()?);
        if delta == 0 {
            return Ok(self.clone());
        }
        apply(self, &CalendarOffset::single(CalendarField::Day, delta), Sign::Plus)
    }

    /// Reset each listed field to its minimum: months and days to 1, time
    /// fields to 0. Other periods are ignored.
    pub fn truncated(&self, periods: &[CalendarPeriod]) -> Result<Self> {
        let mut reset = CalendarOffset::new();
        for period in periods {
            match period {
                CalendarPeriod::Month => reset.month = Some(1),
                CalendarPeriod::Day => reset.day = Some(1),
                CalendarPeriod::Hour => reset.hour = Some(0),
                CalendarPeriod::Minute => reset.minute = Some(0),
                CalendarPeriod::Second => reset.second = Some(0),
                CalendarPeriod::Nanosecond => reset.nanosecond = Some(0),
                _ => {}
            }
        }
        if reset.is_empty() {
            return Ok(self.clone());
        }
        self.changed(&reset)
    }

    /// Reset every field finer than `period`: the start of the enclosing
    /// year, month, week, day, hour, minute or second.
    pub fn truncated_from(&self, period: CalendarPeriod) -> Result<Self> {
        use CalendarPeriod as P;
        let finer: &[CalendarPeriod] = match period {
            P::Era => {
                return self.changed(&CalendarOffset {
                    year: Some(1),
                    month: Some(1),
                    day: Some(1),
                    hour: Some(0),
                    minute: Some(0),
                    second: Some(0),
                    nanosecond: Some(0),
                    ..Default::default()
                });
            }
            P::Year | P::Month | P::Week | P::Day | P::Weekday => {
                let date = self.local().date_naive();
                let first = match period {
                    P::Year => date.with_month(1).and_then(|d| d.with_day(1)),
                    P::Month => date.with_day(1),
                    P::Week => {
                        let back = self.calendar.week_start().days_from_start(self.weekday()?);
                        date.checked_sub_days(Days::new(back.unsigned_abs()))
                    }
                    _ => Some(date),
                };
                let first = first.ok_or_else(|| {
                    CivilTimeError::InvalidResult(format!("no {period} start for {date}"))
                })?;
                return self.day_start(first);
            }
            P::Hour => &[P::Minute, P::Second, P::Nanosecond],
            P::Minute => &[P::Second, P::Nanosecond],
            P::Second => &[P::Nanosecond],
            P::Nanosecond => &[],
        };
        self.truncated(finer)
    }

    // ── Arithmetic shorthands ───────────────────────────────────────────

    /// `self + offset`.
    pub fn add(&self, offset: &CalendarOffset) -> Result<Self> {
        apply(self, offset, Sign::Plus)
    }

    /// `self - offset`.
    pub fn subtract(&self, offset: &CalendarOffset) -> Result<Self> {
        apply(self, offset, Sign::Minus)
    }

    /// `self - other` as calendar fields.
    pub fn difference(&self, other: &CivilInstant) -> Result<CalendarOffset> {
        crate::arithmetic::difference(self, other)
    }
}

fn checked_nanosecond(nanos: u32, local: &DateTime<Tz>) -> Result<u32> {
    if nanos >= NANOS_PER_SECOND {
        return Err(CivilTimeError::UnrepresentableField(format!(
            "nanosecond of {} falls in a leap second",
            local.to_rfc3339()
        )));
    }
    Ok(nanos)
}

/// Earliest whole-second instant whose local date in `tz` is `date`.
///
/// Only used when local midnight falls in a DST gap. UTC offsets stay within
/// a day, so the search window brackets the answer, and the local date does
/// not step backwards across a forward gap.
fn first_instant_of(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::default()).and_utc().timestamp();
    let (mut lo, mut hi) = (midnight - 86_400, midnight + 86_400);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let local = DateTime::from_timestamp(mid, 0)?.with_timezone(&tz).date_naive();
        if local >= date {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    DateTime::from_timestamp(lo, 0)
}

impl PartialEq for CivilInstant {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl Eq for CivilInstant {}

impl PartialOrd for CivilInstant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CivilInstant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc.cmp(&other.utc)
    }
}

impl Hash for CivilInstant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.utc.hash(state);
    }
}

impl fmt::Display for CivilInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.local().to_rfc3339())
    }
}

impl Serialize for CivilInstant {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CivilInstant", 4)?;
        state.serialize_field("utc", &self.utc.to_rfc3339())?;
        state.serialize_field("local", &self.local().to_rfc3339())?;
        state.serialize_field("calendar", self.calendar.identifier().as_str())?;
        state.serialize_field("timezone", self.calendar.time_zone().name())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CalendarIdentifier, WeekStartDay};
    use chrono::TimeZone;

    fn utc() -> Arc<Calendar> {
        Calendar::utc().shared()
    }

    #[test]
    fn test_make_instant_fields_round_trip() {
        let calendar = utc();
        let dt = make_instant(None, 2014, 8, 14, 20, 25, 43, 500, &calendar).unwrap();
        assert_eq!(dt.era().unwrap(), 1);
        assert_eq!(dt.year().unwrap(), 2014);
        assert_eq!(dt.month().unwrap(), 8);
        assert_eq!(dt.day().unwrap(), 14);
        assert_eq!(dt.hour().unwrap(), 20);
        assert_eq!(dt.minute().unwrap(), 25);
        assert_eq!(dt.second().unwrap(), 43);
        assert_eq!(dt.nanosecond().unwrap(), 500);
        // August 14, 2014 was a Thursday
        assert_eq!(dt.weekday().unwrap(), Weekday::Thursday);
    }

    #[test]
    fn test_make_instant_rejects_february_30() {
        let err = make_instant(None, 2014, 2, 30, 0, 0, 0, 0, &utc()).unwrap_err();
        assert!(matches!(err, CivilTimeError::InvalidDate(_)), "got: {err:?}");
    }

    #[test]
    fn test_make_instant_rejects_out_of_range_fields() {
        let calendar = utc();
        for (month, day, hour, minute, second, nano) in [
            (13, 1, 0, 0, 0, 0),
            (0, 1, 0, 0, 0, 0),
            (1, 0, 0, 0, 0, 0),
            (1, 32, 0, 0, 0, 0),
            (1, 1, 24, 0, 0, 0),
            (1, 1, 0, 60, 0, 0),
            (1, 1, 0, 0, 60, 0),
            (1, 1, 0, 0, 0, 1_000_000_000),
            (1, 1, -1, 0, 0, 0),
        ] {
            let result = make_instant(None, 2014, month, day, hour, minute, second, nano, &calendar);
            assert!(
                matches!(result, Err(CivilTimeError::InvalidDate(_))),
                "{month}/{day} {hour}:{minute}:{second}.{nano} -> {result:?}"
            );
        }
    }

    #[test]
    fn test_make_instant_leap_day() {
        assert!(CivilInstant::from_ymd(2016, 2, 29, &utc()).is_ok());
        assert!(CivilInstant::from_ymd(2014, 2, 29, &utc()).is_err());
    }

    #[test]
    fn test_make_instant_eras() {
        let calendar = utc();
        let bce = make_instant(Some(0), 44, 3, 15, 0, 0, 0, 0, &calendar).unwrap();
        assert_eq!(bce.era().unwrap(), 0);
        assert_eq!(bce.year().unwrap(), 44);
        assert_eq!(bce.local().year(), -43);

        let ce = make_instant(Some(1), 2014, 1, 1, 0, 0, 0, 0, &calendar).unwrap();
        assert_eq!(ce, CivilInstant::from_ymd(2014, 1, 1, &calendar).unwrap());

        assert!(make_instant(Some(2), 2014, 1, 1, 0, 0, 0, 0, &calendar).is_err());
        assert!(make_instant(Some(1), 0, 1, 1, 0, 0, 0, 0, &calendar).is_err());
    }

    #[test]
    fn test_make_instant_dst_gap_is_invalid() {
        let ny = Calendar::gregorian(chrono_tz::America::New_York).shared();
        // March 8, 2026: 02:00 → 03:00 in New York
        let err = make_instant(None, 2026, 3, 8, 2, 30, 0, 0, &ny).unwrap_err();
        assert!(matches!(err, CivilTimeError::InvalidDate(_)));
        assert!(make_instant(None, 2026, 3, 8, 3, 30, 0, 0, &ny).is_ok());
    }

    #[test]
    fn test_make_instant_dst_fold_takes_earlier() {
        let ny = Calendar::gregorian(chrono_tz::America::New_York).shared();
        // November 1, 2026: 01:30 happens twice; the first is EDT (UTC-4)
        let dt = make_instant(None, 2026, 11, 1, 1, 30, 0, 0, &ny).unwrap();
        assert_eq!(dt.as_utc(), Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap());
    }

    #[test]
    fn test_fields_follow_calendar_time_zone() {
        let tokyo = Calendar::gregorian(chrono_tz::Asia::Tokyo).shared();
        let utc_instant = Utc.with_ymd_and_hms(2026, 3, 15, 20, 0, 0).unwrap();
        let dt = CivilInstant::new(utc_instant, &tokyo);
        assert_eq!(dt.day().unwrap(), 16);
        assert_eq!(dt.hour().unwrap(), 5);
        assert_eq!(dt.with_calendar(&utc()).day().unwrap(), 15);
    }

    #[test]
    fn test_equality_ignores_calendar() {
        let tokyo = Calendar::gregorian(chrono_tz::Asia::Tokyo).shared();
        let a = CivilInstant::from_ymd_hms(2026, 1, 1, 0, 0, 0, &utc()).unwrap();
        let b = a.with_calendar(&tokyo);
        assert_eq!(a, b);
        let later = CivilInstant::from_ymd_hms(2026, 1, 1, 0, 0, 1, &tokyo).unwrap();
        assert!(later < a);
    }

    #[test]
    fn test_leap_second_nanosecond_is_unrepresentable() {
        let leap = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 1_500_000_000)
            .unwrap()
            .and_utc();
        let dt = CivilInstant::new(leap, &utc());
        let err = dt.nanosecond().unwrap_err();
        assert!(matches!(err, CivilTimeError::UnrepresentableField(_)));
        assert_eq!(dt.second().unwrap(), 59);
    }

    #[test]
    fn test_field_eq_buckets() {
        let calendar = utc();
        let a = CivilInstant::from_ymd_hms(2026, 2, 18, 9, 0, 0, &calendar).unwrap();
        let b = CivilInstant::from_ymd_hms(2026, 2, 18, 23, 59, 59, &calendar).unwrap();
        assert!(a.field_eq(&b, CalendarPeriod::Day).unwrap());
        assert!(!a.field_eq(&b, CalendarPeriod::Hour).unwrap());
        assert!(a.field_eq(&b, CalendarPeriod::Month).unwrap());

        // Sunday Feb 15 and Saturday Feb 21 share a Sunday-start week
        let sun = CivilInstant::from_ymd(2026, 2, 15, &calendar).unwrap();
        let sat = CivilInstant::from_ymd(2026, 2, 21, &calendar).unwrap();
        assert!(sun.field_eq(&sat, CalendarPeriod::Week).unwrap());
        let next_sun = CivilInstant::from_ymd(2026, 2, 22, &calendar).unwrap();
        assert!(!sat.field_eq(&next_sun, CalendarPeriod::Week).unwrap());
    }

    #[test]
    fn test_changed_sets_absolute_fields() {
        let calendar = utc();
        let dt = CivilInstant::from_ymd_hms(2026, 2, 18, 14, 30, 0, &calendar).unwrap();
        let changed = dt
            .changed(&CalendarOffset {
                year: Some(2014),
                day: Some(1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(changed.to_string(), "2014-02-01T14:30:00+00:00");
    }

    #[test]
    fn test_changed_does_not_normalize() {
        let dt = CivilInstant::from_ymd(2026, 2, 18, &utc()).unwrap();
        let err = dt
            .changed(&CalendarOffset {
                day: Some(30),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CivilTimeError::InvalidDate(_)));
    }

    #[test]
    fn test_at_sets_time_of_day() {
        let dt = CivilInstant::from_ymd_hms(2026, 2, 20, 17, 45, 12, &utc()).unwrap();
        let at = dt
            .at(&CalendarOffset {
                hour: Some(5),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(at.to_string(), "2026-02-20T05:00:00+00:00");
    }

    #[test]
    fn test_with_weekday_stays_in_week() {
        let calendar = utc();
        // Wednesday Feb 18, 2026
        let wed = CivilInstant::from_ymd_hms(2026, 2, 18, 10, 0, 0, &calendar).unwrap();
        let sun = wed.with_weekday(Weekday::Sunday).unwrap();
        assert_eq!(sun.to_string(), "2026-02-15T10:00:00+00:00");
        let sat = wed.with_weekday(Weekday::Saturday).unwrap();
        assert_eq!(sat.to_string(), "2026-02-21T10:00:00+00:00");

        let monday_weeks = Calendar::new(
            CalendarIdentifier::Iso8601,
            chrono_tz::UTC,
            WeekStartDay::Monday,
        )
        .shared();
        let sun = wed.with_calendar(&monday_weeks).with_weekday(Weekday::Sunday).unwrap();
        assert_eq!(sun.to_string(), "2026-02-22T10:00:00+00:00");
    }

    #[test]
    fn test_truncated_listed_fields() {
        let dt = make_instant(None, 2026, 2, 18, 14, 30, 15, 999, &utc()).unwrap();
        let t = dt
            .truncated(&[CalendarPeriod::Minute, CalendarPeriod::Second, CalendarPeriod::Nanosecond])
            .unwrap();
        assert_eq!(t.to_string(), "2026-02-18T14:00:00+00:00");
        assert_eq!(dt.truncated(&[CalendarPeriod::Year]).unwrap(), dt);
    }

    #[test]
    fn test_truncated_from_periods() {
        let calendar = utc();
        let dt = make_instant(None, 2026, 2, 18, 14, 30, 15, 999, &calendar).unwrap();
        let cases = [
            (CalendarPeriod::Year, "2026-01-01T00:00:00+00:00"),
            (CalendarPeriod::Month, "2026-02-01T00:00:00+00:00"),
            (CalendarPeriod::Week, "2026-02-15T00:00:00+00:00"),
            (CalendarPeriod::Day, "2026-02-18T00:00:00+00:00"),
            (CalendarPeriod::Hour, "2026-02-18T14:00:00+00:00"),
            (CalendarPeriod::Minute, "2026-02-18T14:30:00+00:00"),
            (CalendarPeriod::Era, "0001-01-01T00:00:00+00:00"),
        ];
        for (period, expected) in cases {
            assert_eq!(dt.truncated_from(period).unwrap().to_string(), expected, "{period:?}");
        }
        assert_eq!(dt.truncated_from(CalendarPeriod::Second).unwrap().nanosecond().unwrap(), 0);
    }

    #[test]
    fn test_anchors_are_midnight() {
        let calendar = utc();
        let today = CivilInstant::today(&calendar).unwrap();
        assert_eq!(today.hour().unwrap(), 0);
        assert_eq!(today.minute().unwrap(), 0);
        let yesterday = CivilInstant::yesterday(&calendar).unwrap();
        let tomorrow = CivilInstant::tomorrow(&calendar).unwrap();
        assert!(yesterday < today && today < tomorrow);
        assert_eq!(today.difference(&yesterday).unwrap().day, Some(1));
        assert_eq!(tomorrow.hour().unwrap(), 0);
    }

    #[test]
    fn test_start_of_day_when_dst_skips_midnight() {
        let havana = Calendar::gregorian(chrono_tz::America::Havana).shared();
        // March 8, 2026: Havana jumps from 00:00 CST straight to 01:00 CDT
        let noon = make_instant(None, 2026, 3, 8, 12, 0, 0, 0, &havana).unwrap();
        let start = noon.start_of_day().unwrap();
        assert_eq!(start.as_utc(), Utc.with_ymd_and_hms(2026, 3, 8, 5, 0, 0).unwrap());
        assert_eq!(start.day().unwrap(), 8);
        assert_eq!(start.hour().unwrap(), 1);
        assert_eq!(noon.truncated_from(CalendarPeriod::Day).unwrap(), start);
        // midnight itself stays strict
        assert!(make_instant(None, 2026, 3, 8, 0, 0, 0, 0, &havana).is_err());
    }

    #[test]
    fn test_truncated_from_week_lands_on_gap_day() {
        let havana = Calendar::new(
            CalendarIdentifier::Gregorian,
            chrono_tz::America::Havana,
            WeekStartDay::Sunday,
        )
        .shared();
        let wed = make_instant(None, 2026, 3, 11, 9, 0, 0, 0, &havana).unwrap();
        let week = wed.truncated_from(CalendarPeriod::Week).unwrap();
        assert_eq!(week.to_string(), "2026-03-08T01:00:00-04:00");
        let day_before = make_instant(None, 2026, 3, 7, 18, 0, 0, 0, &havana).unwrap();
        assert_eq!(day_before.start_of_day().unwrap().to_string(), "2026-03-07T00:00:00-05:00");
    }

    #[test]
    fn test_serialize_instant() {
        let dt = CivilInstant::from_ymd(2026, 2, 18, &utc()).unwrap();
        let json = serde_json::to_value(&dt).unwrap();
        assert_eq!(json["utc"], "2026-02-18T00:00:00+00:00");
        assert_eq!(json["calendar"], "gregorian");
        assert_eq!(json["timezone"], "UTC");
    }
}
