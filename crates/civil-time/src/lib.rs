//! # civil-time
//!
//! Deterministic calendar arithmetic over civil (wall-clock) time.
//!
//! Adds and subtracts month-aware calendar offsets, computes field-wise
//! differences between instants with correct borrowing across months of
//! different lengths, and resolves "next Friday" / "last week" style
//! queries. Every instant carries the calendar (time zone and first weekday)
//! that interprets it, so no result depends on process-wide settings.
//!
//! ```
//! use civil_time::{Calendar, CalendarUnits, CivilInstant};
//!
//! let calendar = Calendar::utc().shared();
//! let jan31 = CivilInstant::from_ymd(2014, 1, 31, &calendar).unwrap();
//! let feb = jan31.add(&1.month()).unwrap();
//! assert_eq!(feb.to_string(), "2014-02-28T00:00:00+00:00");
//! ```
//!
//! ## Modules
//!
//! - [`interval`] — Elapsed-time values in seconds with unit conversions
//! - [`offset`] — Calendar offsets with optional fields, unit and time-of-day literals
//! - [`calendar`] — Calendars, weekdays, week-start and configuration
//! - [`instant`] — Instants bound to a calendar, field accessors and derived dates
//! - [`arithmetic`] — Add/subtract offsets and compute differences
//! - [`resolver`] — Next/last weekday and period, range containment
//! - [`format`] — Styled rendering and pattern/ISO 8601 parsing
//! - [`error`] — Error types

pub mod arithmetic;
pub mod calendar;
pub mod error;
pub mod format;
pub mod instant;
pub mod interval;
pub mod offset;
pub mod resolver;

pub use arithmetic::{apply, difference, Sign};
pub use calendar::{
    parse_timezone, Calendar, CalendarConfig, CalendarIdentifier, WeekStartDay, Weekday,
};
pub use error::CivilTimeError;
pub use format::{format, format_date, format_time, parse, parse_iso8601, Style};
pub use instant::{make_instant, CivilInstant};
pub use interval::{Interval, IntervalUnits};
pub use offset::{
    time_of_day, CalendarField, CalendarOffset, CalendarUnits, Meridiem, TimeOfDayLiteral,
    UnitsStyle,
};
pub use resolver::{
    between, in_range, last_period, last_weekday, next_period, next_weekday, CalendarPeriod,
};
