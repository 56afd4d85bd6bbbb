//! Property tests for calendar arithmetic and weekday resolution.

use std::sync::Arc;

use civil_time::{
    apply, between, difference, last_weekday, make_instant, next_weekday, Calendar,
    CalendarOffset, CivilInstant, Sign, Weekday,
};
use proptest::prelude::*;

fn utc() -> Arc<Calendar> {
    Calendar::utc().shared()
}

/// Any valid UTC instant between 1900 and 2100, month ends included.
fn instant() -> impl Strategy<Value = CivilInstant> {
    (
        1900i64..2100,
        1i64..=12,
        1i64..=31,
        0i64..24,
        0i64..60,
        0i64..60,
        0i64..1_000_000_000,
    )
        .prop_filter_map("not a real date", |(y, mo, d, h, mi, s, ns)| {
            make_instant(None, y, mo, d, h, mi, s, ns, &utc()).ok()
        })
}

fn weekday() -> impl Strategy<Value = Weekday> {
    (1u32..=7).prop_map(|o| Weekday::from_ordinal(o).unwrap())
}

proptest! {
    #[test]
    fn difference_then_apply_round_trips(a in instant(), b in instant()) {
        let d = difference(&a, &b).unwrap();
        prop_assert_eq!(apply(&b, &d, Sign::Plus).unwrap(), a);
    }

    #[test]
    fn difference_fields_share_one_sign(a in instant(), b in instant()) {
        let d = difference(&a, &b).unwrap();
        let values: Vec<i64> = d.fields().map(|(_, v)| v).collect();
        prop_assert_eq!(values.len(), 8);
        let positive = values.iter().all(|v| *v >= 0);
        let negative = values.iter().all(|v| *v <= 0);
        prop_assert!(positive || negative, "mixed signs: {:?}", d);
        prop_assert_eq!(positive, a >= b);
    }

    #[test]
    fn day_and_time_offsets_invert(
        x in instant(),
        days in -5000i64..5000,
        hours in -100i64..100,
        minutes in -1000i64..1000,
        seconds in -100_000i64..100_000,
    ) {
        let offset = CalendarOffset {
            day: Some(days),
            hour: Some(hours),
            minute: Some(minutes),
            second: Some(seconds),
            ..Default::default()
        };
        let there = apply(&x, &offset, Sign::Plus).unwrap();
        prop_assert_eq!(apply(&there, &offset, Sign::Minus).unwrap(), x);
    }

    #[test]
    fn month_offsets_invert_below_day_29(
        x in instant().prop_filter("month end clamps", |x| x.day().unwrap() <= 28),
        years in -50i64..50,
        months in -600i64..600,
    ) {
        let offset = CalendarOffset {
            year: Some(years),
            month: Some(months),
            ..Default::default()
        };
        let there = apply(&x, &offset, Sign::Plus).unwrap();
        prop_assert_eq!(there.day().unwrap(), x.day().unwrap());
        prop_assert_eq!(apply(&there, &offset, Sign::Minus).unwrap(), x);
    }

    #[test]
    fn between_ignores_bound_order(x in instant(), low in instant(), high in instant()) {
        prop_assert_eq!(between(&x, &low, &high), between(&x, &high, &low));
    }

    #[test]
    fn next_weekday_is_within_six_days(reference in instant(), target in weekday()) {
        let next = next_weekday(target, &reference).unwrap();
        prop_assert_eq!(next.weekday().unwrap(), target);
        prop_assert!(next >= reference);
        let days = difference(&next, &reference).unwrap().day.unwrap();
        prop_assert!((0..7).contains(&days), "delta {days}");
        prop_assert_eq!(days == 0, reference.weekday().unwrap() == target);
    }

    #[test]
    fn last_weekday_is_within_six_days(reference in instant(), target in weekday()) {
        let last = last_weekday(target, &reference).unwrap();
        prop_assert_eq!(last.weekday().unwrap(), target);
        prop_assert!(last <= reference);
        let days = difference(&last, &reference).unwrap().day.unwrap();
        prop_assert!((-6..=0).contains(&days), "delta {days}");
    }
}
