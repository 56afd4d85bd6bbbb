use std::hint::black_box as bb;

use criterion::{criterion_group, criterion_main, Criterion};

use civil_time::{
    apply, difference, next_period, next_weekday, Calendar, CalendarPeriod, CalendarUnits,
    CivilInstant, Sign, Weekday,
};

fn apply_offsets(c: &mut Criterion) {
    let utc = Calendar::utc().shared();
    let ny = Calendar::gregorian(chrono_tz::America::New_York).shared();
    let jan31 = CivilInstant::from_ymd_hms(2016, 1, 31, 12, 0, 0, &utc).unwrap();
    let jan31_ny = jan31.with_calendar(&ny);
    let compound = 1.year() + 2.months() + 3.days() + 4.hours();

    c.bench_function("apply/month/utc", |b| {
        b.iter(|| apply(bb(&jan31), bb(&1.month()), Sign::Plus).unwrap())
    });
    c.bench_function("apply/compound/utc", |b| {
        b.iter(|| apply(bb(&jan31), bb(&compound), Sign::Plus).unwrap())
    });
    c.bench_function("apply/compound/new_york", |b| {
        b.iter(|| apply(bb(&jan31_ny), bb(&compound), Sign::Minus).unwrap())
    });
}

fn differences(c: &mut Criterion) {
    let utc = Calendar::utc().shared();
    let a = CivilInstant::from_ymd_hms(2016, 8, 14, 20, 25, 43, &utc).unwrap();
    let b = CivilInstant::from_ymd_hms(2014, 2, 20, 8, 0, 0, &utc).unwrap();

    c.bench_function("difference/forward", |bench| {
        bench.iter(|| difference(bb(&a), bb(&b)).unwrap())
    });
    c.bench_function("difference/backward", |bench| {
        bench.iter(|| difference(bb(&b), bb(&a)).unwrap())
    });
}

fn resolution(c: &mut Criterion) {
    let utc = Calendar::utc().shared();
    let wed = CivilInstant::from_ymd(2026, 2, 18, &utc).unwrap();

    c.bench_function("resolve/next_weekday", |b| {
        b.iter(|| next_weekday(bb(Weekday::Friday), bb(&wed)).unwrap())
    });
    c.bench_function("resolve/next_period/month", |b| {
        b.iter(|| next_period(bb(CalendarPeriod::Month), bb(&wed)).unwrap())
    });
}

criterion_group!(benches, apply_offsets, differences, resolution);
criterion_main!(benches);
