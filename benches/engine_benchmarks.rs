//! Performance benchmarks for the attendance engine.
//!
//! This benchmark suite verifies that the computation core meets performance targets:
//! - Single punch validation: < 50μs mean
//! - Reconstructing one month of intervals: < 500μs mean
//! - Annotating one month of intervals: < 1ms mean
//! - Monthly summary over a year of history: < 10ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{FixedOffset, NaiveDateTime, TimeDelta};
use uuid::Uuid;

use attendance_engine::calculation::{
    Granularity, PunchProposal, ValidationContext, annotate, build_intervals, summarize,
    validate_punch,
};
use attendance_engine::models::{
    BreakSpec, DayTemplate, Location, PunchAction, PunchRecord, Schedule, ScheduleSettings,
    TimeWindow,
};

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn standard_schedule() -> Schedule {
    Schedule::Uniform {
        template: DayTemplate {
            work_windows: vec![TimeWindow {
                start: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: chrono::NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            }],
            breaks: vec![BreakSpec::Flexible {
                minutes: 30,
                paid: false,
            }],
        },
    }
}

/// One full punched day (entrance, break, exit) per calendar day.
fn punch_history(user: Uuid, days: usize) -> Vec<PunchRecord> {
    let base = ts("2026-01-05 09:00:00");
    let mut punches = Vec::with_capacity(days * 4);
    for day in 0..days {
        let start = base + TimeDelta::days(day as i64);
        punches.push(PunchRecord::new(user, PunchAction::Entrance, start, None));
        punches.push(PunchRecord::new(
            user,
            PunchAction::BreakStart,
            start + TimeDelta::hours(4),
            None,
        ));
        punches.push(PunchRecord::new(
            user,
            PunchAction::BreakEnd,
            start + TimeDelta::hours(4) + TimeDelta::minutes(30),
            None,
        ));
        punches.push(PunchRecord::new(
            user,
            PunchAction::Exit,
            start + TimeDelta::hours(8) + TimeDelta::minutes(30),
            None,
        ));
    }
    punches
}

fn bench_validate_punch(c: &mut Criterion) {
    let user = Uuid::new_v4();
    let punches = punch_history(user, 1);
    let schedules = vec![standard_schedule()];
    let settings = ScheduleSettings {
        enforce_schedule: true,
        margin_minutes: 10,
    };
    let locations = vec![Location {
        name: "Headquarters".to_string(),
        latitude: 40.4168,
        longitude: -3.7038,
        radius_meters: 100.0,
    }];
    let ctx = ValidationContext {
        last_punch: punches.last(),
        punches_today: &punches,
        schedules: &schedules,
        settings: &settings,
        locations: &locations,
        utc_offset: utc(),
    };
    let proposal = PunchProposal {
        user_id: user,
        action: PunchAction::Entrance,
        timestamp: ts("2026-01-06 09:00:00"),
        coordinates: Some(
            attendance_engine::models::GeoPoint::new(40.4168, -3.7038).unwrap(),
        ),
        justification: None,
    };

    c.bench_function("validate_punch", |b| {
        b.iter(|| validate_punch(black_box(&ctx), black_box(&proposal)))
    });
}

fn bench_build_intervals_month(c: &mut Criterion) {
    let user = Uuid::new_v4();
    let punches = punch_history(user, 30);

    c.bench_function("build_intervals_month", |b| {
        b.iter(|| build_intervals(black_box(user), black_box(&punches)))
    });
}

fn bench_annotate_month(c: &mut Criterion) {
    let user = Uuid::new_v4();
    let intervals = build_intervals(user, &punch_history(user, 30));
    let schedule = standard_schedule();
    let now = ts("2026-02-10 12:00:00");

    c.bench_function("annotate_month", |b| {
        b.iter(|| {
            for interval in &intervals {
                black_box(annotate(interval, Some(&schedule), utc(), now));
            }
        })
    });
}

fn bench_summarize_scaling(c: &mut Criterion) {
    let schedule = standard_schedule();
    let now = ts("2027-02-01 12:00:00");

    let mut group = c.benchmark_group("summarize");
    for days in [30usize, 90, 365] {
        let user = Uuid::new_v4();
        let annotated: Vec<_> = build_intervals(user, &punch_history(user, days))
            .into_iter()
            .map(|i| {
                let ann = annotate(&i, Some(&schedule), utc(), now);
                (i, ann)
            })
            .collect();

        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &annotated, |b, rows| {
            b.iter(|| summarize(black_box(rows), Granularity::Month, utc()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_validate_punch,
    bench_build_intervals_month,
    bench_annotate_month,
    bench_summarize_scaling
);
criterion_main!(benches);
