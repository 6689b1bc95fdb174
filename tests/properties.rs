//! Property-based tests for interval reconstruction and annotation.
//!
//! Sequences are generated as legal state-machine walks, mirroring what
//! the validator admits at write time; reconstruction over them must be
//! clean, ordered and conservative.

use chrono::{FixedOffset, NaiveDateTime, TimeDelta};
use proptest::prelude::*;
use uuid::Uuid;

use attendance_engine::calculation::{
    Granularity, annotate, build_intervals, haversine_distance_m, summarize,
};
use attendance_engine::models::{GeoPoint, PunchAction, PunchRecord};

fn base() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2026-03-02 06:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Expands choice seeds into a legal punch sequence for one user.
fn well_formed(user: Uuid, seeds: &[(u8, i64)]) -> Vec<PunchRecord> {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Idle,
        Working,
        OnBreak,
    }

    let mut state = State::Idle;
    let mut at = base();
    let mut punches = Vec::with_capacity(seeds.len());
    for &(choice, gap_minutes) in seeds {
        at += TimeDelta::minutes(gap_minutes);
        let action = match state {
            State::Idle => PunchAction::Entrance,
            State::Working => {
                if choice % 2 == 0 {
                    PunchAction::Exit
                } else {
                    PunchAction::BreakStart
                }
            }
            State::OnBreak => PunchAction::BreakEnd,
        };
        state = match action {
            PunchAction::Entrance | PunchAction::BreakEnd => State::Working,
            PunchAction::BreakStart => State::OnBreak,
            PunchAction::Exit => State::Idle,
        };
        punches.push(PunchRecord::new(user, action, at, None));
    }
    punches
}

fn seed_strategy() -> impl Strategy<Value = Vec<(u8, i64)>> {
    prop::collection::vec((0u8..4, 1i64..180), 0..48)
}

proptest! {
    /// Well-formed sequences reconstruct without anomalies, every closed
    /// interval is ordered, and break segments stay inside it.
    #[test]
    fn reconstruction_is_clean(seeds in seed_strategy()) {
        let user = Uuid::new_v4();
        let punches = well_formed(user, &seeds);
        let intervals = build_intervals(user, &punches);

        for interval in &intervals {
            prop_assert!(interval.anomalies.is_empty());
            if let Some(exit) = interval.exit {
                prop_assert!(interval.entrance <= exit);
                for segment in &interval.breaks {
                    prop_assert!(interval.entrance <= segment.start);
                    let end = segment.end.expect("closed interval has closed breaks");
                    prop_assert!(end <= exit);
                }
            }
        }
    }

    /// At most one interval is open, and only at the end.
    #[test]
    fn at_most_one_trailing_open_interval(seeds in seed_strategy()) {
        let user = Uuid::new_v4();
        let punches = well_formed(user, &seeds);
        let intervals = build_intervals(user, &punches);

        let open = intervals.iter().filter(|i| i.is_open()).count();
        prop_assert!(open <= 1);
        if open == 1 {
            prop_assert!(intervals.last().is_some_and(|i| i.is_open()));
        }
    }

    /// Reconstruction is a pure function of its input.
    #[test]
    fn reconstruction_is_deterministic(seeds in seed_strategy()) {
        let user = Uuid::new_v4();
        let punches = well_formed(user, &seeds);
        prop_assert_eq!(build_intervals(user, &punches), build_intervals(user, &punches));
    }

    /// Without a schedule, worked plus breaks accounts for the whole
    /// closed interval; nothing is lost or double-counted.
    #[test]
    fn worked_and_breaks_are_conservative(seeds in seed_strategy()) {
        let user = Uuid::new_v4();
        let punches = well_formed(user, &seeds);
        let now = base() + TimeDelta::days(30);

        for interval in build_intervals(user, &punches) {
            if let Some(exit) = interval.exit {
                let ann = annotate(&interval, None, utc(), now);
                prop_assert_eq!(ann.worked + ann.real_break, exit - interval.entrance);
                prop_assert!(!ann.provisional);
                prop_assert_eq!(ann.delta, ann.worked);
            }
        }
    }

    /// Bucketed summaries preserve the total worked time of settled
    /// intervals across every granularity.
    #[test]
    fn summaries_preserve_worked_time(seeds in seed_strategy()) {
        let user = Uuid::new_v4();
        let punches = well_formed(user, &seeds);
        let now = base() + TimeDelta::days(30);

        let annotated: Vec<_> = build_intervals(user, &punches)
            .into_iter()
            .map(|i| {
                let ann = annotate(&i, None, utc(), now);
                (i, ann)
            })
            .collect();
        let settled: TimeDelta = annotated
            .iter()
            .filter(|(_, ann)| !ann.provisional)
            .map(|(_, ann)| ann.worked)
            .fold(TimeDelta::zero(), |acc, d| acc + d);

        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            let buckets = summarize(&annotated, granularity, utc());
            let total: TimeDelta = buckets
                .values()
                .map(|s| s.worked)
                .fold(TimeDelta::zero(), |acc, d| acc + d);
            prop_assert_eq!(total, settled);
        }
    }

    /// Haversine distance is symmetric, non-negative and zero on equal
    /// points.
    #[test]
    fn haversine_is_a_metric(
        lat_a in -90.0f64..90.0,
        lon_a in -180.0f64..180.0,
        lat_b in -90.0f64..90.0,
        lon_b in -180.0f64..180.0,
    ) {
        let a = GeoPoint::new(lat_a, lon_a).unwrap();
        let b = GeoPoint::new(lat_b, lon_b).unwrap();

        let ab = haversine_distance_m(a, b);
        let ba = haversine_distance_m(b, a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert_eq!(haversine_distance_m(a, a), 0.0);
    }
}
