//! Interval reconstruction from raw punches.
//!
//! A pure scan over a user's chronologically ordered punch list. Malformed
//! sequences should have been rejected at write time; the builder is
//! tolerant of one trailing open interval and, for historical data that
//! predates validation, produces best-effort intervals flagged as
//! anomalous instead of failing.

use uuid::Uuid;

use crate::models::{BreakSegment, IntervalAnomaly, PunchAction, PunchRecord, WorkInterval};

/// Groups ordered punches into entrance/exit intervals.
///
/// Expects `punches` sorted by timestamp (insertion order as tie-break)
/// and belonging to a single user; `user_id` stamps intervals synthesized
/// from orphan punches. A trailing entrance without exit is emitted as an
/// open interval. Shifts crossing midnight are not split: the interval
/// keeps its true instants and is attributed to the entrance date.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::build_intervals;
/// use attendance_engine::models::{PunchAction, PunchRecord};
/// use chrono::NaiveDateTime;
/// use uuid::Uuid;
///
/// let user = Uuid::new_v4();
/// let ts = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let punches = vec![
///     PunchRecord::new(user, PunchAction::Entrance, ts("2026-03-02 09:00:00"), None),
///     PunchRecord::new(user, PunchAction::Exit, ts("2026-03-02 17:00:00"), None),
/// ];
///
/// let intervals = build_intervals(user, &punches);
/// assert_eq!(intervals.len(), 1);
/// assert!(!intervals[0].is_open());
/// ```
pub fn build_intervals(user_id: Uuid, punches: &[PunchRecord]) -> Vec<WorkInterval> {
    let mut intervals = Vec::new();
    let mut open: Option<WorkInterval> = None;

    for punch in punches {
        match punch.action {
            PunchAction::Entrance => {
                if let Some(mut current) = open.take() {
                    // Entrance while an interval is open: emit the stale
                    // interval as best effort and start a fresh one.
                    current.anomalies.push(IntervalAnomaly::ReopenedWithoutExit);
                    close_dangling_break(&mut current);
                    intervals.push(current);
                }
                open = Some(new_interval(user_id, punch.timestamp));
            }
            PunchAction::Exit => match open.take() {
                Some(mut current) => {
                    if current.breaks.last().is_some_and(|b| b.is_open()) {
                        current.anomalies.push(IntervalAnomaly::UnfinishedBreak);
                    }
                    current.exit = Some(punch.timestamp);
                    intervals.push(current);
                }
                None => {
                    // Orphan exit: zero-length interval so the report
                    // still shows the punch.
                    let mut interval = new_interval(user_id, punch.timestamp);
                    interval.exit = Some(punch.timestamp);
                    interval.anomalies.push(IntervalAnomaly::ExitWithoutEntrance);
                    intervals.push(interval);
                }
            },
            PunchAction::BreakStart => match open.as_mut() {
                Some(current) => {
                    // A duplicate start while a break is in progress keeps
                    // the first start.
                    if !current.breaks.last().is_some_and(|b| b.is_open()) {
                        current.breaks.push(BreakSegment {
                            start: punch.timestamp,
                            end: None,
                        });
                    }
                }
                None => {
                    let mut interval = new_interval(user_id, punch.timestamp);
                    interval.anomalies.push(IntervalAnomaly::BreakBeforeEntrance);
                    interval.breaks.push(BreakSegment {
                        start: punch.timestamp,
                        end: None,
                    });
                    open = Some(interval);
                }
            },
            PunchAction::BreakEnd => match open.as_mut() {
                Some(current) => match current.breaks.last_mut() {
                    Some(segment) if segment.is_open() => {
                        segment.end = Some(punch.timestamp);
                    }
                    _ => current.anomalies.push(IntervalAnomaly::BreakEndWithoutStart),
                },
                None => {
                    let mut interval = new_interval(user_id, punch.timestamp);
                    interval.anomalies.push(IntervalAnomaly::BreakBeforeEntrance);
                    interval.anomalies.push(IntervalAnomaly::BreakEndWithoutStart);
                    open = Some(interval);
                }
            },
        }
    }

    if let Some(current) = open {
        intervals.push(current);
    }

    intervals
}

fn new_interval(user_id: Uuid, entrance: chrono::NaiveDateTime) -> WorkInterval {
    WorkInterval {
        user_id,
        date: entrance.date(),
        entrance,
        exit: None,
        breaks: Vec::new(),
        anomalies: Vec::new(),
    }
}

fn close_dangling_break(interval: &mut WorkInterval) {
    if interval.breaks.last().is_some_and(|b| b.is_open()) {
        interval.anomalies.push(IntervalAnomaly::UnfinishedBreak);
    }
}
