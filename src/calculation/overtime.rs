//! Break and overtime annotation for reconstructed intervals.
//!
//! Each interval is annotated with its real break time, the theoretical
//! break and expected duration from the schedule on the interval's date,
//! the worked duration from actual punches, and the signed worked-minus-
//! expected delta. Break shortfalls are surfaced as a separate flag, never
//! folded into the delta.

use chrono::{FixedOffset, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::models::{Schedule, WorkInterval, duration_seconds};

use super::aggregate::to_local;
use super::schedule::{TheoreticalBreak, TheoreticalDay, theoretical_day};

/// Computed time figures for one interval.
///
/// When the interval is still open the figures use the injected `now` as
/// a stand-in exit and `provisional` is set; provisional annotations are
/// for display only and must never be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalAnnotation {
    /// Sum of closed break segments inside the interval, plus the pinned
    /// break window on days where the schedule fixes it.
    #[serde(with = "duration_seconds")]
    pub real_break: TimeDelta,
    /// Unpaid break duration prescribed by the schedule for the date.
    #[serde(with = "duration_seconds")]
    pub theoretical_break: TimeDelta,
    /// Entrance-to-exit duration minus real breaks, floored at zero.
    #[serde(with = "duration_seconds")]
    pub worked: TimeDelta,
    /// Theoretical obligation for the date, never negative.
    #[serde(with = "duration_seconds")]
    pub expected: TimeDelta,
    /// `worked - expected`; positive is overtime, negative is deficit.
    #[serde(with = "duration_seconds")]
    pub delta: TimeDelta,
    /// Set when the real break fell short of the unpaid theoretical break.
    pub break_deficit: bool,
    /// Set when the interval is open and `now` stood in for the exit.
    pub provisional: bool,
}

impl IntervalAnnotation {
    /// Whether the delta indicates overtime.
    pub fn is_overtime(&self) -> bool {
        self.delta > TimeDelta::zero()
    }

    /// Whether the delta indicates a deficit.
    pub fn is_deficit(&self) -> bool {
        self.delta < TimeDelta::zero()
    }
}

/// Annotates an interval against the schedule active on its date.
///
/// `schedule` is the user's active schedule, or `None` when the user has
/// no schedule assigned; without a schedule the expected duration is zero
/// and all worked time counts as overtime.
///
/// Schedule windows are local clock times; `offset` places the interval's
/// UTC instants on that clock so the governing date and the pinned-break
/// overlap resolve correctly. Duration arithmetic itself stays raw
/// instant subtraction.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::annotate;
/// use attendance_engine::models::{DayTemplate, Schedule, TimeWindow, WorkInterval};
/// use chrono::{FixedOffset, NaiveDateTime, NaiveTime, TimeDelta};
/// use uuid::Uuid;
///
/// let ts = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let interval = WorkInterval {
///     user_id: Uuid::new_v4(),
///     date: ts("2026-03-02 09:00:00").date(),
///     entrance: ts("2026-03-02 09:00:00"),
///     exit: Some(ts("2026-03-02 17:00:00")),
///     breaks: vec![],
///     anomalies: vec![],
/// };
/// let schedule = Schedule::Uniform {
///     template: DayTemplate {
///         work_windows: vec![TimeWindow {
///             start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///             end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
///         }],
///         breaks: vec![],
///     },
/// };
///
/// let utc = FixedOffset::east_opt(0).unwrap();
/// let annotation = annotate(&interval, Some(&schedule), utc, ts("2026-03-02 18:00:00"));
/// assert_eq!(annotation.worked, TimeDelta::hours(8));
/// assert_eq!(annotation.expected, TimeDelta::hours(8));
/// assert_eq!(annotation.delta, TimeDelta::zero());
/// ```
pub fn annotate(
    interval: &WorkInterval,
    schedule: Option<&Schedule>,
    offset: FixedOffset,
    now: NaiveDateTime,
) -> IntervalAnnotation {
    let provisional = interval.is_open();
    let effective_exit = interval.exit.unwrap_or(now);

    let local_entrance = to_local(interval.entrance, offset);
    let local_exit = to_local(effective_exit, offset);

    let day = schedule.map(|s| theoretical_day(s, local_entrance.date()));
    let (theoretical_break, expected) = match &day {
        Some(day) => (day.theoretical_break_duration(), day.expected_duration()),
        None => (TimeDelta::zero(), TimeDelta::zero()),
    };

    // Days with a pinned break derive break time from the fixed window
    // (manual break punches are blocked for them), clipped to the interval.
    let imputed = day
        .as_ref()
        .map(|day| imputed_fixed_break(day, local_entrance, local_exit))
        .unwrap_or_else(TimeDelta::zero);
    let real_break = interval.real_break_duration() + imputed;

    let raw = (effective_exit - interval.entrance).max(TimeDelta::zero());
    let worked = (raw - real_break).max(TimeDelta::zero());

    IntervalAnnotation {
        real_break,
        theoretical_break,
        worked,
        expected,
        delta: worked - expected,
        break_deficit: !provisional
            && theoretical_break > TimeDelta::zero()
            && real_break < theoretical_break,
        provisional,
    }
}

/// Overlap between the day's unpaid fixed break windows and the interval.
fn imputed_fixed_break(
    day: &TheoreticalDay,
    entrance: NaiveDateTime,
    exit: NaiveDateTime,
) -> TimeDelta {
    day.breaks.iter().fold(TimeDelta::zero(), |acc, b| match b {
        TheoreticalBreak::Fixed {
            start,
            end,
            paid: false,
        } => {
            let clipped_start = (*start).max(entrance);
            let clipped_end = (*end).min(exit);
            acc + (clipped_end - clipped_start).max(TimeDelta::zero())
        }
        _ => acc,
    })
}
