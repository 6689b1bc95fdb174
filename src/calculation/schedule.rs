//! Theoretical schedule evaluation.
//!
//! Given a schedule definition and a calendar date, this module produces
//! the theoretical work and break windows for that date, anchored to real
//! instants with midnight crossing resolved. Dates with no configured
//! template carry no obligation: expected time is zero and all worked
//! time that day counts as pure overtime.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::models::{BreakSpec, Schedule, duration_seconds};

/// A break obligation anchored to a concrete date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TheoreticalBreak {
    /// Break pinned to concrete instants.
    Fixed {
        /// Anchored start of the break.
        start: NaiveDateTime,
        /// Anchored end of the break.
        end: NaiveDateTime,
        /// Whether the break is paid.
        paid: bool,
    },
    /// Break required for a duration at the user's choosing.
    Flexible {
        /// Required break duration.
        #[serde(with = "duration_seconds")]
        duration: TimeDelta,
        /// Whether the break is paid.
        paid: bool,
    },
}

impl TheoreticalBreak {
    /// The prescribed duration of the break.
    pub fn duration(&self) -> TimeDelta {
        match self {
            TheoreticalBreak::Fixed { start, end, .. } => (*end - *start).max(TimeDelta::zero()),
            TheoreticalBreak::Flexible { duration, .. } => *duration,
        }
    }

    /// Whether the break is paid.
    pub fn is_paid(&self) -> bool {
        match self {
            TheoreticalBreak::Fixed { paid, .. } => *paid,
            TheoreticalBreak::Flexible { paid, .. } => *paid,
        }
    }
}

/// The theoretical obligation for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TheoreticalDay {
    /// Anchored work windows, in configured order.
    pub work_windows: Vec<(NaiveDateTime, NaiveDateTime)>,
    /// Anchored break obligations.
    pub breaks: Vec<TheoreticalBreak>,
    /// Set when configured work windows overlap; the day is anomalous and
    /// no resolution is guessed.
    pub overlapping_windows: bool,
}

impl TheoreticalDay {
    /// Whether the date carries no work obligation.
    pub fn is_rest_day(&self) -> bool {
        self.work_windows.is_empty()
    }

    /// Total unpaid theoretical break duration.
    pub fn theoretical_break_duration(&self) -> TimeDelta {
        self.breaks
            .iter()
            .filter(|b| !b.is_paid())
            .map(|b| b.duration())
            .fold(TimeDelta::zero(), |acc, d| acc + d)
    }

    /// Expected worked duration: window lengths minus unpaid breaks, never negative.
    pub fn expected_duration(&self) -> TimeDelta {
        let windows: TimeDelta = self
            .work_windows
            .iter()
            .map(|(start, end)| *end - *start)
            .fold(TimeDelta::zero(), |acc, d| acc + d);
        (windows - self.theoretical_break_duration()).max(TimeDelta::zero())
    }

    /// The first unpaid fixed break window, if the schedule pins one.
    ///
    /// When present, manual break punches are disallowed for the day.
    pub fn fixed_break(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.breaks.iter().find_map(|b| match b {
            TheoreticalBreak::Fixed { start, end, paid } if !*paid => Some((*start, *end)),
            _ => None,
        })
    }

    /// Whether an instant falls inside any work window widened by a margin.
    pub fn contains_with_margin(&self, instant: NaiveDateTime, margin_minutes: u32) -> bool {
        let margin = TimeDelta::minutes(i64::from(margin_minutes));
        self.work_windows
            .iter()
            .any(|(start, end)| *start - margin <= instant && instant <= *end + margin)
    }
}

/// Evaluates the theoretical obligation of a schedule on a date.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::theoretical_day;
/// use attendance_engine::models::{DayTemplate, Schedule, TimeWindow};
/// use chrono::{NaiveDate, NaiveTime, TimeDelta};
///
/// let schedule = Schedule::Uniform {
///     template: DayTemplate {
///         work_windows: vec![TimeWindow {
///             start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
///             end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
///         }],
///         breaks: vec![],
///     },
/// };
/// let day = theoretical_day(&schedule, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
/// assert_eq!(day.expected_duration(), TimeDelta::hours(8));
/// ```
pub fn theoretical_day(schedule: &Schedule, date: NaiveDate) -> TheoreticalDay {
    let Some(template) = schedule.template_for(date) else {
        return TheoreticalDay {
            work_windows: vec![],
            breaks: vec![],
            overlapping_windows: false,
        };
    };

    let work_windows: Vec<(NaiveDateTime, NaiveDateTime)> = template
        .work_windows
        .iter()
        .map(|w| w.anchor(date))
        .collect();

    let breaks = template
        .breaks
        .iter()
        .map(|b| match b {
            BreakSpec::Fixed { window, paid } => {
                let (start, end) = window.anchor(date);
                TheoreticalBreak::Fixed {
                    start,
                    end,
                    paid: *paid,
                }
            }
            BreakSpec::Flexible { minutes, paid } => TheoreticalBreak::Flexible {
                duration: TimeDelta::minutes(i64::from(*minutes)),
                paid: *paid,
            },
        })
        .collect();

    TheoreticalDay {
        overlapping_windows: windows_overlap(&work_windows),
        work_windows,
        breaks,
    }
}

fn windows_overlap(windows: &[(NaiveDateTime, NaiveDateTime)]) -> bool {
    let mut sorted: Vec<_> = windows.to_vec();
    sorted.sort_by_key(|(start, _)| *start);
    sorted.windows(2).any(|pair| pair[1].0 < pair[0].1)
}
