//! Reconstructed work intervals.
//!
//! Intervals are derived on demand from the punch log; they are never
//! persisted as their own truth. Corrections happen on the underlying
//! punches, and the interval is simply rebuilt.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One break taken inside a work interval.
///
/// An open segment (no end yet) contributes zero to break totals until it
/// is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakSegment {
    /// UTC instant the break started.
    pub start: NaiveDateTime,
    /// UTC instant the break ended, if it has.
    pub end: Option<NaiveDateTime>,
}

impl BreakSegment {
    /// Duration of the segment; zero while open or for inverted bounds.
    pub fn duration(&self) -> TimeDelta {
        match self.end {
            Some(end) if end > self.start => end - self.start,
            _ => TimeDelta::zero(),
        }
    }

    /// Whether the segment has not been closed yet.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// Inconsistencies found while reconstructing an interval.
///
/// Historical punch data may predate write-time validation, so the builder
/// keeps going and flags what it saw instead of failing the whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalAnomaly {
    /// A break punch appeared with no open entrance before it.
    BreakBeforeEntrance,
    /// An exit appeared with no open entrance; a zero-length interval is emitted.
    ExitWithoutEntrance,
    /// A second entrance appeared while an interval was still open.
    ReopenedWithoutExit,
    /// A break end appeared with no break in progress.
    BreakEndWithoutStart,
    /// The interval closed while a break was still in progress.
    UnfinishedBreak,
}

/// One reconstructed work session, from entrance to exit.
///
/// `exit == None` means the interval is still in progress. A shift crosses
/// midnight when entrance and exit fall on different calendar dates; the
/// interval keeps its true instants and is attributed to the entrance date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkInterval {
    /// The user the interval belongs to.
    pub user_id: Uuid,
    /// Attribution date: the entrance's UTC calendar date.
    pub date: NaiveDate,
    /// UTC instant of the entrance.
    pub entrance: NaiveDateTime,
    /// UTC instant of the exit; `None` while the interval is open.
    pub exit: Option<NaiveDateTime>,
    /// Breaks taken inside the interval, in chronological order.
    pub breaks: Vec<BreakSegment>,
    /// Inconsistencies found while reconstructing this interval.
    #[serde(default)]
    pub anomalies: Vec<IntervalAnomaly>,
}

impl WorkInterval {
    /// Whether the interval has no exit yet.
    pub fn is_open(&self) -> bool {
        self.exit.is_none()
    }

    /// Whether the interval was reconstructed from inconsistent punches.
    pub fn is_anomalous(&self) -> bool {
        !self.anomalies.is_empty()
    }

    /// Whether entrance and exit fall on different calendar dates.
    pub fn crosses_midnight(&self) -> bool {
        match self.exit {
            Some(exit) => exit.date() != self.entrance.date(),
            None => false,
        }
    }

    /// Raw entrance-to-exit duration for a closed interval.
    ///
    /// Always instant subtraction; calendar days are never truncated.
    pub fn raw_duration(&self) -> Option<TimeDelta> {
        self.exit.map(|exit| (exit - self.entrance).max(TimeDelta::zero()))
    }

    /// Sum of all closed break segments.
    pub fn real_break_duration(&self) -> TimeDelta {
        self.breaks
            .iter()
            .map(|b| b.duration())
            .fold(TimeDelta::zero(), |acc, d| acc + d)
    }
}
