//! Period aggregation of annotated intervals.
//!
//! Rolls closed, annotated intervals up into calendar-day, ISO-week and
//! calendar-month summaries. An interval belongs wholly to the local
//! calendar day of its entrance; it is never split at midnight, so a
//! night shift lands entirely on the day it started.
//!
//! Timestamps are stored in UTC and converted to the presentation
//! timezone only here, at the aggregation boundary.

use std::collections::BTreeMap;

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{WorkInterval, decimal_hours, duration_seconds};

use super::overtime::IntervalAnnotation;

/// The reporting period size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One local calendar day per bucket.
    Day,
    /// One ISO 8601 week per bucket.
    Week,
    /// One calendar month per bucket.
    Month,
}

/// Identifies one reporting bucket. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "period", rename_all = "snake_case")]
pub enum PeriodKey {
    /// A local calendar day.
    Day(NaiveDate),
    /// An ISO week; `year` is the ISO week-based year, not the calendar one.
    Week {
        /// ISO week-based year.
        year: i32,
        /// ISO week number, 1 through 53.
        week: u32,
    },
    /// A calendar month.
    Month {
        /// Calendar year.
        year: i32,
        /// Month number, 1 through 12.
        month: u32,
    },
}

/// Accumulated durations for one reporting bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Total worked time in the period.
    #[serde(with = "duration_seconds")]
    pub worked: TimeDelta,
    /// Total expected time over the period's days with activity.
    #[serde(with = "duration_seconds")]
    pub expected: TimeDelta,
    /// Signed worked-minus-expected balance.
    #[serde(with = "duration_seconds")]
    pub delta: TimeDelta,
    /// Total real (punched or imputed) break time.
    #[serde(with = "duration_seconds")]
    pub real_break: TimeDelta,
}

impl PeriodSummary {
    /// Worked time as decimal hours, for reporting surfaces.
    pub fn worked_hours(&self) -> Decimal {
        decimal_hours(self.worked)
    }

    /// Expected time as decimal hours.
    pub fn expected_hours(&self) -> Decimal {
        decimal_hours(self.expected)
    }

    /// Balance as signed decimal hours.
    pub fn delta_hours(&self) -> Decimal {
        decimal_hours(self.delta)
    }

    fn absorb(&mut self, annotation: &IntervalAnnotation) {
        self.worked += annotation.worked;
        self.expected += annotation.expected;
        self.delta += annotation.delta;
        self.real_break += annotation.real_break;
    }
}

/// Overtime and deficit split across a summarized range.
///
/// The split is computed per bucket and then summed, so a 2h-over day and
/// a 2h-under day yield 2h of overtime AND 2h of deficit, not zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Total worked time.
    #[serde(with = "duration_seconds")]
    pub worked: TimeDelta,
    /// Total expected time.
    #[serde(with = "duration_seconds")]
    pub expected: TimeDelta,
    /// Sum of positive per-bucket balances.
    #[serde(with = "duration_seconds")]
    pub overtime: TimeDelta,
    /// Sum of negative per-bucket balances, as a positive magnitude.
    #[serde(with = "duration_seconds")]
    pub deficit: TimeDelta,
}

/// Shifts a UTC instant into the presentation timezone's local clock.
pub fn to_local(timestamp: NaiveDateTime, offset: FixedOffset) -> NaiveDateTime {
    timestamp + TimeDelta::seconds(i64::from(offset.local_minus_utc()))
}

fn period_key(local_date: NaiveDate, granularity: Granularity) -> PeriodKey {
    match granularity {
        Granularity::Day => PeriodKey::Day(local_date),
        Granularity::Week => {
            let iso = local_date.iso_week();
            PeriodKey::Week {
                year: iso.year(),
                week: iso.week(),
            }
        }
        Granularity::Month => PeriodKey::Month {
            year: local_date.year(),
            month: local_date.month(),
        },
    }
}

/// Buckets annotated intervals by period.
///
/// Open intervals carry provisional annotations and are excluded; only
/// settled time is reported. Each interval is attributed to the local
/// calendar day of its entrance.
pub fn summarize(
    intervals: &[(WorkInterval, IntervalAnnotation)],
    granularity: Granularity,
    offset: FixedOffset,
) -> BTreeMap<PeriodKey, PeriodSummary> {
    let mut buckets: BTreeMap<PeriodKey, PeriodSummary> = BTreeMap::new();
    for (interval, annotation) in intervals {
        if annotation.provisional {
            continue;
        }
        let local_date = to_local(interval.entrance, offset).date();
        buckets
            .entry(period_key(local_date, granularity))
            .or_default()
            .absorb(annotation);
    }
    buckets
}

/// Splits per-bucket balances into overtime and deficit totals.
pub fn totals(buckets: &BTreeMap<PeriodKey, PeriodSummary>) -> PeriodTotals {
    let mut out = PeriodTotals::default();
    for summary in buckets.values() {
        out.worked += summary.worked;
        out.expected += summary.expected;
        if summary.delta > TimeDelta::zero() {
            out.overtime += summary.delta;
        } else {
            out.deficit += -summary.delta;
        }
    }
    out
}
