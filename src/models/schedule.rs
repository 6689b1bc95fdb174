//! Schedule definitions and per-user enforcement settings.
//!
//! A schedule is either *uniform* (one daily template applied every day)
//! or *per-weekday* (an explicit template per weekday; days without an
//! entry carry no theoretical obligation). The two modes are a tagged
//! variant, not a hierarchy.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A clock-time window within a day.
///
/// A window whose end is numerically less than or equal to its start is
/// interpreted as crossing midnight: once anchored to a calendar date the
/// end lands on the following day.
///
/// # Example
///
/// ```
/// use attendance_engine::models::TimeWindow;
/// use chrono::{NaiveDate, NaiveTime, TimeDelta};
///
/// let night = TimeWindow {
///     start: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
///     end: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
/// };
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let (start, end) = night.anchor(date);
/// assert_eq!(end.date(), date.succ_opt().unwrap());
/// assert_eq!(night.length(), TimeDelta::hours(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start clock time.
    pub start: NaiveTime,
    /// End clock time; `<= start` means the window crosses midnight.
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Anchors the window to a calendar date, resolving midnight crossing.
    pub fn anchor(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(self.start);
        let mut end = date.and_time(self.end);
        if end <= start {
            end += TimeDelta::days(1);
        }
        (start, end)
    }

    /// The duration of the window.
    pub fn length(&self) -> TimeDelta {
        // Anchor date is irrelevant for the length
        let (start, end) = self.anchor(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        end - start
    }
}

/// A break prescribed by a schedule.
///
/// A fixed break is pinned to clock times; a flexible break only requires
/// a duration, taken whenever the user chooses. Paid breaks reduce neither
/// the theoretical obligation nor worked time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BreakSpec {
    /// Break pinned to a clock-time window.
    Fixed {
        /// The break window.
        window: TimeWindow,
        /// Whether the break is paid.
        #[serde(default)]
        paid: bool,
    },
    /// Break with a required duration but no fixed clock time.
    Flexible {
        /// Required break duration in minutes.
        minutes: u32,
        /// Whether the break is paid.
        #[serde(default)]
        paid: bool,
    },
}

impl BreakSpec {
    /// Whether the break is paid.
    pub fn is_paid(&self) -> bool {
        match self {
            BreakSpec::Fixed { paid, .. } => *paid,
            BreakSpec::Flexible { paid, .. } => *paid,
        }
    }
}

/// The work windows and breaks prescribed for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTemplate {
    /// Work windows for the day. Usually one; multiple windows are summed.
    pub work_windows: Vec<TimeWindow>,
    /// Breaks prescribed for the day.
    #[serde(default)]
    pub breaks: Vec<BreakSpec>,
}

/// A day template bound to a weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdaySchedule {
    /// Weekday index, 0 = Monday through 6 = Sunday.
    pub day_of_week: u8,
    /// The template applied on that weekday.
    pub template: DayTemplate,
}

/// A schedule definition, uniform or per-weekday.
///
/// # Example
///
/// ```
/// use attendance_engine::models::Schedule;
///
/// let yaml = r#"
/// mode: per_weekday
/// days:
///   - day_of_week: 0
///     template:
///       work_windows:
///         - start: "09:00:00"
///           end: "17:00:00"
///       breaks:
///         - type: flexible
///           minutes: 30
/// "#;
/// let schedule: Schedule = serde_yaml::from_str(yaml).unwrap();
/// let monday = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// assert!(schedule.template_for(monday).is_some());
/// let tuesday = chrono::NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
/// assert!(schedule.template_for(tuesday).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Schedule {
    /// The same template applies every day.
    Uniform {
        /// Template applied every calendar date.
        template: DayTemplate,
    },
    /// An explicit template per weekday; missing weekdays are rest days.
    PerWeekday {
        /// The configured weekdays.
        days: Vec<WeekdaySchedule>,
    },
}

impl Schedule {
    /// Looks up the day template applicable on a calendar date.
    ///
    /// Returns `None` when the date carries no theoretical obligation
    /// (a weekday with no entry in per-weekday mode).
    pub fn template_for(&self, date: NaiveDate) -> Option<&DayTemplate> {
        match self {
            Schedule::Uniform { template } => Some(template),
            Schedule::PerWeekday { days } => {
                let dow = date.weekday().num_days_from_monday() as u8;
                days.iter().find(|d| d.day_of_week == dow).map(|d| &d.template)
            }
        }
    }
}

/// Per-user schedule enforcement settings.
///
/// Governs whether the punch validator rejects out-of-window punches, and
/// the tolerance margin around window boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// Whether punches outside the schedule window are rejected.
    #[serde(default)]
    pub enforce_schedule: bool,
    /// Tolerance in minutes applied before and after each window.
    #[serde(default)]
    pub margin_minutes: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        ScheduleSettings {
            enforce_schedule: false,
            margin_minutes: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// SC-001: plain window anchors within the same day
    #[test]
    fn test_window_anchor_same_day() {
        let window = TimeWindow {
            start: t(9, 0),
            end: t(17, 0),
        };
        let (start, end) = window.anchor(d("2026-03-02"));
        assert_eq!(start.date(), d("2026-03-02"));
        assert_eq!(end.date(), d("2026-03-02"));
        assert_eq!(window.length(), TimeDelta::hours(8));
    }

    /// SC-002: inverted window crosses midnight
    #[test]
    fn test_window_anchor_crosses_midnight() {
        let window = TimeWindow {
            start: t(22, 0),
            end: t(6, 0),
        };
        let (start, end) = window.anchor(d("2026-03-02"));
        assert_eq!(start.date(), d("2026-03-02"));
        assert_eq!(end.date(), d("2026-03-03"));
        assert_eq!(window.length(), TimeDelta::hours(8));
    }

    /// SC-003: uniform schedule applies on every date
    #[test]
    fn test_uniform_template_every_date() {
        let schedule = Schedule::Uniform {
            template: DayTemplate {
                work_windows: vec![TimeWindow {
                    start: t(9, 0),
                    end: t(17, 0),
                }],
                breaks: vec![],
            },
        };
        assert!(schedule.template_for(d("2026-03-02")).is_some()); // Monday
        assert!(schedule.template_for(d("2026-03-07")).is_some()); // Saturday
    }

    /// SC-004: per-weekday lookup honors 0=Monday indexing
    #[test]
    fn test_per_weekday_lookup() {
        let schedule = Schedule::PerWeekday {
            days: vec![WeekdaySchedule {
                day_of_week: 4, // Friday
                template: DayTemplate {
                    work_windows: vec![TimeWindow {
                        start: t(8, 0),
                        end: t(14, 0),
                    }],
                    breaks: vec![],
                },
            }],
        };
        // 2026-03-06 is a Friday
        assert!(schedule.template_for(d("2026-03-06")).is_some());
        // 2026-03-05 is a Thursday
        assert!(schedule.template_for(d("2026-03-05")).is_none());
    }

    #[test]
    fn test_break_spec_paid_flag() {
        let fixed = BreakSpec::Fixed {
            window: TimeWindow {
                start: t(13, 0),
                end: t(14, 0),
            },
            paid: true,
        };
        let flexible = BreakSpec::Flexible {
            minutes: 30,
            paid: false,
        };
        assert!(fixed.is_paid());
        assert!(!flexible.is_paid());
    }

    #[test]
    fn test_settings_default_is_unenforced() {
        let settings = ScheduleSettings::default();
        assert!(!settings.enforce_schedule);
        assert_eq!(settings.margin_minutes, 0);
    }

    #[test]
    fn test_uniform_yaml_roundtrip() {
        let yaml = r#"
mode: uniform
template:
  work_windows:
    - start: "09:00:00"
      end: "17:00:00"
  breaks:
    - type: fixed
      window:
        start: "13:00:00"
        end: "14:00:00"
"#;
        let schedule: Schedule = serde_yaml::from_str(yaml).unwrap();
        let template = schedule.template_for(d("2026-03-02")).unwrap();
        assert_eq!(template.work_windows.len(), 1);
        assert_eq!(template.breaks.len(), 1);
        assert!(!template.breaks[0].is_paid());

        let back = serde_yaml::to_string(&schedule).unwrap();
        let again: Schedule = serde_yaml::from_str(&back).unwrap();
        assert_eq!(schedule, again);
    }
}
