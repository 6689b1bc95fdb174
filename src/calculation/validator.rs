//! Punch sequence validation.
//!
//! Validates a proposed punch against the user's derived state, enforced
//! schedule windows, assigned geofenced locations and the daily overtime
//! justification gate. State is derived from the punch log on every call;
//! there is no stored "current state" field anywhere.
//!
//! Rejections are values, not errors: the write-path collaborator turns a
//! [`RejectReason`] into a user-facing message.

use chrono::{FixedOffset, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    GeoPoint, Justification, Location, PunchAction, PunchRecord, Schedule, ScheduleSettings,
};

use super::aggregate::to_local;
use super::geofence::within_radius;
use super::intervals::build_intervals;
use super::overtime::annotate;
use super::schedule::theoretical_day;

/// The transient per-user attendance state, derived from the last punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchState {
    /// No open interval: the next legal action is an entrance.
    Idle,
    /// Inside an open interval: break start or exit are legal.
    Working,
    /// Inside an open break: only break end is legal.
    OnBreak,
}

impl PunchState {
    /// Whether `action` is a legal transition from this state.
    pub fn allows(self, action: PunchAction) -> bool {
        matches!(
            (self, action),
            (PunchState::Idle, PunchAction::Entrance)
                | (PunchState::Working, PunchAction::BreakStart)
                | (PunchState::Working, PunchAction::Exit)
                | (PunchState::OnBreak, PunchAction::BreakEnd)
        )
    }
}

impl std::fmt::Display for PunchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PunchState::Idle => write!(f, "idle"),
            PunchState::Working => write!(f, "working"),
            PunchState::OnBreak => write!(f, "on_break"),
        }
    }
}

/// Derives the current state from the most recent punch action.
///
/// No prior punch, or a trailing exit, means [`PunchState::Idle`]; the
/// machine cycles daily and has no terminal state.
pub fn derive_state(last_action: Option<PunchAction>) -> PunchState {
    match last_action {
        None | Some(PunchAction::Exit) => PunchState::Idle,
        Some(PunchAction::Entrance) | Some(PunchAction::BreakEnd) => PunchState::Working,
        Some(PunchAction::BreakStart) => PunchState::OnBreak,
    }
}

/// Why a proposed punch was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectReason {
    /// The action is not a legal transition from the derived state.
    SequenceViolation {
        /// The state the user was in.
        state: PunchState,
        /// The proposed action.
        action: PunchAction,
    },
    /// The timestamp is outside every enforced window, margin included.
    OutsideSchedule {
        /// The margin that was applied, in minutes.
        margin_minutes: u32,
    },
    /// No assigned location contains the coordinate.
    OutsideGeofence,
    /// The schedule pins a fixed break; manual break punches are disallowed.
    ManualBreakBlocked,
    /// The exit would produce unjustified overtime.
    JustificationRequired,
    /// The user has no location assigned; a misconfiguration to surface.
    NoLocationAssigned,
    /// Enforcement is enabled but the user has no schedule assigned.
    NoScheduleAssigned,
    /// Location validation applies but no coordinates were supplied.
    MissingCoordinates,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::SequenceViolation { state, action } => {
                write!(f, "action '{}' is not allowed from state '{}'", action, state)
            }
            RejectReason::OutsideSchedule { margin_minutes } => write!(
                f,
                "timestamp is outside the authorized schedule (margin {} minutes)",
                margin_minutes
            ),
            RejectReason::OutsideGeofence => {
                write!(f, "coordinates are not inside any assigned location")
            }
            RejectReason::ManualBreakBlocked => write!(
                f,
                "the schedule pins a fixed break; manual break punches are disallowed"
            ),
            RejectReason::JustificationRequired => write!(
                f,
                "exit exceeds the expected daily time and requires a justification"
            ),
            RejectReason::NoLocationAssigned => write!(f, "no location is assigned to the user"),
            RejectReason::NoScheduleAssigned => {
                write!(f, "schedule enforcement is enabled but no schedule is assigned")
            }
            RejectReason::MissingCoordinates => {
                write!(f, "no device coordinates were provided")
            }
        }
    }
}

/// The outcome of validating a proposed punch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum PunchDecision {
    /// The punch may be committed.
    Accepted,
    /// The punch must not be committed.
    Rejected(RejectReason),
}

impl PunchDecision {
    /// Whether the proposal was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, PunchDecision::Accepted)
    }
}

/// A punch submitted for validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PunchProposal {
    /// The punching user.
    pub user_id: Uuid,
    /// The proposed action.
    pub action: PunchAction,
    /// Proposed UTC instant of the event.
    pub timestamp: NaiveDateTime,
    /// Device coordinates, when available.
    pub coordinates: Option<GeoPoint>,
    /// Overtime justification attached to an exit, when supplied.
    pub justification: Option<Justification>,
}

/// Collaborator-fetched inputs the validator runs against.
///
/// The write path must populate this from the latest committed state
/// immediately before commit, under the per-user serialization guard, so
/// the decision never races a concurrent punch for the same user.
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    /// The user's most recent committed punch, any date.
    pub last_punch: Option<&'a PunchRecord>,
    /// Committed punches within the proposal's local calendar day, ordered.
    pub punches_today: &'a [PunchRecord],
    /// All schedules assigned to the user; the first is the active one.
    pub schedules: &'a [Schedule],
    /// The user's enforcement settings.
    pub settings: &'a ScheduleSettings,
    /// Locations assigned to the user, in priority order.
    pub locations: &'a [Location],
    /// Offset of the presentation timezone, for local-day anchoring.
    pub utc_offset: FixedOffset,
}

impl ValidationContext<'_> {
    fn has_flexible_location(&self) -> bool {
        self.locations.iter().any(|l| l.is_flexible())
    }
}

/// Validates a proposed punch, returning a typed decision.
///
/// Checks run in order: sequence legality, enforced schedule window with
/// margin, location containment, the fixed-break gate for manual break
/// punches, and the overtime justification gate on exit. Coordinates are
/// assumed range-valid; malformed input fails upstream.
pub fn validate_punch(ctx: &ValidationContext<'_>, proposal: &PunchProposal) -> PunchDecision {
    let local_ts = to_local(proposal.timestamp, ctx.utc_offset);
    let local_date = local_ts.date();

    // 1. Sequence legality against the derived state.
    let state = derive_state(ctx.last_punch.map(|p| p.action));
    if !state.allows(proposal.action) {
        return PunchDecision::Rejected(RejectReason::SequenceViolation {
            state,
            action: proposal.action,
        });
    }

    // 2. Enforced schedule window. A punch is authorized when ANY assigned
    //    schedule has a window containing the local instant, margin applied.
    if ctx.settings.enforce_schedule {
        if ctx.schedules.is_empty() {
            return PunchDecision::Rejected(RejectReason::NoScheduleAssigned);
        }
        let margin = ctx.settings.margin_minutes;
        let authorized = ctx.schedules.iter().any(|schedule| {
            theoretical_day(schedule, local_date).contains_with_margin(local_ts, margin)
        });
        if !authorized {
            return PunchDecision::Rejected(RejectReason::OutsideSchedule {
                margin_minutes: margin,
            });
        }
    }

    // 3. Location containment, unless the user holds the Flexible exemption.
    if ctx.locations.is_empty() {
        return PunchDecision::Rejected(RejectReason::NoLocationAssigned);
    }
    if !ctx.has_flexible_location() {
        let Some(point) = proposal.coordinates else {
            return PunchDecision::Rejected(RejectReason::MissingCoordinates);
        };
        let contained = ctx
            .locations
            .iter()
            .filter(|l| !l.is_flexible())
            .any(|l| within_radius(point, l));
        if !contained {
            return PunchDecision::Rejected(RejectReason::OutsideGeofence);
        }
    }

    // 4. Manual break punches are disallowed when the active schedule pins
    //    the break; that day's breaks derive from the fixed window instead.
    if proposal.action.is_break()
        && let Some(active) = ctx.schedules.first()
        && theoretical_day(active, local_date).fixed_break().is_some()
    {
        return PunchDecision::Rejected(RejectReason::ManualBreakBlocked);
    }

    // 5. An exit pushing the day past its expected time needs a justification.
    if proposal.action == PunchAction::Exit
        && proposal.justification.is_none()
        && exit_exceeds_expected(ctx, proposal, local_date)
    {
        return PunchDecision::Rejected(RejectReason::JustificationRequired);
    }

    PunchDecision::Accepted
}

/// Computes worked-with-proposed-exit versus expected for the local day.
fn exit_exceeds_expected(
    ctx: &ValidationContext<'_>,
    proposal: &PunchProposal,
    local_date: chrono::NaiveDate,
) -> bool {
    let mut punches: Vec<PunchRecord> = ctx.punches_today.to_vec();
    punches.push(PunchRecord::new(
        proposal.user_id,
        PunchAction::Exit,
        proposal.timestamp,
        proposal.coordinates,
    ));
    punches.sort_by_key(|p| p.timestamp);

    let active = ctx.schedules.first();
    let worked = build_intervals(proposal.user_id, &punches)
        .iter()
        .filter(|it| !it.is_open())
        .map(|it| annotate(it, active, ctx.utc_offset, proposal.timestamp).worked)
        .fold(TimeDelta::zero(), |acc, d| acc + d);

    let expected = match active {
        Some(schedule) => theoretical_day(schedule, local_date).expected_duration(),
        None => TimeDelta::zero(),
    };

    worked > expected
}
