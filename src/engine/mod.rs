//! The attendance engine.
//!
//! [`AttendanceEngine`] is the write-path and read-path orchestrator: it
//! fetches the latest committed punches from the store, runs the
//! validation chain, commits accepted punches, and serves reconstructed
//! intervals and period summaries. Storage and time are injected behind
//! the [`PunchStore`] and [`Clock`] traits.
//!
//! Writes for one user are serialized through a per-user lock, and the
//! validation inputs are re-read under that lock, so two simultaneous
//! proposals can never both pass sequence validation against the same
//! stale state.

pub mod clock;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{MemoryPunchStore, PunchStore};

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime, TimeDelta};
use parking_lot::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    Granularity, IntervalAnnotation, PeriodKey, PeriodSummary, PeriodTotals, PunchDecision,
    PunchProposal, ValidationContext, build_intervals, summarize, to_local, totals, validate_punch,
};
use crate::error::EngineResult;
use crate::models::{
    Location, PunchAction, PunchEdit, PunchRecord, Schedule, ScheduleSettings, WorkInterval,
};

/// The attendance configuration assigned to one user.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    /// Assigned schedules; the first is the active one, all authorize
    /// punches under enforcement.
    pub schedules: Vec<Schedule>,
    /// Enforcement settings.
    pub settings: ScheduleSettings,
    /// Assigned locations, in priority order.
    pub locations: Vec<Location>,
}

impl UserProfile {
    /// Whether the user holds the Flexible location exemption.
    pub fn is_flexible(&self) -> bool {
        self.locations.iter().any(|l| l.is_flexible())
    }
}

/// Write-path and read-path orchestrator over a punch store.
pub struct AttendanceEngine<S, C> {
    store: S,
    clock: C,
    utc_offset: FixedOffset,
    user_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl<S: PunchStore, C: Clock> AttendanceEngine<S, C> {
    /// Creates an engine over a store and clock, presenting times at the
    /// given fixed offset.
    pub fn new(store: S, clock: C, utc_offset: FixedOffset) -> Self {
        AttendanceEngine {
            store,
            clock,
            utc_offset,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying store, for collaborators that query it directly.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn user_lock(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        Arc::clone(self.user_locks.lock().entry(user_id).or_default())
    }

    /// Validates a proposed punch and commits it when accepted.
    ///
    /// Coordinates, when present, are range-checked first; malformed
    /// input is an error, not a rejection. The store is re-read under
    /// the user's lock so the decision cannot race a concurrent punch.
    pub fn submit_punch(
        &self,
        profile: &UserProfile,
        proposal: PunchProposal,
    ) -> EngineResult<PunchDecision> {
        if let Some(point) = proposal.coordinates {
            point.validate()?;
        }

        let lock = self.user_lock(proposal.user_id);
        let _guard = lock.lock();

        let last = self.store.last_punch(proposal.user_id);
        let (day_start, day_end) = self.local_day_utc_range(proposal.timestamp);
        let today = self
            .store
            .punches_between(proposal.user_id, day_start, day_end);

        let ctx = ValidationContext {
            last_punch: last.as_ref(),
            punches_today: &today,
            schedules: &profile.schedules,
            settings: &profile.settings,
            locations: &profile.locations,
            utc_offset: self.utc_offset,
        };
        let decision = validate_punch(&ctx, &proposal);

        match &decision {
            PunchDecision::Accepted => {
                let record = PunchRecord::new(
                    proposal.user_id,
                    proposal.action,
                    proposal.timestamp,
                    proposal.coordinates,
                );
                info!(
                    user_id = %record.user_id,
                    punch_id = %record.id,
                    action = %record.action,
                    timestamp = %record.timestamp,
                    "punch accepted"
                );
                self.store.insert(record);
            }
            PunchDecision::Rejected(reason) => {
                warn!(
                    user_id = %proposal.user_id,
                    action = %proposal.action,
                    reason = %reason,
                    "punch rejected"
                );
            }
        }

        Ok(decision)
    }

    /// Applies an audited correction to a committed punch.
    ///
    /// Returns `None` when the user has no punch with that id. The
    /// corrected record keeps its id; the audit row holds the pre-edit
    /// values and is handed back for the caller to persist.
    pub fn amend_punch(
        &self,
        user_id: Uuid,
        punch_id: Uuid,
        action: PunchAction,
        timestamp: NaiveDateTime,
        coordinates: Option<crate::models::GeoPoint>,
        editor_id: Uuid,
    ) -> EngineResult<Option<PunchEdit>> {
        if let Some(point) = coordinates {
            point.validate()?;
        }

        let lock = self.user_lock(user_id);
        let _guard = lock.lock();

        let Some(original) = self
            .store
            .punches_for(user_id)
            .into_iter()
            .find(|p| p.id == punch_id)
        else {
            return Ok(None);
        };

        let (corrected, edit) =
            original.apply_edit(action, timestamp, coordinates, editor_id, self.clock.now_utc());
        self.store.update(corrected);
        info!(
            user_id = %user_id,
            punch_id = %punch_id,
            editor_id = %editor_id,
            "punch amended"
        );
        Ok(Some(edit))
    }

    /// Reconstructed intervals over a user's full punch log.
    pub fn intervals_for(&self, user_id: Uuid) -> Vec<WorkInterval> {
        let punches = self.store.punches_for(user_id);
        build_intervals(user_id, &punches)
    }

    /// Intervals annotated against the user's active schedule.
    ///
    /// Open intervals are annotated provisionally using the injected
    /// clock's current instant.
    pub fn annotated_intervals_for(
        &self,
        profile: &UserProfile,
        user_id: Uuid,
    ) -> Vec<(WorkInterval, IntervalAnnotation)> {
        let now = self.clock.now_utc();
        let active = profile.schedules.first();
        self.intervals_for(user_id)
            .into_iter()
            .map(|interval| {
                let annotation =
                    crate::calculation::annotate(&interval, active, self.utc_offset, now);
                (interval, annotation)
            })
            .collect()
    }

    /// Period summaries over a user's settled intervals.
    pub fn summary_for(
        &self,
        profile: &UserProfile,
        user_id: Uuid,
        granularity: Granularity,
    ) -> BTreeMap<PeriodKey, PeriodSummary> {
        let annotated = self.annotated_intervals_for(profile, user_id);
        summarize(&annotated, granularity, self.utc_offset)
    }

    /// Overtime/deficit totals over a user's settled intervals.
    pub fn totals_for(
        &self,
        profile: &UserProfile,
        user_id: Uuid,
        granularity: Granularity,
    ) -> PeriodTotals {
        totals(&self.summary_for(profile, user_id, granularity))
    }

    /// UTC bounds `[start, end)` of the local calendar day containing a
    /// UTC instant.
    fn local_day_utc_range(&self, timestamp: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let local_midnight = to_local(timestamp, self.utc_offset)
            .date()
            .and_time(chrono::NaiveTime::MIN);
        let start = local_midnight - TimeDelta::seconds(i64::from(self.utc_offset.local_minus_utc()));
        (start, start + TimeDelta::days(1))
    }
}
