//! Punch log storage.
//!
//! The engine treats the punch log as an append-mostly collaborator
//! behind the [`PunchStore`] trait. [`MemoryPunchStore`] is the in-process
//! implementation used by tests and single-node deployments.

use chrono::NaiveDateTime;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::PunchRecord;

/// Read and append access to a user's punch log.
///
/// Queries return punches ordered by timestamp; records sharing a
/// timestamp keep their insertion order.
pub trait PunchStore: Send + Sync {
    /// The most recent punch of a user, across all dates.
    fn last_punch(&self, user_id: Uuid) -> Option<PunchRecord>;

    /// A user's punches in the half-open range `[from, to)`.
    fn punches_between(&self, user_id: Uuid, from: NaiveDateTime, to: NaiveDateTime)
    -> Vec<PunchRecord>;

    /// All punches of a user.
    fn punches_for(&self, user_id: Uuid) -> Vec<PunchRecord>;

    /// Appends a committed punch.
    fn insert(&self, punch: PunchRecord);

    /// Replaces the stored punch sharing `punch.id`.
    ///
    /// Returns `false` when no such punch exists.
    fn update(&self, punch: PunchRecord) -> bool;
}

/// In-memory punch log.
#[derive(Debug, Default)]
pub struct MemoryPunchStore {
    punches: RwLock<Vec<PunchRecord>>,
}

impl MemoryPunchStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_for(&self, user_id: Uuid, mut keep: impl FnMut(&PunchRecord) -> bool) -> Vec<PunchRecord> {
        let mut out: Vec<PunchRecord> = self
            .punches
            .read()
            .iter()
            .filter(|p| p.user_id == user_id && keep(p))
            .cloned()
            .collect();
        // Stable, so equal timestamps keep insertion order.
        out.sort_by_key(|p| p.timestamp);
        out
    }
}

impl PunchStore for MemoryPunchStore {
    fn last_punch(&self, user_id: Uuid) -> Option<PunchRecord> {
        self.sorted_for(user_id, |_| true).pop()
    }

    fn punches_between(
        &self,
        user_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Vec<PunchRecord> {
        self.sorted_for(user_id, |p| from <= p.timestamp && p.timestamp < to)
    }

    fn punches_for(&self, user_id: Uuid) -> Vec<PunchRecord> {
        self.sorted_for(user_id, |_| true)
    }

    fn insert(&self, punch: PunchRecord) {
        self.punches.write().push(punch);
    }

    fn update(&self, punch: PunchRecord) -> bool {
        let mut punches = self.punches.write();
        match punches.iter_mut().find(|p| p.id == punch.id) {
            Some(slot) => {
                *slot = punch;
                true
            }
            None => false,
        }
    }
}
