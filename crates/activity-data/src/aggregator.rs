//! Single-pass aggregation of validated activity records.
//!
//! Every record updates three independent structures: the [`ActivityStore`],
//! the per-day [`DailyStatsTable`] and the per-student [`AnomalyCounters`].
//! Records must be applied in input order because the anomaly counter floors
//! at zero.

use activity_core::error::Result;
use activity_core::models::{ActivityRecord, ActivityType};
use serde::Serialize;
use tracing::debug;

use crate::ordered::InsertionOrdered;
use crate::store::ActivityStore;

// ── DailyStats ────────────────────────────────────────────────────────────────

/// Login and submission counters for one date key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub login_count: u64,
    pub submit_count: u64,
}

impl DailyStats {
    /// Count `activity` towards this day. Logouts leave the counters alone.
    pub fn add_activity(&mut self, activity: ActivityType) {
        match activity {
            ActivityType::Login => self.login_count += 1,
            ActivityType::SubmitAssignment => self.submit_count += 1,
            ActivityType::Logout => {}
        }
    }
}

/// [`DailyStats`] per date, in the order dates first appeared.
#[derive(Debug, Clone, Default)]
pub struct DailyStatsTable {
    days: InsertionOrdered<DailyStats>,
}

impl DailyStatsTable {
    /// Return the stats for `date`, creating zeroed counters on first use.
    pub fn entry(&mut self, date: &str) -> &mut DailyStats {
        self.days.entry(date)
    }

    pub fn get(&self, date: &str) -> Option<&DailyStats> {
        self.days.get(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DailyStats)> {
        self.days.iter()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

// ── AnomalyCounters ───────────────────────────────────────────────────────────

/// Per-student count of logins not yet matched by a logout.
///
/// Never negative: a logout with no open login leaves the counter at zero.
/// A student enters the table on its first login or logout.
#[derive(Debug, Clone, Default)]
pub struct AnomalyCounters {
    counters: InsertionOrdered<u64>,
}

impl AnomalyCounters {
    /// Return the counter for `student_id`, starting at zero on first use.
    pub fn entry(&mut self, student_id: &str) -> &mut u64 {
        self.counters.entry(student_id)
    }

    pub fn record_login(&mut self, student_id: &str) {
        *self.entry(student_id) += 1;
    }

    pub fn record_logout(&mut self, student_id: &str) {
        let counter = self.entry(student_id);
        *counter = counter.saturating_sub(1);
    }

    pub fn get(&self, student_id: &str) -> Option<u64> {
        self.counters.get(student_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counters.iter().map(|(id, &count)| (id, count))
    }

    /// Students whose counter is strictly above `threshold`, in table order.
    pub fn above(&self, threshold: u64) -> impl Iterator<Item = (&str, u64)> {
        self.iter().filter(move |&(_, count)| count > threshold)
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}

// ── ActivityAggregator ────────────────────────────────────────────────────────

/// Owns the three aggregates for the duration of a run.
#[derive(Debug, Clone, Default)]
pub struct ActivityAggregator {
    store: ActivityStore,
    daily: DailyStatsTable,
    anomalies: AnomalyCounters,
    records_applied: usize,
}

impl ActivityAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one validated record into every aggregate.
    pub fn apply(&mut self, record: &ActivityRecord) {
        self.store.upsert(
            &record.student_id,
            &record.student_name,
            record.activity,
            &record.date,
            &record.time,
        );

        self.daily.entry(&record.date).add_activity(record.activity);

        match record.activity {
            ActivityType::Login => self.anomalies.record_login(&record.student_id),
            ActivityType::Logout => self.anomalies.record_logout(&record.student_id),
            ActivityType::SubmitAssignment => {}
        }

        self.records_applied += 1;
    }

    /// Drain `records` in order, applying each before pulling the next.
    ///
    /// Stops at the first error; records applied before it stay applied.
    /// Returns the number of records applied by this call.
    pub fn consume<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<ActivityRecord>>,
    {
        let before = self.records_applied;
        for record in records {
            self.apply(&record?);
        }
        let applied = self.records_applied - before;
        debug!(
            "Applied {} records ({} students, {} dates)",
            applied,
            self.store.len(),
            self.daily.len()
        );
        Ok(applied)
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    pub fn daily(&self) -> &DailyStatsTable {
        &self.daily
    }

    pub fn anomalies(&self) -> &AnomalyCounters {
        &self.anomalies
    }

    pub fn records_applied(&self) -> usize {
        self.records_applied
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
