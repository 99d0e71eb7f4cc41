use crate::core::error::StoreError;
use crate::engine::calls::CallEngine;
use crate::models::account::Role;
use crate::stores::record_store::RecordStore;
use crate::stores::session_store::SessionManager;
use crate::utils::time::current_timestamp;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub registrations: AtomicU64,
    pub approvals: AtomicU64,
    pub rejections: AtomicU64,
    pub deletions: AtomicU64,
    pub calls_started: AtomicU64,
    /// Every call that stopped, by the user or by running out
    pub calls_ended: AtomicU64,
    pub calls_expired: AtomicU64,
    pub gifts_sent: AtomicU64,
    pub failed_logins: AtomicU64,
    pub start_time: i64,
}

#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub registrations: u64,
    pub approvals: u64,
    pub rejections: u64,
    pub deletions: u64,
    pub calls_started: u64,
    pub calls_ended: u64,
    pub calls_expired: u64,
    pub gifts_sent: u64,
    pub failed_logins: u64,
    pub accounts: usize,
    pub pending_models: usize,
    pub active_models: usize,
    pub online_models: usize,
    pub active_sessions: usize,
    pub active_calls: usize,
    pub uptime_seconds: i64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            registrations: AtomicU64::new(0),
            approvals: AtomicU64::new(0),
            rejections: AtomicU64::new(0),
            deletions: AtomicU64::new(0),
            calls_started: AtomicU64::new(0),
            calls_ended: AtomicU64::new(0),
            calls_expired: AtomicU64::new(0),
            gifts_sent: AtomicU64::new(0),
            failed_logins: AtomicU64::new(0),
            start_time: current_timestamp(),
        }
    }

    pub fn increment(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Combine the counters with counts derived from the current store contents
    pub fn get_snapshot(
        &self,
        store: &dyn RecordStore,
        sessions: &SessionManager,
        calls: &CallEngine,
    ) -> Result<MetricsSnapshot, StoreError> {
        let accounts = store.list()?;

        let count_role = |role: Role| accounts.iter().filter(|a| a.role() == role).count();

        Ok(MetricsSnapshot {
            registrations: self.registrations.load(Ordering::Relaxed),
            approvals: self.approvals.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            deletions: self.deletions.load(Ordering::Relaxed),
            calls_started: self.calls_started.load(Ordering::Relaxed),
            calls_ended: self.calls_ended.load(Ordering::Relaxed),
            calls_expired: self.calls_expired.load(Ordering::Relaxed),
            gifts_sent: self.gifts_sent.load(Ordering::Relaxed),
            failed_logins: self.failed_logins.load(Ordering::Relaxed),
            accounts: accounts.len(),
            pending_models: count_role(Role::ModelPending),
            active_models: count_role(Role::ModelActive),
            online_models: accounts.iter().filter(|a| a.is_listed_online()).count(),
            active_sessions: sessions.len(),
            active_calls: calls.active_calls(),
            uptime_seconds: current_timestamp() - self.start_time,
        })
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lifecycle::Lifecycle;
    use crate::models::account::GenderCategory;
    use crate::stores::record_store::MemoryRecordStore;
    use std::sync::Arc;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = Metrics::new();
        assert_eq!(metrics.registrations.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.gifts_sent.load(Ordering::Relaxed), 0);
        assert!(metrics.start_time > 0);
    }

    #[test]
    fn test_snapshot_counts() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let lifecycle = Lifecycle::new(store.clone(), 10.0);
        lifecycle.register("A", "1", "pw", GenderCategory::Female).unwrap();
        lifecycle.register("B", "2", "pw", GenderCategory::Female).unwrap();
        lifecycle.register("C", "3", "pw", GenderCategory::Male).unwrap();
        lifecycle.approve("1").unwrap();
        lifecycle.force_set_online("1", true).unwrap();

        let sessions = SessionManager::new();
        sessions.start_admin_session();
        let calls = CallEngine::new(store.clone(), 10.0, 120);
        calls.start_call("3", "1", 5).unwrap();

        let metrics = Metrics::new();
        Metrics::increment(&metrics.registrations);
        Metrics::increment(&metrics.registrations);

        let snapshot = metrics.get_snapshot(store.as_ref(), &sessions, &calls).unwrap();
        assert_eq!(snapshot.registrations, 2);
        assert_eq!(snapshot.accounts, 3);
        assert_eq!(snapshot.pending_models, 1);
        assert_eq!(snapshot.active_models, 1);
        assert_eq!(snapshot.online_models, 1);
        assert_eq!(snapshot.active_sessions, 1);
        assert_eq!(snapshot.active_calls, 1);
        assert!(snapshot.uptime_seconds >= 0);
    }
}
