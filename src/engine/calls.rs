use crate::core::error::MarketError;
use crate::models::account::Standing;
use crate::stores::record_store::RecordStore;
use crate::utils::time::{current_timestamp, format_countdown};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Latest countdown state, published on every tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallUpdate {
    pub remaining_seconds: u32,
    /// `MM:SS`
    pub remaining: String,
    pub ended: bool,
}

#[derive(Debug)]
struct CallState {
    remaining_seconds: u32,
    ended_at: Option<i64>,
}

/// A live, cancellable countdown for one simulated paid call
pub struct CallHandle {
    pub id: u64,
    /// Identifier of the account that paid for the call
    pub caller: String,
    pub target: String,
    pub minutes: u32,
    /// Informational only, nothing is debited
    pub total_charge: f64,
    state: Mutex<CallState>,
    updates: watch::Sender<CallUpdate>,
}

impl CallHandle {
    fn new(id: u64, caller: String, target: String, minutes: u32, total_charge: f64) -> Self {
        let remaining_seconds = minutes * 60;
        let (updates, _) = watch::channel(CallUpdate {
            remaining_seconds,
            remaining: format_countdown(remaining_seconds),
            ended: false,
        });

        Self {
            id,
            caller,
            target,
            minutes,
            total_charge,
            state: Mutex::new(CallState {
                remaining_seconds,
                ended_at: None,
            }),
            updates,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CallState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &CallState) -> CallUpdate {
        let update = CallUpdate {
            remaining_seconds: state.remaining_seconds,
            remaining: format_countdown(state.remaining_seconds),
            ended: state.ended_at.is_some(),
        };
        self.updates.send_replace(update.clone());
        update
    }

    /// Advance the countdown by one second. Reaching zero ends the call;
    /// ticking an ended call changes nothing.
    pub fn tick(&self) -> CallUpdate {
        let mut state = self.lock();
        if state.ended_at.is_some() {
            return self.updates.borrow().clone();
        }

        state.remaining_seconds = state.remaining_seconds.saturating_sub(1);
        if state.remaining_seconds == 0 {
            state.ended_at = Some(current_timestamp());
            info!(call_id = self.id, target = %self.target, "Call expired");
        }

        self.publish(&state)
    }

    /// Stop the call now, freezing the remaining time.
    ///
    /// Returns false when the call had already ended.
    pub fn end(&self) -> bool {
        let mut state = self.lock();
        if state.ended_at.is_some() {
            return false;
        }

        state.ended_at = Some(current_timestamp());
        self.publish(&state);

        info!(
            call_id = self.id,
            target = %self.target,
            remaining_seconds = state.remaining_seconds,
            "Call ended by user"
        );
        true
    }

    pub fn snapshot(&self) -> CallUpdate {
        self.updates.borrow().clone()
    }

    pub fn is_ended(&self) -> bool {
        self.lock().ended_at.is_some()
    }

    pub fn ended_at(&self) -> Option<i64> {
        self.lock().ended_at
    }

    /// Stream of countdown updates for rendering
    pub fn subscribe(&self) -> watch::Receiver<CallUpdate> {
        self.updates.subscribe()
    }
}

/// Drive a call's countdown once per second until it ends.
///
/// `on_expired` runs once if the countdown reaches zero, not when the user
/// ends the call first.
pub fn spawn_ticker(
    handle: Arc<CallHandle>,
    on_expired: impl Fn() + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            if handle.is_ended() {
                break;
            }
            let update = handle.tick();
            if update.ended {
                // A call ended by the user always has time left
                if update.remaining_seconds == 0 {
                    on_expired();
                }
                break;
            }
        }

        debug!(call_id = handle.id, "Call ticker stopped");
    })
}

/// Starts calls and keeps their handles so they can be polled and ended.
///
/// Calls are independent: a caller may hold several at once.
pub struct CallEngine {
    store: Arc<dyn RecordStore>,
    default_rate: f64,
    max_minutes: u32,
    calls: DashMap<u64, Arc<CallHandle>>,
    next_id: AtomicU64,
}

impl CallEngine {
    pub fn new(store: Arc<dyn RecordStore>, default_rate: f64, max_minutes: u32) -> Self {
        Self {
            store,
            default_rate,
            max_minutes,
            calls: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn start_call(
        &self,
        caller: &str,
        target: &str,
        minutes: i64,
    ) -> Result<Arc<CallHandle>, MarketError> {
        if minutes < 1 || minutes > i64::from(self.max_minutes) {
            return Err(MarketError::InvalidDuration {
                minutes,
                max: self.max_minutes,
            });
        }
        let minutes = minutes as u32;

        let model = self
            .store
            .find_by_identifier(target)?
            .ok_or_else(|| MarketError::NotFound(target.to_string()))?;

        let rate = match &model.standing {
            Standing::ModelActive { profile } => profile
                .as_ref()
                .map(|p| p.rate_per_minute)
                .unwrap_or(self.default_rate),
            _ => return Err(MarketError::NotActiveModel(target.to_string())),
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let total_charge = rate * f64::from(minutes);
        let handle = Arc::new(CallHandle::new(
            id,
            caller.to_string(),
            target.to_string(),
            minutes,
            total_charge,
        ));
        self.calls.insert(id, Arc::clone(&handle));

        info!(
            call_id = id,
            caller = %caller,
            target = %target,
            minutes = minutes,
            total_charge = total_charge,
            "Call started"
        );

        Ok(handle)
    }

    pub fn get(&self, id: u64) -> Option<Arc<CallHandle>> {
        self.calls.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop ended calls older than `retention` seconds; returns how many went
    pub fn prune_ended(&self, retention: i64, current_time: i64) -> usize {
        let before = self.calls.len();
        self.calls.retain(|_, handle| match handle.ended_at() {
            Some(ended_at) => current_time - ended_at <= retention,
            None => true,
        });
        before - self.calls.len()
    }

    pub fn active_calls(&self) -> usize {
        self.calls.iter().filter(|entry| !entry.value().is_ended()).count()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lifecycle::Lifecycle;
    use crate::models::account::GenderCategory;
    use crate::stores::record_store::MemoryRecordStore;

    fn setup() -> CallEngine {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let lifecycle = Lifecycle::new(store.clone(), 10.0);

        lifecycle.register("Rina", "+880111", "pw", GenderCategory::Female).unwrap();
        lifecycle.approve("+880111").unwrap();
        lifecycle
            .save_model_profile("+880111", Some(20.0), "6-9pm".to_string(), None, true)
            .unwrap();

        lifecycle.register("Mila", "+880333", "pw", GenderCategory::Female).unwrap();
        lifecycle.register("Sam", "+880222", "pw", GenderCategory::Male).unwrap();

        CallEngine::new(store, 10.0, 120)
    }

    #[test]
    fn test_start_call_rejects_bad_durations() {
        let engine = setup();

        for minutes in [0, -1, 121] {
            let result = engine.start_call("+880222", "+880111", minutes);
            assert!(matches!(
                result,
                Err(MarketError::InvalidDuration { minutes: m, max: 120 }) if m == minutes
            ));
        }
        assert!(engine.is_empty());
    }

    #[test]
    fn test_start_call_checks_target() {
        let engine = setup();

        assert!(matches!(
            engine.start_call("+880222", "+880999", 5),
            Err(MarketError::NotFound(_))
        ));
        assert!(matches!(
            engine.start_call("+880222", "+880333", 5),
            Err(MarketError::NotActiveModel(_))
        ));
    }

    #[test]
    fn test_start_call_computes_charge() {
        let engine = setup();

        let handle = engine.start_call("+880222", "+880111", 5).unwrap();
        assert_eq!(handle.total_charge, 100.0);
        assert_eq!(handle.minutes, 5);

        let update = handle.snapshot();
        assert_eq!(update.remaining, "05:00");
        assert!(!update.ended);

        assert!(engine.start_call("+880222", "+880111", 120).is_ok());
    }

    #[test]
    fn test_tick_counts_down_and_expires() {
        let engine = setup();
        let handle = engine.start_call("+880222", "+880111", 1).unwrap();

        let update = handle.tick();
        assert_eq!(update.remaining, "00:59");
        assert!(!update.ended);

        for _ in 0..58 {
            handle.tick();
        }
        assert_eq!(handle.snapshot().remaining, "00:01");

        let update = handle.tick();
        assert_eq!(update.remaining_seconds, 0);
        assert!(update.ended);
        assert!(handle.is_ended());

        // Ticking past expiry does nothing
        let update = handle.tick();
        assert_eq!(update.remaining_seconds, 0);

        // Ending after natural expiry is a no-op
        assert!(!handle.end());
    }

    #[test]
    fn test_end_freezes_remaining_time() {
        let engine = setup();
        let handle = engine.start_call("+880222", "+880111", 5).unwrap();

        handle.tick();
        handle.tick();
        assert!(handle.end());

        let update = handle.snapshot();
        assert!(update.ended);
        assert_eq!(update.remaining, "04:58");

        handle.tick();
        assert_eq!(handle.snapshot().remaining_seconds, 298);
        assert!(!handle.end());
    }

    #[test]
    fn test_concurrent_calls_are_independent() {
        let engine = setup();
        let first = engine.start_call("+880222", "+880111", 5).unwrap();
        let second = engine.start_call("+880222", "+880111", 2).unwrap();

        assert_ne!(first.id, second.id);
        first.end();
        assert!(!second.is_ended());
        assert_eq!(engine.active_calls(), 1);
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_prune_ended() {
        let engine = setup();
        let ended = engine.start_call("+880222", "+880111", 5).unwrap();
        let live = engine.start_call("+880222", "+880111", 5).unwrap();
        ended.end();

        let ended_at = ended.ended_at().unwrap();
        assert_eq!(engine.prune_ended(300, ended_at + 10), 0);
        assert_eq!(engine.prune_ended(300, ended_at + 301), 1);

        assert!(engine.get(ended.id).is_none());
        assert!(engine.get(live.id).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_runs_on_virtual_clock() {
        let engine = setup();
        let handle = engine.start_call("+880222", "+880111", 5).unwrap();
        let _ticker = spawn_ticker(Arc::clone(&handle), || {});

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(handle.snapshot().remaining_seconds, 297);

        handle.end();
        tokio::time::sleep(Duration::from_secs(5)).await;
        let update = handle.snapshot();
        assert!(update.ended);
        assert_eq!(update.remaining_seconds, 297);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_stops_at_expiry() {
        let engine = setup();
        let handle = engine.start_call("+880222", "+880111", 1).unwrap();
        let expired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&expired);
        let ticker = spawn_ticker(Arc::clone(&handle), move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        ticker.await.unwrap();

        let update = handle.snapshot();
        assert!(update.ended);
        assert_eq!(update.remaining, "00:00");
        assert_eq!(expired.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let engine = setup();
        let handle = engine.start_call("+880222", "+880111", 1).unwrap();
        let mut rx = handle.subscribe();
        let _ticker = spawn_ticker(Arc::clone(&handle), || {});

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().remaining, "00:59");

        handle.end();
        rx.changed().await.unwrap();
        assert!(rx.borrow().ended);
    }
}
