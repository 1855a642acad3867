//! Shared application state
//!
//! One lock guards the timer store, so a user action and a tick pass never
//! interleave. Notifications go out after the lock is released.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{group_by_category, CategoryGroup, Timer, TimerEvent, TimerStore};
use crate::{
    error::{NotifyError, TimerError},
    notify::{self, NotificationSink},
    persistence::PersistenceGateway,
};

/// Point-in-time summary of the store
#[derive(Debug, Clone)]
pub struct StoreSummary {
    pub total: usize,
    pub running: usize,
    pub completed: usize,
    pub persistence_error: Option<String>,
}

pub struct AppState {
    store: Mutex<TimerStore>,
    sink: Arc<dyn NotificationSink>,
    pub start_time: Instant,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("start_time", &self.start_time)
            .finish()
    }
}

impl AppState {
    /// Build the state and load any stored timers
    ///
    /// Unreadable storage is logged and the session starts empty.
    pub fn open(gateway: Arc<dyn PersistenceGateway>, sink: Arc<dyn NotificationSink>) -> Self {
        let mut store = TimerStore::new(gateway);
        match store.load() {
            Ok(count) => debug!("Timer store opened with {} timers", count),
            Err(e) => warn!("{}; starting with an empty timer list", e),
        }

        Self {
            store: Mutex::new(store),
            sink,
            start_time: Instant::now(),
            last_action: Mutex::new(None),
        }
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, TimerStore>, TimerError> {
        self.store
            .lock()
            .map_err(|e| TimerError::Lock(e.to_string()))
    }

    /// Run one user action under the store lock
    ///
    /// Only an action that succeeds becomes the last action.
    fn user_action<T, F>(&self, action: &str, f: F) -> Result<T, TimerError>
    where
        F: FnOnce(&mut TimerStore) -> Result<T, TimerError>,
    {
        let mut store = self.lock_store()?;
        let result = f(&mut store);
        drop(store);

        if result.is_ok() {
            if let Ok(mut last) = self.last_action.lock() {
                *last = Some((action.to_string(), Utc::now()));
            }
        }
        result
    }

    pub fn create_timer(&self, name: &str, duration: i64, category: &str) -> Result<Timer, TimerError> {
        self.user_action("create", |store| store.create(name, duration, category))
    }

    pub fn start_timer(&self, id: u64) -> Result<Option<Timer>, TimerError> {
        self.user_action("start", |store| Ok(store.start(id)))
    }

    pub fn pause_timer(&self, id: u64) -> Result<Option<Timer>, TimerError> {
        self.user_action("pause", |store| Ok(store.pause(id)))
    }

    pub fn reset_timer(&self, id: u64) -> Result<Option<Timer>, TimerError> {
        self.user_action("reset", |store| Ok(store.reset(id)))
    }

    pub fn set_halfway_alert(&self, id: u64, enabled: bool) -> Result<Option<Timer>, TimerError> {
        self.user_action("halfway-alert", |store| Ok(store.set_halfway_alert(id, enabled)))
    }

    pub fn start_category(&self, category: &str) -> Result<Vec<u64>, TimerError> {
        self.user_action("start-all", |store| Ok(store.start_all(category)))
    }

    pub fn pause_category(&self, category: &str) -> Result<Vec<u64>, TimerError> {
        self.user_action("pause-all", |store| Ok(store.pause_all(category)))
    }

    pub fn get_timer(&self, id: u64) -> Result<Option<Timer>, TimerError> {
        Ok(self.lock_store()?.get(id).cloned())
    }

    pub fn list_timers(&self) -> Result<Vec<Timer>, TimerError> {
        Ok(self.lock_store()?.list().to_vec())
    }

    pub fn history(&self) -> Result<Vec<Timer>, TimerError> {
        Ok(self.lock_store()?.history())
    }

    pub fn categories(&self) -> Result<Vec<CategoryGroup>, TimerError> {
        Ok(group_by_category(self.lock_store()?.list()))
    }

    pub fn summary(&self) -> Result<StoreSummary, TimerError> {
        let store = self.lock_store()?;
        Ok(StoreSummary {
            total: store.list().len(),
            running: store.running_count(),
            completed: store.list().iter().filter(|t| t.is_completed()).count(),
            persistence_error: store.last_persist_error().map(|e| e.to_string()),
        })
    }

    /// Run one full tick pass and deliver the resulting notifications
    pub fn tick(&self) -> Result<Vec<TimerEvent>, TimerError> {
        let events = self.lock_store()?.tick();

        for event in &events {
            match notify::deliver(self.sink.as_ref(), event) {
                Ok(()) => {}
                Err(NotifyError::NoReceivers) => {
                    debug!("No listeners for {:?} of timer {}", event.kind, event.timer.id)
                }
                Err(e) => warn!("Failed to deliver {:?} for timer {}: {}", event.kind, event.timer.id, e),
            }
        }
        Ok(events)
    }

    /// Write the current collection one last time
    pub fn flush(&self) -> Result<(), TimerError> {
        self.lock_store()?.persist()?;
        info!("Timer store flushed");
        Ok(())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, at)) => (Some(action), Some(at)),
            None => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        persistence::MemoryGateway,
        state::{TimerEventKind, TimerStatus},
    };

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<(TimerEventKind, u64)>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify_halfway(&self, timer: &Timer) -> Result<(), NotifyError> {
            self.seen.lock().unwrap().push((TimerEventKind::Halfway, timer.id));
            Ok(())
        }

        fn notify_completion(&self, timer: &Timer) -> Result<(), NotifyError> {
            self.seen.lock().unwrap().push((TimerEventKind::Completed, timer.id));
            Err(NotifyError::Delivery("display unavailable".to_string()))
        }
    }

    #[test]
    fn tick_delivers_each_event_once_despite_sink_failures() {
        let sink = Arc::new(RecordingSink::default());
        let state = AppState::open(Arc::new(MemoryGateway::new()), sink.clone());

        let a = state.create_timer("a", 2, "Work").unwrap().id;
        let b = state.create_timer("b", 2, "Work").unwrap().id;
        state.set_halfway_alert(a, true).unwrap();
        state.start_category("Work").unwrap();

        for _ in 0..6 {
            state.tick().unwrap();
        }

        let seen = sink.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                (TimerEventKind::Halfway, a),
                (TimerEventKind::Completed, a),
                (TimerEventKind::Completed, b),
            ]
        );
        assert_eq!(state.get_timer(b).unwrap().unwrap().status, TimerStatus::Completed);
        assert_eq!(state.history().unwrap().len(), 2);
    }

    #[test]
    fn last_action_is_tracked() {
        let state = AppState::open(Arc::new(MemoryGateway::new()), Arc::new(crate::notify::TracingSink));
        assert_eq!(state.get_last_action().0, None);

        assert!(state.create_timer("", 5, "Work").is_err());
        assert_eq!(state.get_last_action(), (None, None));

        let id = state.create_timer("a", 5, "Work").unwrap().id;
        assert_eq!(state.get_last_action().0.as_deref(), Some("create"));
        assert!(state.create_timer("b", 0, "Work").is_err());
        assert_eq!(state.get_last_action().0.as_deref(), Some("create"));

        state.pause_timer(id).unwrap();
        assert_eq!(state.get_last_action().0.as_deref(), Some("pause"));
        state.start_timer(id).unwrap();
        assert_eq!(state.get_last_action().0.as_deref(), Some("start"));
    }

    #[test]
    fn corrupt_storage_opens_empty() {
        let gateway = Arc::new(MemoryGateway::with_value(crate::persistence::TIMERS_KEY, "[{"));
        let state = AppState::open(gateway, Arc::new(crate::notify::TracingSink));
        assert!(state.list_timers().unwrap().is_empty());
        assert_eq!(state.summary().unwrap().total, 0);
    }
}
