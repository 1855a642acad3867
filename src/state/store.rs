//! Timer store: the authoritative in-memory timer collection
//!
//! Every mutation is written straight back through the persistence gateway.
//! A failed write is logged and remembered but never undoes the mutation;
//! the next successful write brings storage back in line with memory.

use std::{collections::HashSet, sync::Arc};
use tracing::{debug, error, info, warn};

use super::{Timer, TimerEvent, TimerStatus};
use crate::{
    error::TimerError,
    persistence::{PersistenceGateway, TIMERS_KEY},
};

pub struct TimerStore {
    /// Kept in creation order
    timers: Vec<Timer>,
    next_id: u64,
    gateway: Arc<dyn PersistenceGateway>,
    last_persist_error: Option<TimerError>,
}

impl std::fmt::Debug for TimerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerStore")
            .field("timers", &self.timers)
            .field("next_id", &self.next_id)
            .field("last_persist_error", &self.last_persist_error)
            .finish()
    }
}

/// Serialize a timer collection into the stored record layout
pub fn serialize_timers(timers: &[Timer]) -> Result<String, TimerError> {
    serde_json::to_string(timers)
        .map_err(|e| TimerError::PersistenceWrite(format!("Failed to serialize timers: {}", e)))
}

/// Parse a stored collection
///
/// Only a blob that is not a timer list at all is [`TimerError::StorageCorrupt`].
/// Single records that break the entity invariants (for example a zero
/// duration) or repeat an earlier id are dropped with a warning so the rest
/// of the collection survives.
pub fn deserialize_timers(data: &str) -> Result<Vec<Timer>, TimerError> {
    let parsed: Vec<Timer> = serde_json::from_str(data)
        .map_err(|e| TimerError::StorageCorrupt(format!("Failed to parse timers: {}", e)))?;

    let mut seen = HashSet::with_capacity(parsed.len());
    let mut timers = Vec::with_capacity(parsed.len());
    for timer in parsed {
        if !timer.is_consistent() {
            warn!(
                "Skipping stored timer {} with inconsistent fields (duration={}, remaining={}, status={:?})",
                timer.id, timer.duration, timer.remaining, timer.status
            );
            continue;
        }
        if !seen.insert(timer.id) {
            warn!("Skipping stored timer {} '{}' with a duplicate id", timer.id, timer.name);
            continue;
        }
        timers.push(timer);
    }

    Ok(timers)
}

impl TimerStore {
    /// Create an empty store bound to `gateway`
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
            gateway,
            last_persist_error: None,
        }
    }

    /// Populate the store from the gateway
    ///
    /// Missing data leaves the store empty. Unreadable data also leaves it
    /// empty and is returned as [`TimerError::StorageCorrupt`] for the caller
    /// to report.
    pub fn load(&mut self) -> Result<usize, TimerError> {
        self.timers.clear();
        self.next_id = 1;

        let data = match self.gateway.get(TIMERS_KEY)? {
            Some(data) => data,
            None => {
                debug!("No stored timers found, starting empty");
                return Ok(0);
            }
        };

        let timers = deserialize_timers(&data)?;
        let next_id = match timers.iter().map(|t| t.id).max() {
            Some(max) => max.checked_add(1).ok_or_else(|| {
                TimerError::StorageCorrupt(format!("Timer id {} leaves no room for new timers", max))
            })?,
            None => 1,
        };
        self.next_id = next_id;
        self.timers = timers;

        info!("Loaded {} timers from storage", self.timers.len());
        Ok(self.timers.len())
    }

    /// Write the whole collection through the gateway
    pub fn persist(&mut self) -> Result<(), TimerError> {
        let result = serialize_timers(&self.timers)
            .and_then(|data| self.gateway.set(TIMERS_KEY, &data));

        match &result {
            Ok(()) => {
                if self.last_persist_error.take().is_some() {
                    info!("Timer storage recovered after earlier write failure");
                }
            }
            Err(e) => {
                self.last_persist_error = Some(e.clone());
            }
        }
        result
    }

    /// Persist and log a failure instead of returning it
    fn persist_logged(&mut self) {
        if let Err(e) = self.persist() {
            error!("{}", e);
        }
    }

    /// `None` while the last write succeeded
    pub fn last_persist_error(&self) -> Option<&TimerError> {
        self.last_persist_error.as_ref()
    }

    /// Add a new paused timer
    ///
    /// Name and category are stored as given; whitespace only matters for
    /// rejecting blank input, so " Work" and "Work" are separate categories.
    pub fn create(&mut self, name: &str, duration: i64, category: &str) -> Result<Timer, TimerError> {
        if name.trim().is_empty() {
            return Err(TimerError::Validation("name must not be empty".to_string()));
        }
        if category.trim().is_empty() {
            return Err(TimerError::Validation("category must not be empty".to_string()));
        }
        let duration = match u64::try_from(duration) {
            Ok(d) if d > 0 => d,
            _ => {
                return Err(TimerError::Validation(format!(
                    "duration must be a positive number of seconds, got {}",
                    duration
                )))
            }
        };

        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(TimerError::IdsExhausted(id))?;

        let timer = Timer::new(id, name.to_string(), duration, category.to_string());
        self.timers.push(timer.clone());

        info!("Created timer {} '{}' in '{}' ({}s)", timer.id, timer.name, timer.category, duration);
        self.persist_logged();
        Ok(timer)
    }

    /// Apply `update` to one timer and persist, `None` for an unknown id
    fn update<F>(&mut self, id: u64, update: F) -> Option<Timer>
    where
        F: FnOnce(&mut Timer),
    {
        let Some(timer) = self.timers.iter_mut().find(|t| t.id == id) else {
            debug!("Ignoring action for unknown timer {}", id);
            return None;
        };
        update(timer);
        let updated = timer.clone();
        self.persist_logged();
        Some(updated)
    }

    /// Set a timer running unless it has completed
    pub fn start(&mut self, id: u64) -> Option<Timer> {
        self.update(id, start_timer)
    }

    /// Pause a running timer
    pub fn pause(&mut self, id: u64) -> Option<Timer> {
        self.update(id, pause_timer)
    }

    /// Restore the full countdown; the only way out of `Completed`
    pub fn reset(&mut self, id: u64) -> Option<Timer> {
        self.update(id, |timer| {
            timer.reset();
            info!("Reset timer {} '{}'", timer.id, timer.name);
        })
    }

    pub fn set_halfway_alert(&mut self, id: u64, enabled: bool) -> Option<Timer> {
        self.update(id, |timer| {
            timer.halfway_alert = enabled;
            info!("Halfway alert for timer {} set to {}", timer.id, enabled);
        })
    }

    /// Advance every timer by one tick, commit, persist, and return the events
    ///
    /// The next state of every timer is computed before any of it is
    /// committed. A write failure is logged; the next tick writes again.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        let mut next = Vec::with_capacity(self.timers.len());
        let mut events = Vec::new();

        for timer in &self.timers {
            let (advanced, kind) = timer.advance();
            if let Some(kind) = kind {
                events.push(TimerEvent::new(kind, advanced.clone()));
            }
            next.push(advanced);
        }

        self.timers = next;
        if let Err(e) = self.persist() {
            warn!("Tick could not persist timers, will retry next tick: {}", e);
        }
        events
    }

    pub fn get(&self, id: u64) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    /// All timers in creation order
    pub fn list(&self) -> &[Timer] {
        &self.timers
    }

    /// Completed timers in creation order
    pub fn history(&self) -> Vec<Timer> {
        self.timers.iter().filter(|t| t.is_completed()).cloned().collect()
    }

    pub fn running_count(&self) -> usize {
        self.timers.iter().filter(|t| t.is_running()).count()
    }

    pub(crate) fn timers_mut(&mut self) -> &mut [Timer] {
        &mut self.timers
    }

    pub(crate) fn commit(&mut self) {
        self.persist_logged();
    }
}

pub(crate) fn start_timer(timer: &mut Timer) {
    if timer.status == TimerStatus::Completed {
        debug!("Timer {} already completed, start ignored", timer.id);
        return;
    }
    if timer.status != TimerStatus::Running {
        timer.status = TimerStatus::Running;
        info!("Started timer {} '{}'", timer.id, timer.name);
    }
}

pub(crate) fn pause_timer(timer: &mut Timer) {
    if timer.status == TimerStatus::Running {
        timer.status = TimerStatus::Paused;
        info!("Paused timer {} '{}' at {}s", timer.id, timer.name, timer.remaining);
    }
}
