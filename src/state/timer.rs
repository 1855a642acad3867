//! Timer entity and its per-tick state transition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerStatus {
    Paused,
    Running,
    Completed,
}

/// A named, categorized countdown timer
///
/// Serialized with camelCase field names so the stored collection keeps the
/// `{id, name, duration, remaining, category, status, halfwayAlert, halfwayThreshold}`
/// record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: u64,
    pub name: String,
    /// Total length in seconds, fixed at creation
    pub duration: u64,
    /// Seconds left, always within `0..=duration`
    pub remaining: u64,
    pub category: String,
    pub status: TimerStatus,
    /// Fire a single halfway notification, then switch off
    pub halfway_alert: bool,
    /// Remaining seconds at which the halfway alert fires
    #[serde(alias = "halfwayDuration")]
    pub halfway_threshold: u64,
}

/// Kind of notification a tick can produce for one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerEventKind {
    Halfway,
    Completed,
}

/// A notification emitted by the tick scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEvent {
    pub kind: TimerEventKind,
    pub timer: Timer,
    pub at: DateTime<Utc>,
}

impl TimerEvent {
    pub fn new(kind: TimerEventKind, timer: Timer) -> Self {
        Self {
            kind,
            timer,
            at: Utc::now(),
        }
    }
}

impl Timer {
    /// Create a paused timer with a full countdown
    ///
    /// Input validation lives in the store; this only builds the record.
    pub fn new(id: u64, name: String, duration: u64, category: String) -> Self {
        Self {
            id,
            name,
            duration,
            remaining: duration,
            category,
            status: TimerStatus::Paused,
            halfway_alert: false,
            halfway_threshold: duration / 2,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn is_completed(&self) -> bool {
        self.status == TimerStatus::Completed
    }

    /// Fraction of the countdown already elapsed, in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        (self.duration - self.remaining) as f64 / self.duration as f64
    }

    /// Check the record against the entity invariants
    pub fn is_consistent(&self) -> bool {
        self.duration > 0
            && self.remaining <= self.duration
            && self.halfway_threshold <= self.duration
            && (self.status != TimerStatus::Completed || self.remaining == 0)
    }

    /// Compute this timer's state after one tick
    ///
    /// Completion is detected when a running timer enters the tick with
    /// nothing left, so the tick that brings `remaining` to zero does not
    /// itself complete the timer.
    pub fn advance(&self) -> (Timer, Option<TimerEventKind>) {
        if self.status != TimerStatus::Running {
            return (self.clone(), None);
        }

        let mut next = self.clone();
        if self.remaining == 0 {
            next.status = TimerStatus::Completed;
            return (next, Some(TimerEventKind::Completed));
        }

        tracing::trace!(
            "Timer {} ({}) progress {:.2}",
            self.id,
            self.name,
            self.progress()
        );

        let mut event = None;
        if self.halfway_alert && self.remaining == self.halfway_threshold {
            next.halfway_alert = false;
            event = Some(TimerEventKind::Halfway);
        }
        next.remaining -= 1;

        (next, event)
    }

    /// Restore the full countdown and park the timer
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.status = TimerStatus::Paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(duration: u64) -> Timer {
        let mut timer = Timer::new(1, "Tea".to_string(), duration, "Kitchen".to_string());
        timer.status = TimerStatus::Running;
        timer
    }

    #[test]
    fn new_timer_starts_paused_and_full() {
        let timer = Timer::new(7, "Laundry".to_string(), 11, "Home".to_string());
        assert_eq!(timer.remaining, 11);
        assert_eq!(timer.status, TimerStatus::Paused);
        assert_eq!(timer.halfway_threshold, 5);
        assert!(!timer.halfway_alert);
    }

    #[test]
    fn paused_timer_does_not_advance() {
        let timer = Timer::new(1, "Tea".to_string(), 5, "Kitchen".to_string());
        let (next, event) = timer.advance();
        assert_eq!(next, timer);
        assert!(event.is_none());
    }

    #[test]
    fn completion_is_detected_one_tick_after_zero() {
        let mut timer = running(3);
        for expected in [2, 1, 0] {
            let (next, event) = timer.advance();
            assert_eq!(next.remaining, expected);
            assert_eq!(next.status, TimerStatus::Running);
            assert!(event.is_none());
            timer = next;
        }

        let (next, event) = timer.advance();
        assert_eq!(event, Some(TimerEventKind::Completed));
        assert_eq!(next.status, TimerStatus::Completed);
        assert_eq!(next.remaining, 0);

        let (after, event) = next.advance();
        assert!(event.is_none());
        assert_eq!(after, next);
    }

    #[test]
    fn halfway_fires_once_and_disables_itself() {
        let mut timer = running(10);
        timer.halfway_alert = true;

        let mut fired = 0;
        for _ in 0..10 {
            let (next, event) = timer.advance();
            if event == Some(TimerEventKind::Halfway) {
                fired += 1;
                assert_eq!(timer.remaining, 5);
                assert_eq!(next.remaining, 4);
                assert!(!next.halfway_alert);
            }
            timer = next;
        }
        assert_eq!(fired, 1);
        assert_eq!(timer.remaining, 0);
    }

    #[test]
    fn halfway_without_alert_stays_silent() {
        let mut timer = running(4);
        for _ in 0..4 {
            let (next, event) = timer.advance();
            assert!(event.is_none());
            timer = next;
        }
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut timer = running(4);
        assert_eq!(timer.progress(), 0.0);
        timer.remaining = 1;
        assert_eq!(timer.progress(), 0.75);
    }

    #[test]
    fn reset_restores_full_duration_from_completed() {
        let mut timer = running(2);
        timer.remaining = 0;
        timer.status = TimerStatus::Completed;
        timer.reset();
        assert_eq!(timer.remaining, 2);
        assert_eq!(timer.status, TimerStatus::Paused);
    }

    #[test]
    fn legacy_halfway_duration_field_is_accepted() {
        let json = r#"{"id":1,"name":"Tea","duration":6,"remaining":6,"category":"Kitchen","status":"Paused","halfwayAlert":false,"halfwayDuration":3}"#;
        let timer: Timer = serde_json::from_str(json).unwrap();
        assert_eq!(timer.halfway_threshold, 3);

        let saved = serde_json::to_string(&timer).unwrap();
        assert!(saved.contains("\"halfwayThreshold\":3"));
    }
}
