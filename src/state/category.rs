//! Category aggregation and bulk actions
//!
//! Groups are derived from the store on every read; nothing here keeps state
//! of its own.

use serde::Serialize;
use tracing::info;

use super::{
    store::{pause_timer, start_timer},
    Timer, TimerStore,
};

/// Timers sharing one category, in creation order
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub running: usize,
    pub completed: usize,
    pub timers: Vec<Timer>,
}

/// Group timers by category, keeping categories in first-seen order
pub fn group_by_category(timers: &[Timer]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for timer in timers {
        let index = match groups.iter().position(|g| g.category == timer.category) {
            Some(index) => index,
            None => {
                groups.push(CategoryGroup {
                    category: timer.category.clone(),
                    running: 0,
                    completed: 0,
                    timers: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[index];
        if timer.is_running() {
            group.running += 1;
        }
        if timer.is_completed() {
            group.completed += 1;
        }
        group.timers.push(timer.clone());
    }

    groups
}

impl TimerStore {
    /// Start every non-completed timer in `category`, returning the ids that changed
    pub fn start_all(&mut self, category: &str) -> Vec<u64> {
        let changed = self.apply_to_category(category, |t| !t.is_completed() && !t.is_running(), start_timer);
        info!("Started {} timers in category '{}'", changed.len(), category);
        changed
    }

    /// Pause every running timer in `category`, returning the ids that changed
    pub fn pause_all(&mut self, category: &str) -> Vec<u64> {
        let changed = self.apply_to_category(category, Timer::is_running, pause_timer);
        info!("Paused {} timers in category '{}'", changed.len(), category);
        changed
    }

    fn apply_to_category<P, F>(&mut self, category: &str, eligible: P, action: F) -> Vec<u64>
    where
        P: Fn(&Timer) -> bool,
        F: Fn(&mut Timer),
    {
        let mut changed = Vec::new();
        for timer in self.timers_mut() {
            if timer.category == category && eligible(&*timer) {
                action(timer);
                changed.push(timer.id);
            }
        }
        self.commit();
        changed
    }
}
