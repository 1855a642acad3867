//! Tick scheduler background task
//!
//! Drives every running timer forward once per period. Each tick runs to
//! completion under the store lock before the next one is polled, and late
//! ticks are skipped rather than bunched up.

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Default tick period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a running tick scheduler; stopping it ends the task
#[derive(Debug)]
pub struct TickHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl TickHandle {
    /// Signal the scheduler to stop and wait for it to exit
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            error!("Tick scheduler task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        // Dropped without stop(): don't leave the ticker running
        if self.stop_tx.is_some() {
            self.task.abort();
        }
    }
}

pub struct TickScheduler;

impl TickScheduler {
    /// Spawn the scheduler on the current tokio runtime
    ///
    /// The first tick fires one `period` after spawning.
    pub fn spawn(state: Arc<AppState>, period: Duration) -> TickHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(tick_scheduler_task(state, period, stop_rx));
        TickHandle {
            stop_tx: Some(stop_tx),
            task,
        }
    }
}

/// Background task that ticks the timer store until told to stop
pub async fn tick_scheduler_task(
    state: Arc<AppState>,
    period: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) {
    info!("Starting tick scheduler ({}ms period)", period.as_millis());

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match state.tick() {
                    Ok(events) if !events.is_empty() => {
                        debug!("Tick emitted {} notifications", events.len());
                    }
                    Ok(_) => {}
                    Err(e) => error!("Tick failed: {}", e),
                }
            }

            _ = &mut stop_rx => {
                info!("Tick scheduler stopping");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notify::TracingSink,
        persistence::MemoryGateway,
        state::TimerStatus,
    };

    fn state() -> Arc<AppState> {
        Arc::new(AppState::open(Arc::new(MemoryGateway::new()), Arc::new(TracingSink)))
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let state = state();
        let id = state.create_timer("Tea", 10, "Kitchen").unwrap().id;
        state.start_timer(id).unwrap();

        let handle = TickScheduler::spawn(Arc::clone(&state), TICK_PERIOD);
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(state.get_timer(id).unwrap().unwrap().remaining, 7);
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_scheduler_no_longer_ticks() {
        let state = state();
        let id = state.create_timer("Tea", 10, "Kitchen").unwrap().id;
        state.start_timer(id).unwrap();

        let handle = TickScheduler::spawn(Arc::clone(&state), TICK_PERIOD);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle.stop().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        let timer = state.get_timer(id).unwrap().unwrap();
        assert_eq!(timer.remaining, 9);
        assert_eq!(timer.status, TimerStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn drives_timer_to_completion() {
        let state = state();
        let id = state.create_timer("Egg", 2, "Kitchen").unwrap().id;
        state.start_timer(id).unwrap();

        let handle = TickScheduler::spawn(Arc::clone(&state), TICK_PERIOD);
        tokio::time::sleep(Duration::from_millis(3500)).await;
        handle.stop().await;

        let timer = state.get_timer(id).unwrap().unwrap();
        assert_eq!(timer.status, TimerStatus::Completed);
        assert_eq!(timer.remaining, 0);
    }
}
