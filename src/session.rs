//! Timer session lifecycle
//!
//! A session owns the shared timer state together with the tick scheduler
//! that drives it. Opening loads stored timers and starts ticking; closing
//! stops the ticker and writes the collection one last time.

use std::{sync::Arc, time::Duration};
use tracing::{error, info};

use crate::{
    notify::NotificationSink,
    persistence::PersistenceGateway,
    state::AppState,
    tasks::{TickHandle, TickScheduler, TICK_PERIOD},
};

#[derive(Debug)]
pub struct TimerSession {
    state: Arc<AppState>,
    ticker: TickHandle,
}

impl TimerSession {
    /// Open a session ticking once per second
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(gateway: Arc<dyn PersistenceGateway>, sink: Arc<dyn NotificationSink>) -> Self {
        Self::open_with_period(gateway, sink, TICK_PERIOD)
    }

    pub fn open_with_period(
        gateway: Arc<dyn PersistenceGateway>,
        sink: Arc<dyn NotificationSink>,
        period: Duration,
    ) -> Self {
        let state = Arc::new(AppState::open(gateway, sink));
        let ticker = TickScheduler::spawn(Arc::clone(&state), period);
        info!("Timer session opened");
        Self { state, ticker }
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Stop ticking and flush the store
    pub async fn close(self) {
        self.ticker.stop().await;
        if let Err(e) = self.state.flush() {
            error!("Final save failed: {}", e);
        }
        info!("Timer session closed");
    }
}
