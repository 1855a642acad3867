//! Log-only notification sink

use tracing::info;

use super::NotificationSink;
use crate::{error::NotifyError, state::Timer};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify_halfway(&self, timer: &Timer) -> Result<(), NotifyError> {
        info!(
            "Halfway alert: {} has reached halfway ({} seconds)",
            timer.name, timer.halfway_threshold
        );
        Ok(())
    }

    fn notify_completion(&self, timer: &Timer) -> Result<(), NotifyError> {
        info!("Timer completed: {} ({})", timer.name, timer.category);
        Ok(())
    }
}
