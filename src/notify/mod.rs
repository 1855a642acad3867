//! Notification sink module
//!
//! Receives halfway and completion notices from the tick scheduler. The
//! scheduler calls each method at most once per transition and only logs a
//! failed delivery.

pub mod broadcast;
pub mod tracing_sink;

pub use broadcast::BroadcastSink;
pub use tracing_sink::TracingSink;

use crate::{
    error::NotifyError,
    state::{Timer, TimerEvent, TimerEventKind},
};

pub trait NotificationSink: Send + Sync {
    fn notify_halfway(&self, timer: &Timer) -> Result<(), NotifyError>;

    fn notify_completion(&self, timer: &Timer) -> Result<(), NotifyError>;
}

/// Route one scheduler event to the matching sink method
pub fn deliver(sink: &dyn NotificationSink, event: &TimerEvent) -> Result<(), NotifyError> {
    match event.kind {
        TimerEventKind::Halfway => sink.notify_halfway(&event.timer),
        TimerEventKind::Completed => sink.notify_completion(&event.timer),
    }
}
