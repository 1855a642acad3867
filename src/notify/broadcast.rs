//! Notification sink that fans events out to live subscribers

use tokio::sync::broadcast;

use super::{NotificationSink, TracingSink};
use crate::{
    error::NotifyError,
    state::{Timer, TimerEvent, TimerEventKind},
};

/// Logs every notice and forwards it on a broadcast channel
///
/// Having no subscriber is reported as [`NotifyError::NoReceivers`]; the
/// notice has still been logged at that point.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<TimerEvent>,
}

impl BroadcastSink {
    /// `capacity` is clamped to at least one buffered notice
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.tx.subscribe()
    }

    fn send(&self, kind: TimerEventKind, timer: &Timer) -> Result<(), NotifyError> {
        self.tx
            .send(TimerEvent::new(kind, timer.clone()))
            .map(|_| ())
            .map_err(|_| NotifyError::NoReceivers)
    }
}

impl NotificationSink for BroadcastSink {
    fn notify_halfway(&self, timer: &Timer) -> Result<(), NotifyError> {
        TracingSink.notify_halfway(timer)?;
        self.send(TimerEventKind::Halfway, timer)
    }

    fn notify_completion(&self, timer: &Timer) -> Result<(), NotifyError> {
        TracingSink.notify_completion(timer)?;
        self.send(TimerEventKind::Completed, timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_notices() {
        let sink = BroadcastSink::new(8);
        let mut rx = sink.subscribe();
        let timer = Timer::new(3, "Bread".to_string(), 60, "Kitchen".to_string());

        sink.notify_completion(&timer).unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, TimerEventKind::Completed);
        assert_eq!(event.timer.id, 3);
    }

    #[test]
    fn no_subscriber_is_reported() {
        let sink = BroadcastSink::new(8);
        let timer = Timer::new(3, "Bread".to_string(), 60, "Kitchen".to_string());
        assert_eq!(sink.notify_halfway(&timer), Err(NotifyError::NoReceivers));
    }
}
