//! Session lifecycle tests against the file-backed store

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use timer_deck::{
    notify::NotificationSink,
    persistence::{FileGateway, PersistenceGateway, TIMERS_KEY},
    state::deserialize_timers,
    NotifyError, Timer, TimerEventKind, TimerSession, TimerStatus,
};

#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<(TimerEventKind, String)>>,
}

impl NotificationSink for CollectingSink {
    fn notify_halfway(&self, timer: &Timer) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push((TimerEventKind::Halfway, timer.name.clone()));
        Ok(())
    }

    fn notify_completion(&self, timer: &Timer) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push((TimerEventKind::Completed, timer.name.clone()));
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(FileGateway::new(dir.path()).unwrap());
    let sink = Arc::new(CollectingSink::default());

    let session = TimerSession::open(gateway.clone(), sink.clone());
    let state = session.state();
    let tea = state.create_timer("Tea", 4, "Kitchen").unwrap().id;
    let nap = state.create_timer("Nap", 20, "Home").unwrap().id;
    state.set_halfway_alert(tea, true).unwrap();
    state.start_timer(tea).unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    session.close().await;

    let saved = deserialize_timers(&gateway.get(TIMERS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].remaining, 2);
    assert!(saved[0].halfway_alert);
    assert_eq!(saved[1].status, TimerStatus::Paused);

    let reopened = TimerSession::open(gateway.clone(), sink.clone());
    let state = reopened.state();
    assert_eq!(state.get_timer(tea).unwrap().unwrap().status, TimerStatus::Running);

    tokio::time::sleep(Duration::from_millis(3500)).await;
    let timer = state.get_timer(tea).unwrap().unwrap();
    assert_eq!(timer.status, TimerStatus::Completed);
    assert_eq!(state.get_timer(nap).unwrap().unwrap().remaining, 20);
    reopened.close().await;

    let events = sink.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            (TimerEventKind::Halfway, "Tea".to_string()),
            (TimerEventKind::Completed, "Tea".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn corrupt_file_starts_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("timers.json"), "not json at all").unwrap();
    let gateway = Arc::new(FileGateway::new(dir.path()).unwrap());

    let session = TimerSession::open(gateway.clone(), Arc::new(CollectingSink::default()));
    let state = session.state();
    assert!(state.list_timers().unwrap().is_empty());

    state.create_timer("Fresh", 5, "Work").unwrap();
    session.close().await;

    let saved = deserialize_timers(&gateway.get(TIMERS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Fresh");
}
