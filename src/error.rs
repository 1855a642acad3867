//! Error types for the timer core

use thiserror::Error;

/// Errors produced by the timer store and its collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Timer creation input was rejected; the store is unchanged
    #[error("validation error: {0}")]
    Validation(String),

    /// Persisted data could not be read back at load time
    #[error("stored timers are unreadable: {0}")]
    StorageCorrupt(String),

    /// Saving the timer collection failed; memory stays authoritative
    #[error("failed to persist timers: {0}")]
    PersistenceWrite(String),

    /// Every timer id has been handed out
    #[error("no timer ids left after {0}")]
    IdsExhausted(u64),

    /// The shared state lock was poisoned by a panicking holder
    #[error("failed to lock timer store: {0}")]
    Lock(String),
}

/// Errors raised while delivering a notification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Nobody is listening for notifications right now
    #[error("no notification receivers available")]
    NoReceivers,

    /// The sink failed for some other reason
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}
