//! Persistence gateway module
//!
//! The timer collection is stored as a single serialized blob under one key
//! of an abstract key-value store. Hosts pick the backend.

pub mod file;
pub mod memory;

pub use file::FileGateway;
pub use memory::MemoryGateway;

use crate::error::TimerError;

/// Key under which the serialized timer collection lives
pub const TIMERS_KEY: &str = "timers";

/// Key-value storage backing the timer store
pub trait PersistenceGateway: Send + Sync {
    /// Fetch the value stored under `key`, `None` if nothing was saved yet
    fn get(&self, key: &str) -> Result<Option<String>, TimerError>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), TimerError>;
}
