//! In-memory gateway for embedding hosts and tests

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use super::PersistenceGateway;
use crate::error::TimerError;

#[derive(Debug, Default)]
pub struct MemoryGateway {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value` already stored under `key`
    pub fn with_value(key: &str, value: &str) -> Self {
        let gateway = Self::new();
        if let Ok(mut values) = gateway.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        gateway
    }

    /// Make every subsequent `set` fail until switched back off
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl PersistenceGateway for MemoryGateway {
    fn get(&self, key: &str) -> Result<Option<String>, TimerError> {
        let values = self
            .values
            .lock()
            .map_err(|e| TimerError::StorageCorrupt(format!("Failed to lock memory store: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TimerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TimerError::PersistenceWrite("memory store is read-only".to_string()));
        }
        let mut values = self
            .values
            .lock()
            .map_err(|e| TimerError::PersistenceWrite(format!("Failed to lock memory store: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
