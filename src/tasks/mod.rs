//! Background tasks module
//!
//! This module contains the periodic driver that runs alongside the HTTP server.

pub mod tick_scheduler;

// Re-export main types
pub use tick_scheduler::{tick_scheduler_task, TickHandle, TickScheduler, TICK_PERIOD};
