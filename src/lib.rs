//! Timer Deck - categorized countdown timers with halfway alerts
//!
//! The core keeps a collection of named, categorized countdown timers, ticks
//! every running one once per second, persists the collection through a
//! pluggable key-value gateway, and reports halfway and completion events to
//! a pluggable notification sink exactly once each.

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod persistence;
pub mod session;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{NotifyError, TimerError};
pub use session::TimerSession;
pub use state::{AppState, Timer, TimerEvent, TimerEventKind, TimerStatus};
pub use utils::signals::shutdown_signal;
