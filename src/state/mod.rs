//! State management module
//!
//! The timer entity, the store that owns every timer, category grouping, and
//! the lock-guarded state shared between the tick scheduler and the API.

pub mod app_state;
pub mod category;
pub mod store;
pub mod timer;

// Re-export main types
pub use app_state::{AppState, StoreSummary};
pub use category::{group_by_category, CategoryGroup};
pub use store::{deserialize_timers, serialize_timers, TimerStore};
pub use timer::{Timer, TimerEvent, TimerEventKind, TimerStatus};
