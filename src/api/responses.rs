//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{CategoryGroup, StoreSummary, Timer};

/// Body of POST /timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimerRequest {
    pub name: String,
    /// Seconds; signed so that negative input reaches validation
    pub duration: i64,
    pub category: String,
}

/// Body of PUT /timers/:id/halfway-alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalfwayAlertRequest {
    pub enabled: bool,
}

/// A timer together with its elapsed fraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    pub progress: f64,
}

impl From<Timer> for TimerView {
    fn from(timer: Timer) -> Self {
        let progress = timer.progress();
        Self { timer, progress }
    }
}

/// Response for single-timer actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    pub fn ok(message: String, timer: Timer) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            timer: timer.into(),
        }
    }
}

/// Response for bulk category actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResponse {
    pub category: String,
    pub changed: Vec<u64>,
    pub timestamp: DateTime<Utc>,
}

/// One category with its timers, as listed by GET /categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryView {
    pub category: String,
    pub running: usize,
    pub completed: usize,
    pub timers: Vec<TimerView>,
}

impl From<CategoryGroup> for CategoryView {
    fn from(group: CategoryGroup) -> Self {
        Self {
            category: group.category,
            running: group.running,
            completed: group.completed,
            timers: group.timers.into_iter().map(TimerView::from).collect(),
        }
    }
}

/// Service status with store counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timers: usize,
    pub running: usize,
    pub completed: usize,
    pub persistence_ok: bool,
    pub persistence_error: Option<String>,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl StatusResponse {
    pub fn new(
        summary: StoreSummary,
        uptime: String,
        last_action: Option<String>,
        last_action_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            timers: summary.total,
            running: summary.running,
            completed: summary.completed,
            persistence_ok: summary.persistence_error.is_none(),
            persistence_error: summary.persistence_error,
            uptime,
            last_action,
            last_action_time,
        }
    }
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
