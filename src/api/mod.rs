//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.
//! Handlers only forward user actions to the shared timer state.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{notify::BroadcastSink, state::AppState};
use handlers::*;

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct ApiState {
    pub timers: Arc<AppState>,
    /// Source of the live notification stream
    pub events: BroadcastSink,
}

/// Create the HTTP router with all endpoints
pub fn create_router(timers: Arc<AppState>, events: BroadcastSink) -> Router {
    Router::new()
        .route("/timers", get(list_timers_handler).post(create_timer_handler))
        .route("/timers/:id", get(get_timer_handler))
        .route("/timers/:id/start", post(start_timer_handler))
        .route("/timers/:id/pause", post(pause_timer_handler))
        .route("/timers/:id/reset", post(reset_timer_handler))
        .route("/timers/:id/halfway-alert", put(halfway_alert_handler))
        .route("/categories", get(categories_handler))
        .route("/categories/:category/start", post(start_category_handler))
        .route("/categories/:category/pause", post(pause_category_handler))
        .route("/history", get(history_handler))
        .route("/events", get(events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ApiState { timers, events })
}
