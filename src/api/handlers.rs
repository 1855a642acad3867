//! HTTP endpoint handlers

use std::convert::Infallible;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use chrono::Utc;
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::{Timer, TimerEventKind},
};
use super::{
    responses::{
        ApiResponse, BulkResponse, CategoryView, CreateTimerRequest, ErrorResponse,
        HalfwayAlertRequest, HealthResponse, StatusResponse, TimerView,
    },
    ApiState,
};

pub type ApiError = (StatusCode, Json<ErrorResponse>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(status: StatusCode, message: String) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

impl From<TimerError> for (StatusCode, Json<ErrorResponse>) {
    fn from(e: TimerError) -> Self {
        match e {
            TimerError::Validation(_) => api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            _ => {
                error!("Timer store error: {}", e);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

fn found(id: u64, timer: Option<Timer>, message: &str) -> ApiResult<ApiResponse> {
    match timer {
        Some(timer) => Ok(Json(ApiResponse::ok(message.to_string(), timer))),
        None => Err(api_error(StatusCode::NOT_FOUND, format!("Timer {} not found", id))),
    }
}

/// Handle GET /timers - List all timers in creation order
pub async fn list_timers_handler(State(api): State<ApiState>) -> ApiResult<Vec<TimerView>> {
    let timers = api.timers.list_timers()?;
    Ok(Json(timers.into_iter().map(TimerView::from).collect()))
}

/// Handle POST /timers - Create a paused timer
pub async fn create_timer_handler(
    State(api): State<ApiState>,
    Json(request): Json<CreateTimerRequest>,
) -> Result<(StatusCode, Json<ApiResponse>), ApiError> {
    match api.timers.create_timer(&request.name, request.duration, &request.category) {
        Ok(timer) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::ok("Timer created".to_string(), timer)),
        )),
        Err(e) => {
            warn!("Rejected timer creation: {}", e);
            Err(e.into())
        }
    }
}

/// Handle GET /timers/:id
pub async fn get_timer_handler(
    State(api): State<ApiState>,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse> {
    found(id, api.timers.get_timer(id)?, "Timer found")
}

/// Handle POST /timers/:id/start
pub async fn start_timer_handler(
    State(api): State<ApiState>,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse> {
    found(id, api.timers.start_timer(id)?, "Start requested")
}

/// Handle POST /timers/:id/pause
pub async fn pause_timer_handler(
    State(api): State<ApiState>,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse> {
    found(id, api.timers.pause_timer(id)?, "Pause requested")
}

/// Handle POST /timers/:id/reset
pub async fn reset_timer_handler(
    State(api): State<ApiState>,
    Path(id): Path<u64>,
) -> ApiResult<ApiResponse> {
    found(id, api.timers.reset_timer(id)?, "Timer reset")
}

/// Handle PUT /timers/:id/halfway-alert
pub async fn halfway_alert_handler(
    State(api): State<ApiState>,
    Path(id): Path<u64>,
    Json(request): Json<HalfwayAlertRequest>,
) -> ApiResult<ApiResponse> {
    let message = if request.enabled {
        "Halfway alert enabled"
    } else {
        "Halfway alert disabled"
    };
    found(id, api.timers.set_halfway_alert(id, request.enabled)?, message)
}

/// Handle GET /categories - Timers grouped by category
pub async fn categories_handler(State(api): State<ApiState>) -> ApiResult<Vec<CategoryView>> {
    let groups = api.timers.categories()?;
    Ok(Json(groups.into_iter().map(CategoryView::from).collect()))
}

/// Handle POST /categories/:category/start
pub async fn start_category_handler(
    State(api): State<ApiState>,
    Path(category): Path<String>,
) -> ApiResult<BulkResponse> {
    let changed = api.timers.start_category(&category)?;
    Ok(Json(BulkResponse {
        category,
        changed,
        timestamp: Utc::now(),
    }))
}

/// Handle POST /categories/:category/pause
pub async fn pause_category_handler(
    State(api): State<ApiState>,
    Path(category): Path<String>,
) -> ApiResult<BulkResponse> {
    let changed = api.timers.pause_category(&category)?;
    Ok(Json(BulkResponse {
        category,
        changed,
        timestamp: Utc::now(),
    }))
}

/// Handle GET /history - Completed timers
pub async fn history_handler(State(api): State<ApiState>) -> ApiResult<Vec<TimerView>> {
    let timers = api.timers.history()?;
    Ok(Json(timers.into_iter().map(TimerView::from).collect()))
}

/// Handle GET /events - Stream halfway and completion notices
pub async fn events_handler(
    State(api): State<ApiState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Event stream subscriber connected");
    let rx = api.events.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let name = match event.kind {
                        TimerEventKind::Halfway => "halfway",
                        TimerEventKind::Completed => "completed",
                    };
                    let sse = Event::default()
                        .event(name)
                        .json_data(&event)
                        .unwrap_or_else(|e| Event::default().comment(format!("unencodable event: {}", e)));
                    return Some((Ok::<_, Infallible>(sse), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream subscriber lagged, skipped {} notices", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /status - Store counters and service metadata
pub async fn status_handler(State(api): State<ApiState>) -> ApiResult<StatusResponse> {
    let summary = api.timers.summary()?;
    let (last_action, last_action_time) = api.timers.get_last_action();

    Ok(Json(StatusResponse::new(
        summary,
        api.timers.get_uptime(),
        last_action,
        last_action_time,
    )))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
