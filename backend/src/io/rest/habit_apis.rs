//! # REST API for Habit Tracking
//!
//! Endpoints for listing the habit catalog, reading one day's completion
//! history, and toggling a habit for today.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;
use shared::{HabitListResponse, HistoryListResponse};

/// Query parameters for the history API
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Calendar day in YYYY-MM-DD form
    pub date: String,
}

/// Create a router for habit related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_habits))
        .route("/history", get(list_history))
        .route("/:habit_id/toggle", post(toggle_habit))
}

/// List the full habit catalog
async fn list_habits(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/habits");

    let habits = state.habit_service.list_habits().await;
    Json(HabitListResponse { habits })
}

/// List completion records for one calendar day
async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    info!("GET /api/habits/history - date: {}", query.date);

    match state.habit_service.list_history(&query.date).await {
        Ok(records) => (StatusCode::OK, Json(HistoryListResponse { records })).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

/// Toggle a habit's completion for today
async fn toggle_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/habits/{}/toggle", habit_id);

    match state.habit_service.toggle_habit(&habit_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to toggle habit {}: {}", habit_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to toggle habit").into_response()
        }
    }
}
