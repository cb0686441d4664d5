//! # REST API for Problem Tracking
//!
//! Endpoints for problems and their resolution steps. Mutations answer with
//! the refreshed resource so the client can re-render the affected view.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use tracing::{error, info};

use crate::AppState;
use shared::{
    CreateProblemRequest, CreateProblemResponse, CreateStepRequest, CreateStepResponse,
    ProblemListResponse, UpdateProblemDescriptionRequest, UpdateProblemStatusRequest,
    UpdateStepRequest,
};

/// Create a router for problem related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_problems).post(create_problem))
        .route("/steps/:step_id", put(update_step))
        .route("/:problem_id", get(get_problem))
        .route("/:problem_id/status", put(update_problem_status))
        .route("/:problem_id/description", put(update_problem_description))
        .route("/:problem_id/steps", post(create_step))
}

/// List all problems, newest first
async fn list_problems(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/problems");

    let problems = state.problem_service.list_problems().await;
    Json(ProblemListResponse { problems })
}

/// Get a problem with its full step collection
async fn get_problem(
    State(state): State<AppState>,
    Path(problem_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/problems/{}", problem_id);

    match state.problem_service.get_problem(&problem_id).await {
        Ok(Some(problem)) => (StatusCode::OK, Json(problem)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Problem not found").into_response(),
        Err(e) => {
            error!("Failed to get problem {}: {}", problem_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving problem").into_response()
        }
    }
}

/// Create a new problem
async fn create_problem(
    State(state): State<AppState>,
    Json(request): Json<CreateProblemRequest>,
) -> impl IntoResponse {
    info!("POST /api/problems - title: {}", request.title);

    // Presence check lives at the boundary; the access layer trusts its input
    if request.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Title must not be empty").into_response();
    }

    match state
        .problem_service
        .create_problem(&request.title, &request.description)
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(CreateProblemResponse { id })).into_response(),
        Err(e) => {
            error!("Failed to create problem: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create problem").into_response()
        }
    }
}

/// Append a step to a problem
async fn create_step(
    State(state): State<AppState>,
    Path(problem_id): Path<String>,
    Json(request): Json<CreateStepRequest>,
) -> impl IntoResponse {
    info!("POST /api/problems/{}/steps", problem_id);

    if request.description.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Description must not be empty").into_response();
    }

    match state
        .problem_service
        .create_step(&problem_id, &request.description, &request.observations)
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(CreateStepResponse { id })).into_response(),
        Err(e) => {
            error!("Failed to create step for problem {}: {}", problem_id, e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Update a step's status and observations
async fn update_step(
    State(state): State<AppState>,
    Path(step_id): Path<String>,
    Json(request): Json<UpdateStepRequest>,
) -> impl IntoResponse {
    info!("PUT /api/problems/steps/{} - status: {}", step_id, request.status);

    match state
        .problem_service
        .update_step(&step_id, request.status, &request.observations)
        .await
    {
        Ok(Some(step)) => (StatusCode::OK, Json(step)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Step not found").into_response(),
        Err(e) => {
            error!("Failed to update step {}: {}", step_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update step").into_response()
        }
    }
}

/// Set a problem's overall status
async fn update_problem_status(
    State(state): State<AppState>,
    Path(problem_id): Path<String>,
    Json(request): Json<UpdateProblemStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /api/problems/{}/status - status: {}", problem_id, request.status);

    match state
        .problem_service
        .update_problem_status(&problem_id, request.status)
        .await
    {
        Ok(Some(problem)) => (StatusCode::OK, Json(problem)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Problem not found").into_response(),
        Err(e) => {
            error!("Failed to update problem {} status: {}", problem_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update problem").into_response()
        }
    }
}

/// Replace a problem's description
async fn update_problem_description(
    State(state): State<AppState>,
    Path(problem_id): Path<String>,
    Json(request): Json<UpdateProblemDescriptionRequest>,
) -> impl IntoResponse {
    info!("PUT /api/problems/{}/description", problem_id);

    match state
        .problem_service
        .update_problem_description(&problem_id, &request.description)
        .await
    {
        Ok(Some(problem)) => (StatusCode::OK, Json(problem)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Problem not found").into_response(),
        Err(e) => {
            error!("Failed to update problem {} description: {}", problem_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update problem").into_response()
        }
    }
}
