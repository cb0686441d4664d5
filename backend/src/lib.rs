//! # Daily Tracker Backend
//!
//! Web backend for a small personal productivity app: a daily habit tracker
//! and a problem tracker with step-by-step resolution plans, plus a
//! voice-note suggestion feature backed by an external generative-AI service.
//!
//! Layered architecture, UI-agnostic:
//! ```text
//! IO Layer (REST API, axum handlers)
//!     |
//! Domain Layer (services)
//!     |
//! Storage Layer (SQLite via sqlx)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::{HabitService, ProblemService, SuggestionService};
use crate::io::rest;
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub habit_service: HabitService,
    pub problem_service: ProblemService,
    pub suggestion_service: SuggestionService,
}

/// Initialize the backend with all required services.
///
/// A missing or unreachable database is not fatal: the habit catalog degrades
/// to seed data and writes are rejected until storage comes back.
pub async fn initialize_backend(config: Config) -> AppState {
    let db = match &config.database_url {
        Some(url) => {
            info!("Setting up database");
            match DbConnection::new(url).await {
                Ok(db) => Some(db),
                Err(e) => {
                    error!("Failed to connect to database, running degraded: {}", e);
                    None
                }
            }
        }
        None => {
            warn!("DATABASE_URL not set, running on seed data only");
            None
        }
    };

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set, suggestions disabled");
    }

    info!("Setting up application state");
    AppState {
        habit_service: HabitService::new(db.clone()),
        problem_service: ProblemService::new(db),
        suggestion_service: SuggestionService::new(config.gemini_api_key),
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow the dev frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/habits", rest::habit_apis::router())
        .nest("/problems", rest::problem_apis::router())
        .nest("/suggestions", rest::suggestion_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
