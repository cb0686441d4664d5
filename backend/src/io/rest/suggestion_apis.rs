//! # REST API for Voice Suggestions
//!
//! Accepts a raw audio payload and answers with a short textual suggestion
//! from the external generative-AI service. Always 200; an empty suggestion
//! means none was available.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::info;

use crate::AppState;
use shared::SuggestionResponse;

const DEFAULT_MIME_TYPE: &str = "audio/webm";

/// Create a router for suggestion related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(get_suggestion))
}

/// Turn a recorded voice note into a short suggestion
async fn get_suggestion(
    State(state): State<AppState>,
    headers: HeaderMap,
    audio: Bytes,
) -> impl IntoResponse {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();

    info!("POST /api/suggestions - {} bytes, {}", audio.len(), mime_type);

    let suggestion = state
        .suggestion_service
        .get_suggestion(&audio, &mime_type)
        .await;

    Json(SuggestionResponse { suggestion })
}
