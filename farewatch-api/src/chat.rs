use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use farewatch_core::replies;
use farewatch_shared::{ChatReply, ChatTurn};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/chat
/// Answer the last message of the transcript.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let turns = match payload {
        Ok(Json(request)) => request.messages,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unreadable chat request");
            return Ok(Json(ChatReply::text(replies::UNPROCESSABLE)));
        }
    };

    let mut rng = state.rng();
    let today = Utc::now().date_naive();
    let reply = state.assistant.respond(&turns, today, &mut rng).await?;

    Ok(Json(reply))
}
