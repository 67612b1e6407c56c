//! API route handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cognito_core::{CognitoError, ConversationTurn, RefactorStyle};
use serde::Deserialize;

use crate::state::AppState;

/// Handler failure, rendered as `{"detail": "..."}` with status 500
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CognitoError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.to_string();
        tracing::error!(error = %detail, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": detail })),
        )
            .into_response()
    }
}

// ========== General Routes ==========

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the Cognito code assistant API"
    }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": cognito_core::version(),
        "provider": state.service.provider_label()
    }))
}

// ========== Copilot Routes ==========

#[derive(Debug, Deserialize)]
pub struct RefactorRequest {
    code: String,
    refactor_style: String,
}

/// Run the refactor pipeline over the submitted code
pub async fn refactor(
    State(state): State<AppState>,
    Json(req): Json<RefactorRequest>,
) -> Result<Response, ApiError> {
    let style = RefactorStyle::parse(&req.refactor_style);
    let result = state.service.refactor(&req.code, style).await?;
    Ok(Json(result).into_response())
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    code: String,
    #[serde(default)]
    history: Vec<ConversationTurn>,
    question: String,
}

/// Answer a follow-up question about the submitted code
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .service
        .chat(&req.code, &req.history, &req.question)
        .await?;
    Ok(Json(result).into_response())
}
