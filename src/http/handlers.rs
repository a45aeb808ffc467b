use super::state::AppState;
use crate::session::{LiveSession, TurnResult};
use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User message; any JSON value is accepted and turned into text
    #[serde(default)]
    pub message: Option<Value>,
}

impl ChatRequest {
    /// The message as text. Missing, null, false, 0 and "" are empty;
    /// other numbers and booleans use their literal form, objects and
    /// arrays their JSON text.
    pub fn message_text(&self) -> String {
        match &self.message {
            None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Base64 of the reply WAV file (empty when the reply had no audio)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    fn success(text: String, audio: String) -> Self {
        Self {
            success: true,
            text: Some(text),
            audio: Some(audio),
            error: None,
        }
    }

    fn failure(error: String) -> Self {
        Self {
            success: false,
            text: None,
            audio: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /chat
/// Run one live turn with the stored memory as context
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> impl IntoResponse {
    let message = match payload {
        Ok(Json(req)) => req.message_text(),
        Err(rejection) => {
            warn!("Rejected chat body: {}", rejection.body_text());
            return (StatusCode::OK, Json(ChatResponse::failure(rejection.body_text())));
        }
    };

    info!("Chat request ({} chars)", message.chars().count());

    match converse(&state, &message).await {
        Ok(result) => {
            // The reply already exists; a memory write failure only gets logged
            if let Err(e) = state.memory.append_chat(&message, &result.text).await {
                error!("Failed to save chat history: {:#}", e);
            }

            let audio = base64::engine::general_purpose::STANDARD.encode(result.audio_bytes());

            info!(
                "Chat reply: {} text chars, {} audio bytes",
                result.text.chars().count(),
                result.audio_bytes().len()
            );

            (StatusCode::OK, Json(ChatResponse::success(result.text, audio)))
        }
        Err(e) => {
            error!("Chat turn failed: {:#}", e);
            (StatusCode::OK, Json(ChatResponse::failure(format!("{:#}", e))))
        }
    }
}

async fn converse(state: &AppState, message: &str) -> Result<TurnResult> {
    let memory = state.memory.load().await?;
    let context = memory.context_turns(message)?;
    let cancel = state.shutdown.child_token();

    LiveSession::converse(
        state.session_config(),
        state.transports.create(),
        state.sink.clone(),
        context,
        &cancel,
    )
    .await
}

/// GET /memory
/// Current memory document
pub async fn get_memory(State(state): State<AppState>) -> impl IntoResponse {
    match state.memory.load().await {
        Ok(memory) => (StatusCode::OK, Json(memory)).into_response(),
        Err(e) => {
            error!("Failed to load memory: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to load memory: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
