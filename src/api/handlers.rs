//! HTTP request handlers

use super::types::{
    CancelResponse, ChatRequest, ChatResponse, ErrorResponse, ModelInfo, ModelsResponse,
    ResetResponse, SessionResponse, SuccessResponse,
};
use super::AppState;
use crate::chat::{ChatId, StoreError};
use crate::llm::all_models;
use crate::surface::{Snapshot, SubmitOutcome, SurfaceError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        // Chat set
        .route(
            "/api/chats",
            get(list_chats).post(create_chat).delete(clear_chats),
        )
        .route("/api/chats/active", get(get_active_chat))
        .route("/api/chats/:id", get(get_chat))
        .route("/api/chats/:id/select", post(select_chat))
        .route("/api/chats/:id/messages", post(send_to_chat))
        // Active chat
        .route("/api/chat", post(send_to_active))
        .route("/api/chat/cancel", post(cancel_request))
        // AI session
        .route("/api/session", get(get_session))
        .route("/api/session/reset", post(reset_session))
        .route("/api/models", get(list_models))
        .with_state(state)
}

#[allow(clippy::unused_async)] // axum handlers are async
async fn root() -> &'static str {
    "Aarogya chat service is running"
}

// ============================================================
// Chats
// ============================================================

async fn list_chats(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.surface.snapshot().await)
}

async fn create_chat(State(state): State<AppState>) -> Result<Json<ChatResponse>, AppError> {
    let chat = state.surface.new_chat().await?;
    Ok(Json(ChatResponse { chat }))
}

async fn clear_chats(State(state): State<AppState>) -> Json<SuccessResponse> {
    state.surface.clear_all().await;
    Json(SuccessResponse { success: true })
}

async fn get_active_chat(State(state): State<AppState>) -> Result<Json<ChatResponse>, AppError> {
    let chat = state
        .surface
        .active_chat()
        .await
        .ok_or(SurfaceError::NoActiveChat)?;
    Ok(Json(ChatResponse { chat }))
}

async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<ChatId>,
) -> Result<Json<ChatResponse>, AppError> {
    let chat = state
        .surface
        .chat(id)
        .await
        .ok_or(SurfaceError::Store(StoreError::UnknownChat(id)))?;
    Ok(Json(ChatResponse { chat }))
}

async fn select_chat(
    State(state): State<AppState>,
    Path(id): Path<ChatId>,
) -> Result<Json<ChatResponse>, AppError> {
    let chat = state.surface.select_chat(id).await?;
    Ok(Json(ChatResponse { chat }))
}

// ============================================================
// Messages
// ============================================================

async fn send_to_chat(
    State(state): State<AppState>,
    Path(id): Path<ChatId>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<SubmitOutcome>, AppError> {
    Ok(Json(state.surface.submit_to(id, &req.text).await?))
}

async fn send_to_active(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<SubmitOutcome>, AppError> {
    Ok(Json(state.surface.submit(&req.text).await?))
}

async fn cancel_request(State(state): State<AppState>) -> Json<CancelResponse> {
    let cancelled = state.surface.cancel_in_flight().await;
    Json(CancelResponse { cancelled })
}

// ============================================================
// AI session
// ============================================================

#[allow(clippy::unused_async)]
async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let (status, model) = state.surface.session_status();
    Json(SessionResponse { status, model })
}

async fn reset_session(State(state): State<AppState>) -> Json<ResetResponse> {
    let was_active = state.surface.reset_session().await;
    Json(ResetResponse { was_active })
}

#[allow(clippy::unused_async)]
async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let models = all_models()
        .iter()
        .map(|m| ModelInfo {
            id: m.id.to_string(),
            description: m.description.to_string(),
        })
        .collect();
    Json(ModelsResponse {
        models,
        default: state.model.to_string(),
    })
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<SurfaceError> for AppError {
    fn from(err: SurfaceError) -> Self {
        match err {
            SurfaceError::EmptyMessage => AppError::BadRequest(err.to_string()),
            SurfaceError::NoActiveChat | SurfaceError::Store(_) => {
                AppError::NotFound(err.to_string())
            }
            SurfaceError::Turn(_) => {
                tracing::error!(error = %err, "Chat turn failed");
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
