use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn list_sessions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sessions = state.history.list_sessions().await;
    Json(json!({"sessions": sessions}))
}

pub async fn create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session_id = uuid::Uuid::new_v4().to_string();
    let messages = state.history.turns(&session_id).await;
    Json(json!({"session": {"id": session_id}, "messages": messages}))
}

pub async fn get_session_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let messages = state.history.turns(&session_id).await;
    Json(json!({"messages": messages}))
}

pub async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    state.history.clear(&session_id).await;
    let messages = state.history.turns(&session_id).await;
    Json(json!({"success": true, "messages": messages}))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let removed = state.history.remove(&session_id).await;
    Json(json!({"success": removed}))
}
