use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let provider_reachable = state.llm.health_check().await.unwrap_or(false);
    Json(json!({
        "model_id": state.settings.model_id,
        "knowledge_base_id": state.settings.knowledge_base_id,
        "region": state.settings.region,
        "provider": state.llm.name(),
        "provider_reachable": provider_reachable,
    }))
}
