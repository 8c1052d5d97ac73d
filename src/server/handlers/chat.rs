use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::citations::project_citations;
use crate::core::errors::ApiError;
use crate::history::ConversationTurn;
use crate::retrieval::RetrievedDocument;
use crate::state::AppState;
use crate::storage::resolve_source_link;

#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    pub message: String,
}

/// A rendered citation: excerpt, source pointer and a signed download link.
/// An empty `url` means link resolution failed and the client renders an
/// "unavailable" fallback instead of a broken link.
#[derive(Debug, Clone, Serialize)]
pub struct CitationView {
    pub page_content: String,
    pub source_uri: String,
    pub score: f64,
    pub url: String,
}

/// Project the retrieved context into citations with resolved source links,
/// preserving retrieval-rank order.
pub async fn render_citations(
    state: &AppState,
    context: &[RetrievedDocument],
) -> Result<Vec<CitationView>, ApiError> {
    let citations = project_citations(context);
    let mut views = Vec::with_capacity(citations.len());
    for citation in citations {
        let source_uri = citation.source_uri()?.to_string();
        let score = citation.score()?;
        let url = resolve_source_link(
            state.signer.as_ref(),
            &source_uri,
            state.settings.link_expiry_secs,
        )
        .await;
        views.push(CitationView {
            page_content: citation.page_content,
            source_uri,
            score,
            url,
        });
    }
    Ok(views)
}

/// Single-shot turn: read history, run the pipeline to completion, resolve
/// citations, then append the question and answer to the transcript. A failed
/// turn appends nothing.
pub async fn chat_turn(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(payload): Json<ChatTurnRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = payload.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let history = state.history.turns(&session_id).await;
    let result = state.pipeline.invoke(&message, &history).await?;
    let citations = render_citations(&state, &result.context).await?;

    state
        .history
        .append(&session_id, ConversationTurn::user(message.as_str()))
        .await;
    state
        .history
        .append(&session_id, ConversationTurn::assistant(result.response.as_str()))
        .await;

    Ok(Json(json!({
        "response": result.response,
        "citations": citations,
    })))
}
