use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};

use super::protocol::{WsIncomingMessage, WS_APP_PROTOCOL};
use crate::core::errors::ApiError;
use crate::history::ConversationTurn;
use crate::pipeline::PipelineUpdate;
use crate::server::handlers::chat::render_citations;
use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.protocols([WS_APP_PROTOCOL])
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// One socket serves one interactive session loop. Messages are handled
/// strictly sequentially: a turn runs to stream exhaustion before the next
/// incoming message is picked up.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut current_session_id = "default".to_string();

    while let Some(Ok(msg)) = receiver.next().await {
        let incoming = match msg {
            Message::Text(text) => match serde_json::from_str::<WsIncomingMessage>(&text) {
                Ok(incoming) => incoming,
                Err(_) => continue,
            },
            Message::Close(_) => break,
            _ => continue,
        };

        if let Err(err) =
            handle_message(&mut sender, &state, &mut current_session_id, incoming).await
        {
            let _ = send_json(
                &mut sender,
                json!({"type": "error", "message": err.to_string()}),
            )
            .await;
        }
    }
}

async fn handle_message(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &Arc<AppState>,
    current_session_id: &mut String,
    data: WsIncomingMessage,
) -> Result<(), ApiError> {
    if let Some(session_id) = data.session_id {
        *current_session_id = session_id;
    }

    match data.msg_type.as_deref().unwrap_or("") {
        "chat" => {
            let message = data.message.unwrap_or_default();
            if message.trim().is_empty() {
                return Ok(());
            }
            run_streamed_turn(sender, state, current_session_id, message.trim()).await
        }
        "get_history" => send_history(sender, state, current_session_id).await,
        "clear_session" => {
            state.history.clear(current_session_id).await;
            send_history(sender, state, current_session_id).await
        }
        _ => Ok(()),
    }
}

/// Incremental turn: forward the context once it is known, then each response
/// fragment as it arrives, and finish with a `done` event carrying the folded
/// response plus resolved citations. A failed turn emits `error` and leaves
/// the transcript untouched.
async fn run_streamed_turn(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &Arc<AppState>,
    session_id: &str,
    message: &str,
) -> Result<(), ApiError> {
    let history = state.history.turns(session_id).await;
    let mut updates = state.pipeline.stream(message, &history).await?;

    let mut response = String::new();
    let mut context = Vec::new();

    while let Some(update) = updates.recv().await {
        match update? {
            PipelineUpdate::Context(documents) => {
                send_json(
                    sender,
                    json!({"type": "context", "documents": &documents}),
                )
                .await?;
                context = documents;
            }
            PipelineUpdate::Fragment(text) => {
                send_json(sender, json!({"type": "chunk", "content": &text})).await?;
                response.push_str(&text);
            }
        }
    }

    let citations = render_citations(state, &context).await?;

    state
        .history
        .append(session_id, ConversationTurn::user(message))
        .await;
    state
        .history
        .append(session_id, ConversationTurn::assistant(response.as_str()))
        .await;

    send_json(
        sender,
        json!({
            "type": "done",
            "response": response,
            "citations": citations,
            "sessionId": session_id,
        }),
    )
    .await
}

async fn send_history(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &Arc<AppState>,
    session_id: &str,
) -> Result<(), ApiError> {
    let messages = state.history.turns(session_id).await;
    send_json(
        sender,
        json!({"type": "history", "sessionId": session_id, "messages": messages}),
    )
    .await
}

async fn send_json(
    sender: &mut SplitSink<WebSocket, Message>,
    payload: Value,
) -> Result<(), ApiError> {
    sender
        .send(Message::Text(payload.to_string()))
        .await
        .map_err(ApiError::internal)
}
