mod common;

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use common::{app_state, return_policy_document, spawn_app, MockProvider, MockRetriever, MockSigner};

const QUESTION: &str = "What is the return policy?";
const ANSWER: &str = "Returns are accepted within 30 days of purchase.";

async fn next_event(
    socket: &mut (impl futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
              + Unpin),
) -> Value {
    loop {
        let msg = socket.next().await.expect("stream ended").unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn streamed_turn_folds_to_the_single_shot_answer() {
    let state = app_state(
        Arc::new(MockRetriever {
            documents: vec![return_policy_document()],
        }),
        Arc::new(MockProvider {
            answer: ANSWER.to_string(),
        }),
        Arc::new(MockSigner::Signed),
    );
    let addr = spawn_app(state.clone()).await;

    let (mut socket, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

    socket
        .send(Message::Text(
            json!({"type": "chat", "message": QUESTION, "sessionId": "s1"})
                .to_string()
                .into(),
        ))
        .await
        .unwrap();

    let mut folded = String::new();
    let mut context_events = 0;
    let done = loop {
        let event = next_event(&mut socket).await;
        match event["type"].as_str().unwrap() {
            "context" => {
                context_events += 1;
                let documents = event["documents"].as_array().unwrap();
                assert_eq!(documents.len(), 1);
            }
            "chunk" => folded.push_str(event["content"].as_str().unwrap()),
            "done" => break event,
            other => panic!("unexpected event type {}", other),
        }
    };

    // The context arrives exactly once, and folding the fragments
    // reconstructs the final response.
    assert_eq!(context_events, 1);
    assert_eq!(done["response"].as_str().unwrap(), ANSWER);
    assert_eq!(folded, ANSWER);

    let citations = done["citations"].as_array().unwrap();
    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0]["source_uri"], "s3://docs/returns.pdf");
    assert!(citations[0]["url"].as_str().unwrap().contains("docs/returns.pdf"));

    // The streamed turn is recorded once, after completion.
    let turns = state.history.turns("s1").await;
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[2].content, ANSWER);
}

#[tokio::test]
async fn history_and_clear_round_trip() {
    let state = app_state(
        Arc::new(MockRetriever {
            documents: vec![return_policy_document()],
        }),
        Arc::new(MockProvider {
            answer: ANSWER.to_string(),
        }),
        Arc::new(MockSigner::Signed),
    );
    let addr = spawn_app(state).await;

    let (mut socket, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();

    socket
        .send(Message::Text(
            json!({"type": "get_history", "sessionId": "s2"})
                .to_string()
                .into(),
        ))
        .await
        .unwrap();
    let history = next_event(&mut socket).await;
    assert_eq!(history["type"], "history");
    assert_eq!(history["messages"].as_array().unwrap().len(), 1);

    socket
        .send(Message::Text(
            json!({"type": "chat", "message": QUESTION}).to_string().into(),
        ))
        .await
        .unwrap();
    loop {
        let event = next_event(&mut socket).await;
        if event["type"] == "done" {
            break;
        }
    }

    socket
        .send(Message::Text(
            json!({"type": "clear_session"}).to_string().into(),
        ))
        .await
        .unwrap();
    let cleared = next_event(&mut socket).await;
    assert_eq!(cleared["type"], "history");
    let messages = cleared["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "assistant");
}
