//! In-memory session transcripts.
//!
//! One transcript per session id, bootstrapped with a single assistant
//! greeting turn. Turns are append-only; `clear` resets a session back to the
//! greeting. Nothing is persisted across process restarts.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub const GREETING: &str = "How may I assist you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn initial_transcript() -> Vec<ConversationTurn> {
    vec![ConversationTurn::assistant(GREETING)]
}

#[derive(Clone, Default)]
pub struct TranscriptStore {
    sessions: Arc<RwLock<HashMap<String, Vec<ConversationTurn>>>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owned snapshot of a session's turns, bootstrapping the greeting for a
    /// session read for the first time.
    pub async fn turns(&self, session_id: &str) -> Vec<ConversationTurn> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(initial_transcript)
            .clone()
    }

    pub async fn append(&self, session_id: &str, turn: ConversationTurn) {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(initial_transcript)
            .push(turn);
    }

    /// Reset a session to its initial state: exactly one assistant greeting.
    pub async fn clear(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.to_string(), initial_transcript());
    }

    pub async fn list_sessions(&self) -> Vec<String> {
        let sessions = self.sessions.read().await;
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop a session entirely. Returns whether it existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id).is_some()
    }
}
