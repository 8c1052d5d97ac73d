use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<i64>,
    pub max_tokens: Option<i32>,
    pub stop: Option<Vec<String>>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
            top_p: None,
            top_k: None,
            max_tokens: None,
            stop: None,
        }
    }

    pub fn with_defaults(mut self, defaults: &GenerationDefaults) -> Self {
        self.temperature = Some(defaults.temperature);
        self.top_p = Some(defaults.top_p);
        self.top_k = Some(defaults.top_k);
        self.max_tokens = Some(defaults.max_tokens);
        self.stop = Some(defaults.stop_sequences.clone());
        self
    }
}

/// Fixed decoding parameters; temperature 0 keeps answers deterministic so a
/// streamed turn and a single-shot turn agree on the same prompt.
#[derive(Debug, Clone)]
pub struct GenerationDefaults {
    pub max_tokens: i32,
    pub temperature: f64,
    pub top_k: i64,
    pub top_p: f64,
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.0,
            top_k: 250,
            top_p: 1.0,
            stop_sequences: vec!["\n\nHuman".to_string()],
        }
    }
}
