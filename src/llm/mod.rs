pub mod provider;
pub mod runtime;
pub mod types;

pub use provider::LlmProvider;
pub use runtime::ModelRuntimeProvider;
pub use types::{ChatMessage, ChatRequest, GenerationDefaults};
