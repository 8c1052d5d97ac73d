//! Conversation pipeline: context fetch, prompt assembly, generation.
//!
//! Stateless per call; the transcript is read by the caller and handed in as
//! the `history` input. The assembled prompt never leaves this module — the
//! result carries only the response text and the retrieved context.

pub mod prompt;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::core::errors::ApiError;
use crate::history::ConversationTurn;
use crate::llm::types::{ChatRequest, GenerationDefaults};
use crate::llm::LlmProvider;
use crate::retrieval::{RetrievedDocument, Retriever};

use prompt::build_messages;

#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub response: String,
    pub context: Vec<RetrievedDocument>,
}

/// One event of an incremental turn. The context arrives once, as soon as
/// retrieval completes; fragments follow in arrival order and concatenate to
/// the full response. Channel close is the only end-of-stream signal.
#[derive(Debug, Clone)]
pub enum PipelineUpdate {
    Context(Vec<RetrievedDocument>),
    Fragment(String),
}

pub struct ConversationPipeline {
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn LlmProvider>,
    model_id: String,
    top_k: usize,
    defaults: GenerationDefaults,
}

impl ConversationPipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        llm: Arc<dyn LlmProvider>,
        model_id: String,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            llm,
            model_id,
            top_k,
            defaults: GenerationDefaults::default(),
        }
    }

    /// Single-shot mode: blocks until all three steps complete.
    pub async fn invoke(
        &self,
        question: &str,
        history: &[ConversationTurn],
    ) -> Result<PipelineResult, ApiError> {
        let context = self.retriever.retrieve(question, self.top_k).await?;
        let request = ChatRequest::new(build_messages(history, &context, question))
            .with_defaults(&self.defaults);
        let response = self.llm.chat(request, &self.model_id).await?;
        Ok(PipelineResult { response, context })
    }

    /// Incremental mode: one `Context` update after retrieval, then response
    /// fragments until the generation collaborator signals completion.
    pub async fn stream(
        &self,
        question: &str,
        history: &[ConversationTurn],
    ) -> Result<mpsc::Receiver<Result<PipelineUpdate, ApiError>>, ApiError> {
        let context = self.retriever.retrieve(question, self.top_k).await?;
        let request = ChatRequest::new(build_messages(history, &context, question))
            .with_defaults(&self.defaults);
        let mut fragments = self.llm.stream_chat(request, &self.model_id).await?;

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            if tx.send(Ok(PipelineUpdate::Context(context))).await.is_err() {
                return;
            }
            while let Some(item) = fragments.recv().await {
                let update = item.map(PipelineUpdate::Fragment);
                if tx.send(update).await.is_err() {
                    return;
                }
            }
        });

        Ok(rx)
    }
}
