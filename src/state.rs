use std::sync::Arc;

use crate::core::config::Settings;
use crate::history::TranscriptStore;
use crate::llm::{LlmProvider, ModelRuntimeProvider};
use crate::pipeline::ConversationPipeline;
use crate::retrieval::{KnowledgeBaseRetriever, Retriever};
use crate::storage::{LinkSigner, SigningGateway};

/// Shared application state: configuration, collaborator handles, the
/// per-session transcript store and the pipeline built over them.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub history: TranscriptStore,
    pub llm: Arc<dyn LlmProvider>,
    pub signer: Arc<dyn LinkSigner>,
    pub pipeline: Arc<ConversationPipeline>,
}

impl AppState {
    /// Wire the state from explicit collaborator handles. Tests hand in
    /// mocks; `initialize` hands in the real clients.
    pub fn new(
        settings: Settings,
        retriever: Arc<dyn Retriever>,
        llm: Arc<dyn LlmProvider>,
        signer: Arc<dyn LinkSigner>,
    ) -> Arc<Self> {
        let pipeline = Arc::new(ConversationPipeline::new(
            retriever,
            llm.clone(),
            settings.model_id.clone(),
            settings.top_k,
        ));

        Arc::new(AppState {
            settings: Arc::new(settings),
            history: TranscriptStore::new(),
            llm,
            signer,
            pipeline,
        })
    }

    /// Build the state with the real collaborator clients.
    pub fn initialize(settings: Settings) -> Arc<Self> {
        let retriever = Arc::new(KnowledgeBaseRetriever::new(
            settings.retriever_endpoint.clone(),
            settings.knowledge_base_id.clone(),
            settings.api_token.clone(),
        ));
        let llm = Arc::new(ModelRuntimeProvider::new(
            settings.runtime_endpoint.clone(),
            settings.api_token.clone(),
        ));
        let signer = Arc::new(SigningGateway::new(
            settings.signer_endpoint.clone(),
            settings.api_token.clone(),
        ));

        Self::new(settings, retriever, llm, signer)
    }
}
