#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use kbchat_backend::core::config::Settings;
use kbchat_backend::core::errors::ApiError;
use kbchat_backend::llm::types::ChatRequest;
use kbchat_backend::llm::LlmProvider;
use kbchat_backend::retrieval::{RetrievedDocument, Retriever};
use kbchat_backend::server::router::router;
use kbchat_backend::state::AppState;
use kbchat_backend::storage::{LinkSigner, SignerError};

pub fn test_settings() -> Settings {
    Settings {
        knowledge_base_id: "KBTEST".to_string(),
        model_id: "test-model".to_string(),
        region: "us-east-1".to_string(),
        api_token: "test-token".to_string(),
        retriever_endpoint: "http://127.0.0.1:1".to_string(),
        runtime_endpoint: "http://127.0.0.1:1".to_string(),
        signer_endpoint: "http://127.0.0.1:1".to_string(),
        top_k: 4,
        link_expiry_secs: 300,
        log_dir: None,
    }
}

pub fn return_policy_document() -> RetrievedDocument {
    RetrievedDocument {
        page_content: "Items may be returned within 30 days of purchase.".to_string(),
        metadata: json!({
            "location": { "s3Location": { "uri": "s3://docs/returns.pdf" } },
            "score": 0.87,
        }),
    }
}

pub struct MockRetriever {
    pub documents: Vec<RetrievedDocument>,
}

#[async_trait]
impl Retriever for MockRetriever {
    async fn retrieve(
        &self,
        _query: &str,
        _top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, ApiError> {
        Ok(self.documents.clone())
    }
}

pub struct FailingRetriever;

#[async_trait]
impl Retriever for FailingRetriever {
    async fn retrieve(
        &self,
        _query: &str,
        _top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, ApiError> {
        Err(ApiError::Upstream("knowledge base unavailable".to_string()))
    }
}

pub struct MockProvider {
    pub answer: String,
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        Ok(true)
    }

    async fn chat(&self, _request: ChatRequest, _model_id: &str) -> Result<String, ApiError> {
        Ok(self.answer.clone())
    }

    async fn stream_chat(
        &self,
        _request: ChatRequest,
        _model_id: &str,
    ) -> Result<mpsc::Receiver<Result<String, ApiError>>, ApiError> {
        let (tx, rx) = mpsc::channel(8);
        let answer = self.answer.clone();
        tokio::spawn(async move {
            for fragment in answer.split_inclusive(' ') {
                if tx.send(Ok(fragment.to_string())).await.is_err() {
                    return;
                }
            }
        });
        Ok(rx)
    }
}

pub enum MockSigner {
    Signed,
    Unauthorized,
}

#[async_trait]
impl LinkSigner for MockSigner {
    async fn sign(
        &self,
        bucket: &str,
        key: &str,
        expires_in: u64,
    ) -> Result<String, SignerError> {
        match self {
            MockSigner::Signed => Ok(format!(
                "https://signed.example/{}/{}?expires={}",
                bucket, key, expires_in
            )),
            MockSigner::Unauthorized => Err(SignerError::Unauthorized),
        }
    }
}

pub fn app_state(
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn LlmProvider>,
    signer: Arc<dyn LinkSigner>,
) -> Arc<AppState> {
    AppState::new(test_settings(), retriever, llm, signer)
}

/// Serve the router on an ephemeral local port and return its address.
pub async fn spawn_app(state: Arc<AppState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
