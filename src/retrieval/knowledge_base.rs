use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{RetrievedDocument, Retriever};
use crate::core::errors::ApiError;

/// Client for the hosted knowledge-base retrieval service.
#[derive(Clone)]
pub struct KnowledgeBaseRetriever {
    base_url: String,
    knowledge_base_id: String,
    api_token: String,
    client: Client,
}

impl KnowledgeBaseRetriever {
    pub fn new(base_url: String, knowledge_base_id: String, api_token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            knowledge_base_id,
            api_token,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Retriever for KnowledgeBaseRetriever {
    async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedDocument>, ApiError> {
        let url = format!(
            "{}/knowledgebases/{}/retrieve",
            self.base_url, self.knowledge_base_id
        );

        let body = json!({
            "retrievalQuery": { "text": query },
            "retrievalConfiguration": {
                "vectorSearchConfiguration": { "numberOfResults": top_k }
            }
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "knowledge base retrieve error: {}",
                text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::upstream)?;

        let results = payload["retrievalResults"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        let documents = results
            .into_iter()
            .map(|result| {
                let page_content = result["content"]["text"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                // Carry location and score through untouched; the citation
                // layer validates their presence.
                let metadata = json!({
                    "location": result["location"],
                    "score": result["score"],
                });
                RetrievedDocument {
                    page_content,
                    metadata,
                }
            })
            .collect();

        Ok(documents)
    }
}
