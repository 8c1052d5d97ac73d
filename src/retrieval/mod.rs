//! Retrieval collaborator seam.
//!
//! The knowledge-base service owns indexing and ranking; this side only
//! issues the query and carries the ranked documents through the pipeline.

pub mod knowledge_base;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;

pub use knowledge_base::KnowledgeBaseRetriever;

/// A ranked context document as returned by the retrieval service.
///
/// `metadata` keeps the service's fields verbatim, including
/// `location.s3Location.uri` and `score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub page_content: String,
    pub metadata: serde_json::Value,
}

#[async_trait]
pub trait Retriever: Send + Sync {
    /// Fetch the `top_k` highest-ranked documents for a query.
    async fn retrieve(&self, query: &str, top_k: usize)
        -> Result<Vec<RetrievedDocument>, ApiError>;
}
