//! Citation model: a 1:1 projection of retrieved documents, shown alongside
//! the generated answer with a link back to the source object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retrieval::RetrievedDocument;

#[derive(Debug, Error, PartialEq)]
pub enum CitationError {
    #[error("citation metadata is missing the source location uri")]
    MissingLocation,
    #[error("citation metadata is missing the relevance score")]
    MissingScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub page_content: String,
    pub metadata: serde_json::Value,
}

impl Citation {
    /// The storage URI of the source document (`s3://bucket/key`).
    ///
    /// Absence means the retrieval service violated its contract; the error
    /// propagates instead of the citation being dropped.
    pub fn source_uri(&self) -> Result<&str, CitationError> {
        self.metadata["location"]["s3Location"]["uri"]
            .as_str()
            .ok_or(CitationError::MissingLocation)
    }

    /// The retrieval relevance score.
    pub fn score(&self) -> Result<f64, CitationError> {
        self.metadata["score"]
            .as_f64()
            .ok_or(CitationError::MissingScore)
    }
}

/// Project retrieved documents into citations, preserving length, order and
/// field values exactly.
pub fn project_citations(documents: &[RetrievedDocument]) -> Vec<Citation> {
    documents
        .iter()
        .map(|doc| Citation {
            page_content: doc.page_content.clone(),
            metadata: doc.metadata.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(content: &str, uri: &str, score: f64) -> RetrievedDocument {
        RetrievedDocument {
            page_content: content.to_string(),
            metadata: json!({
                "location": { "s3Location": { "uri": uri } },
                "score": score,
            }),
        }
    }

    #[test]
    fn projection_preserves_length_order_and_fields() {
        let documents = vec![
            document("first chunk", "s3://docs/a.pdf", 0.91),
            document("second chunk", "s3://docs/b/c.txt", 0.42),
        ];

        let citations = project_citations(&documents);

        assert_eq!(citations.len(), documents.len());
        for (citation, doc) in citations.iter().zip(documents.iter()) {
            assert_eq!(citation.page_content, doc.page_content);
            assert_eq!(citation.metadata, doc.metadata);
        }
        assert_eq!(citations[0].source_uri().unwrap(), "s3://docs/a.pdf");
        assert_eq!(citations[1].score().unwrap(), 0.42);
    }

    #[test]
    fn empty_input_projects_to_empty() {
        assert!(project_citations(&[]).is_empty());
    }

    #[test]
    fn missing_location_is_a_data_error() {
        let citation = Citation {
            page_content: "chunk".to_string(),
            metadata: json!({ "score": 0.5 }),
        };
        assert_eq!(citation.source_uri(), Err(CitationError::MissingLocation));
    }

    #[test]
    fn missing_score_is_a_data_error() {
        let citation = Citation {
            page_content: "chunk".to_string(),
            metadata: json!({
                "location": { "s3Location": { "uri": "s3://docs/a.pdf" } }
            }),
        };
        assert_eq!(citation.score(), Err(CitationError::MissingScore));
    }
}
