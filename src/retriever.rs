//! Query-to-passages composition layer.

use std::sync::Arc;

use tracing::debug;

use crate::document::ScoredPassage;
use crate::embedding::EmbeddingProvider;
use crate::error::{DocChatError, Result};
use crate::index::{SimilarityMetric, VectorIndex};

/// Retrieves the top-k passages for a query string.
///
/// A pure composition over an [`EmbeddingProvider`] and a [`VectorIndex`]:
/// embed the query, then search. Holds no state of its own.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
    metric: SimilarityMetric,
}

impl Retriever {
    /// Create a retriever with the given embedder, result count, and metric.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, top_k: usize, metric: SimilarityMetric) -> Self {
        Self { embedder, top_k, metric }
    }

    /// Retrieve the passages most similar to `query` from `index`.
    ///
    /// # Errors
    ///
    /// - [`DocChatError::EmptyQuery`] if the query is blank or whitespace-only
    /// - [`DocChatError::Embedding`] if the embedding call fails
    /// - [`DocChatError::Index`] if the query vector does not fit the index
    pub async fn retrieve(&self, index: &VectorIndex, query: &str) -> Result<Vec<ScoredPassage>> {
        if query.trim().is_empty() {
            return Err(DocChatError::EmptyQuery);
        }

        let query_embedding = self.embedder.embed(query).await?;
        let results = index.search(&query_embedding, self.top_k, self.metric)?;

        debug!(result_count = results.len(), top_k = self.top_k, "retrieved passages");

        Ok(results)
    }
}
