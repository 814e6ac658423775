//! Configuration for the question-answering pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{DocChatError, Result};
use crate::index::SimilarityMetric;

/// Configuration parameters for a document chat session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatConfig {
    /// Target passage size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive passages.
    pub chunk_overlap: usize,
    /// Number of passages to retrieve per query.
    pub top_k: usize,
    /// Similarity metric used for vector search.
    pub metric: SimilarityMetric,
    /// Identifier of the embedding model.
    pub embedding_model: String,
    /// Identifier of the generation model.
    pub generation_model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1500,
            chunk_overlap: 150,
            top_k: 4,
            metric: SimilarityMetric::Cosine,
            embedding_model: "text-embedding-3-small".to_string(),
            generation_model: "llama3-8b-8192".to_string(),
        }
    }
}

impl ChatConfig {
    /// Create a new builder for constructing a [`ChatConfig`].
    pub fn builder() -> ChatConfigBuilder {
        ChatConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`ChatConfig`].
#[derive(Debug, Clone, Default)]
pub struct ChatConfigBuilder {
    config: ChatConfig,
}

impl ChatConfigBuilder {
    /// Set the target passage size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive passages in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of passages to retrieve per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the similarity metric used for vector search.
    pub fn metric(mut self, metric: SimilarityMetric) -> Self {
        self.config.metric = metric;
        self
    }

    /// Set the embedding model identifier.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    /// Set the generation model identifier.
    pub fn generation_model(mut self, model: impl Into<String>) -> Self {
        self.config.generation_model = model.into();
        self
    }

    /// Build the [`ChatConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::Config`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    pub fn build(self) -> Result<ChatConfig> {
        if self.config.chunk_size == 0 {
            return Err(DocChatError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(DocChatError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(DocChatError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}
