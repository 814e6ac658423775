//! In-memory vector index over a document's passages.
//!
//! A [`VectorIndex`] is built once per document and is immutable thereafter.
//! It stores every (passage, embedding) pair in document order and answers
//! top-k similarity searches under a caller-chosen [`SimilarityMetric`].
//! The whole index serializes with serde as an ordered record list, so it
//! can be persisted and recovered into an equivalent index.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::{Passage, ScoredPassage};
use crate::embedding::EmbeddingProvider;
use crate::error::{DocChatError, Result};

/// The similarity metric used to rank passages against a query vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Cosine similarity: scale-invariant angle between vectors.
    Cosine,
    /// Euclidean distance, reported as a negated distance so that higher
    /// scores are more similar under both metrics.
    Euclidean,
}

/// One stored (passage, embedding) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    passage: Passage,
    embedding: Vec<f32>,
}

/// An immutable in-memory index of embedded passages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

impl VectorIndex {
    /// Embed every passage once and build the index.
    ///
    /// Passage embeddings are requested in a single batch so backends with
    /// native batching pay one round trip.
    ///
    /// # Errors
    ///
    /// - [`DocChatError::EmptyDocument`] if no passage contains
    ///   non-whitespace text
    /// - [`DocChatError::Embedding`] if the provider fails
    /// - [`DocChatError::Index`] if the provider returns a mismatched number
    ///   of vectors, or a vector whose dimension disagrees with the
    ///   provider's declared [`dimensions`](EmbeddingProvider::dimensions)
    pub async fn build(
        passages: Vec<Passage>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self> {
        if passages.iter().all(|p| p.text.trim().is_empty()) {
            return Err(DocChatError::EmptyDocument);
        }

        let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        if embeddings.len() != passages.len() {
            return Err(DocChatError::Index(format!(
                "embedder returned {} vectors for {} passages",
                embeddings.len(),
                passages.len()
            )));
        }

        // Reject inconsistent providers here rather than at the first
        // search, where the same mismatch would surface as a confusing
        // query-dimension error.
        let dimensions = embedder.dimensions();
        for (i, embedding) in embeddings.iter().enumerate() {
            if embedding.len() != dimensions {
                return Err(DocChatError::Index(format!(
                    "embedder returned a {}-dimension vector for passage {i}, \
                     but declares dimension {dimensions}",
                    embedding.len()
                )));
            }
        }

        let entries = passages
            .into_iter()
            .zip(embeddings)
            .map(|(passage, embedding)| IndexEntry { passage, embedding })
            .collect::<Vec<_>>();

        info!(passage_count = entries.len(), dimensions, "built vector index");

        Ok(Self { entries, dimensions })
    }

    /// Return the `min(k, len)` passages most similar to `query_embedding`.
    ///
    /// Results are ordered by descending score; equal scores are broken by
    /// ascending passage ordinal, so search is fully deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::Index`] if the query vector's dimension does
    /// not match the stored embeddings.
    pub fn search(
        &self,
        query_embedding: &[f32],
        k: usize,
        metric: SimilarityMetric,
    ) -> Result<Vec<ScoredPassage>> {
        if query_embedding.len() != self.dimensions {
            return Err(DocChatError::Index(format!(
                "query embedding has dimension {}, index has {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<ScoredPassage> = self
            .entries
            .iter()
            .map(|entry| {
                let score = match metric {
                    SimilarityMetric::Cosine => {
                        cosine_similarity(&entry.embedding, query_embedding)
                    }
                    SimilarityMetric::Euclidean => {
                        -euclidean_distance(&entry.embedding, query_embedding)
                    }
                };
                ScoredPassage { passage: entry.passage.clone(), score }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.passage.ordinal.cmp(&b.passage.ordinal))
        });
        scored.truncate(k);
        Ok(scored)
    }

    /// Number of passages stored in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no passages.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The dimensionality of the stored embeddings.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The stored passages in document order.
    pub fn passages(&self) -> impl Iterator<Item = &Passage> {
        self.entries.iter().map(|e| &e.passage)
    }
}
