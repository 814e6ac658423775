//! Per-session orchestration: the `load_document` / `ask` surface.
//!
//! A [`DocSession`] owns one document's [`VectorIndex`] and one append-only
//! [`SessionLog`]. Sessions share nothing: if multiple sessions run in one
//! process, each carries its own index and log, so no cross-session
//! synchronization exists.
//!
//! Query/rebuild serialization: `ask` takes a snapshot of the current index
//! (an `Arc` clone under a brief read lock) and completes against that
//! snapshot. `load_document` builds the new index without holding any lock
//! and swaps the pointer under a brief write lock. An in-flight query
//! therefore always reads the index it started with and never a half-built
//! one; no lock is held across an await of an external capability.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::chunking::{Chunker, SentenceAwareChunker};
use crate::config::ChatConfig;
use crate::document::Answer;
use crate::embedding::EmbeddingProvider;
use crate::error::{DocChatError, Result};
use crate::generation::{AnswerGenerator, GenerativeModel};
use crate::index::VectorIndex;
use crate::loader::{DocumentLoader, DocumentSource};
use crate::retriever::Retriever;

/// One (query, answer) pair in a session's history.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// The user's question, verbatim.
    pub query: String,
    /// The generated answer with its source passages.
    pub answer: Answer,
}

/// Append-only record of a session's (query, answer) pairs.
///
/// Grows monotonically for the lifetime of the session and is discarded with
/// it. Consumed read-only for audit; it feeds no conversational memory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    /// Append one (query, answer) pair.
    pub fn append(&mut self, query: impl Into<String>, answer: Answer) {
        self.entries.push(LogEntry { query: query.into(), answer });
    }

    /// The recorded entries, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lifecycle of a session's document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No document loaded.
    Empty,
    /// A load is in progress; any prior index has been discarded.
    Loading,
    /// A document is indexed and queryable.
    Indexed,
}

/// A single conversation over a single document.
///
/// Construct via [`DocSession::builder()`], then call
/// [`load_document`](DocSession::load_document) once per document and
/// [`ask`](DocSession::ask) once per question.
pub struct DocSession {
    config: ChatConfig,
    loader: DocumentLoader,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    retriever: Retriever,
    generator: AnswerGenerator,
    index: RwLock<Option<Arc<VectorIndex>>>,
    state: RwLock<SessionState>,
    log: RwLock<SessionLog>,
}

impl DocSession {
    /// Create a new [`DocSessionBuilder`].
    pub fn builder() -> DocSessionBuilder {
        DocSessionBuilder::default()
    }

    /// Return a reference to the session configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// The session's current lifecycle state.
    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    /// A snapshot of the session's (query, answer) history.
    pub async fn log(&self) -> SessionLog {
        self.log.read().await.clone()
    }

    /// Number of passages in the current index, or zero when empty.
    pub async fn passage_count(&self) -> usize {
        self.index.read().await.as_ref().map_or(0, |i| i.len())
    }

    /// Load and index a document, replacing any previously loaded one.
    ///
    /// The prior index is discarded as soon as the load begins; on failure
    /// the session is left [`SessionState::Empty`] with the error surfaced.
    ///
    /// # Errors
    ///
    /// - [`DocChatError::SourceUnreadable`] if the source cannot be fetched
    ///   or parsed
    /// - [`DocChatError::EmptyDocument`] if the source yields no text
    /// - [`DocChatError::Embedding`] if passage embedding fails
    pub async fn load_document(&self, source: &DocumentSource) -> Result<()> {
        {
            *self.index.write().await = None;
            *self.state.write().await = SessionState::Loading;
        }

        let built = self.load_and_index(source).await;

        match built {
            Ok(index) => {
                let passage_count = index.len();
                *self.index.write().await = Some(Arc::new(index));
                *self.state.write().await = SessionState::Indexed;
                info!(passage_count, "document indexed");
                Ok(())
            }
            Err(e) => {
                *self.state.write().await = SessionState::Empty;
                Err(e)
            }
        }
    }

    async fn load_and_index(&self, source: &DocumentSource) -> Result<VectorIndex> {
        let document = self.loader.load(source).await?;
        if !document.has_text() {
            return Err(DocChatError::EmptyDocument);
        }
        let passages = self.chunker.chunk(&document);
        VectorIndex::build(passages, self.embedder.as_ref()).await
    }

    /// Answer a question about the loaded document.
    ///
    /// Retrieves the top-k passages, generates a grounded answer, appends
    /// the pair to the session log, and returns the answer with its sources.
    /// The log is not appended when retrieval or generation fails.
    ///
    /// # Errors
    ///
    /// - [`DocChatError::Index`] if no document has been loaded
    /// - [`DocChatError::EmptyQuery`] on a blank query
    /// - [`DocChatError::Embedding`] if the query cannot be embedded
    /// - [`DocChatError::GenerationUnavailable`] if the model call fails
    pub async fn ask(&self, query: &str) -> Result<Answer> {
        let index = self.index.read().await.clone();
        let Some(index) = index else {
            return Err(DocChatError::Index("no document loaded".to_string()));
        };

        let passages = self.retriever.retrieve(&index, query).await?;
        let answer = self.generator.generate(query, passages).await?;

        self.log.write().await.append(query, answer.clone());

        Ok(answer)
    }
}

/// Builder for constructing a [`DocSession`].
///
/// The embedding provider and generative model are required; configuration,
/// chunker, and loader fall back to defaults derived from the configuration.
#[derive(Default)]
pub struct DocSessionBuilder {
    config: Option<ChatConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    model: Option<Arc<dyn GenerativeModel>>,
    chunker: Option<Arc<dyn Chunker>>,
    loader: Option<DocumentLoader>,
}

impl DocSessionBuilder {
    /// Set the session configuration.
    pub fn config(mut self, config: ChatConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider (required).
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the generative model (required).
    pub fn model(mut self, model: Arc<dyn GenerativeModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Override the chunking strategy.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Override the document loader.
    pub fn loader(mut self, loader: DocumentLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Build the [`DocSession`].
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::Config`] if a required field is missing or
    /// the default loader cannot be constructed.
    pub fn build(self) -> Result<DocSession> {
        let config = self.config.unwrap_or_default();
        let embedder = self
            .embedder
            .ok_or_else(|| DocChatError::Config("embedder is required".to_string()))?;
        let model =
            self.model.ok_or_else(|| DocChatError::Config("model is required".to_string()))?;
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(SentenceAwareChunker::new(config.chunk_size, config.chunk_overlap))
        });
        let loader = match self.loader {
            Some(loader) => loader,
            None => DocumentLoader::new()?,
        };

        let retriever = Retriever::new(embedder.clone(), config.top_k, config.metric);
        let generator = AnswerGenerator::new(model);

        Ok(DocSession {
            config,
            loader,
            chunker,
            embedder,
            retriever,
            generator,
            index: RwLock::new(None),
            state: RwLock::new(SessionState::Empty),
            log: RwLock::new(SessionLog::default()),
        })
    }
}
