//! # docchat
//!
//! Ask natural-language questions about a document — a PDF or a web page —
//! via a minimal retrieval-augmented-generation pipeline: the document is
//! split into overlapping passages, each passage is embedded once into a
//! per-session vector index, and every question is answered by a generative
//! model grounded on the top-k most similar passages.
//!
//! The pipeline composes from swappable pieces: a [`DocumentLoader`] over
//! file bytes or URLs, a [`Chunker`], an [`EmbeddingProvider`], an immutable
//! [`VectorIndex`], a [`Retriever`], and an [`AnswerGenerator`]. The
//! [`DocSession`] type ties them together behind two entry points,
//! [`load_document`](DocSession::load_document) and [`ask`](DocSession::ask).
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docchat::{DocSession, DocumentSource, openai::{OpenAiChat, OpenAiEmbeddings}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = DocSession::builder()
//!         .embedder(Arc::new(OpenAiEmbeddings::from_env()?))
//!         .model(Arc::new(OpenAiChat::groq(std::env::var("GROQ_API_KEY")?, "llama3-8b-8192")?))
//!         .build()?;
//!
//!     session.load_document(&DocumentSource::Url("https://example.com".into())).await?;
//!     let answer = session.ask("What is this page about?").await?;
//!     println!("{}", answer.text);
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod loader;
pub mod openai;
pub mod retriever;
pub mod session;

pub use chunking::{Chunker, FixedSizeChunker, SentenceAwareChunker};
pub use config::{ChatConfig, ChatConfigBuilder};
pub use document::{Answer, Document, Passage, ScoredPassage};
pub use embedding::EmbeddingProvider;
pub use error::{DocChatError, Result};
pub use generation::{AnswerGenerator, GenerativeModel};
pub use index::{SimilarityMetric, VectorIndex};
pub use loader::{DocumentLoader, DocumentSource, FileFormat};
pub use retriever::Retriever;
pub use session::{DocSession, DocSessionBuilder, LogEntry, SessionLog, SessionState};
