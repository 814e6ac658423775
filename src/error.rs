//! Error types for the `docchat` crate.

use thiserror::Error;

/// Errors that can occur while loading documents or answering questions.
///
/// Every error is terminal for the single operation that raised it; nothing
/// is retried internally.
#[derive(Debug, Error)]
pub enum DocChatError {
    /// The document source could not be fetched or parsed.
    #[error("Source unreadable: {0}")]
    SourceUnreadable(String),

    /// The document contained no extractable text, so there is nothing to search.
    #[error("Document contains no extractable text")]
    EmptyDocument,

    /// The query was blank or whitespace-only.
    #[error("Query is empty")]
    EmptyQuery,

    /// The embedding backend failed or was unreachable.
    #[error("Embedding error ({model}): {message}")]
    Embedding {
        /// The embedding model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// The generative model failed or was unreachable.
    #[error("Generation unavailable ({model}): {message}")]
    GenerationUnavailable {
        /// The generation model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An inconsistency in the vector index (dimension mismatch, missing index).
    #[error("Index error: {0}")]
    Index(String),
}

/// A convenience result type for docchat operations.
pub type Result<T> = std::result::Result<T, DocChatError>;
