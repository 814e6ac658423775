//! Data types for documents, passages, and answers.

use serde::{Deserialize, Serialize};

/// A source document: an ordered sequence of raw text units extracted from
/// one source (one unit per PDF page, or one per fetched web page).
///
/// Immutable once loaded. The concatenation of its units is the text that
/// gets chunked into [`Passage`]s.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Identifier for the document (file name or URL).
    pub id: String,
    /// Optional URI pointing to the original source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
    /// Ordered text units, one per logical section of the source.
    pub units: Vec<String>,
}

impl Document {
    /// Create a document from its identifier and text units.
    pub fn new(id: impl Into<String>, units: Vec<String>) -> Self {
        Self { id: id.into(), source_uri: None, units }
    }

    /// The concatenated text of all units, joined with blank lines.
    pub fn text(&self) -> String {
        self.units.join("\n\n")
    }

    /// Whether the document contains any non-whitespace text.
    pub fn has_text(&self) -> bool {
        self.units.iter().any(|u| !u.trim().is_empty())
    }
}

/// A contiguous slice of a [`Document`]'s concatenated text.
///
/// Consecutive passages from the same document overlap by the configured
/// amount so no semantic unit is lost at a chunk boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    /// The text content of the passage.
    pub text: String,
    /// The ID of the parent [`Document`].
    pub document_id: String,
    /// Zero-based position of this passage within its document.
    pub ordinal: usize,
}

/// A retrieved [`Passage`] paired with a similarity score.
///
/// Higher scores are always more similar, regardless of the metric used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    /// The retrieved passage.
    pub passage: Passage,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// A generated answer together with the passages it was grounded on.
///
/// Created by the answer generator and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The generated answer text, verbatim from the model.
    pub text: String,
    /// The retrieved passages given to the model, in retrieval order.
    pub sources: Vec<ScoredPassage>,
}
