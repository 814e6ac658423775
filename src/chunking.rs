//! Passage chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`] — splits by character count with exact overlap
//! - [`SentenceAwareChunker`] — like the fixed chunker, but pulls each cut
//!   back to the nearest sentence or paragraph break when one is available
//!   in the later half of the window
//!
//! Both are deterministic: the same text and parameters always produce the
//! same passage sequence.

use crate::document::{Document, Passage};

/// Separators recognized as natural boundaries. All kinds are considered
/// equally: the latest boundary of any kind in the window wins. The
/// separator stays attached to the earlier passage.
const BOUNDARY_SEPARATORS: [&str; 4] = ["\n\n", ". ", "! ", "? "];

/// A strategy for splitting a document's concatenated text into passages.
///
/// Returned passages carry their zero-based ordinal and the parent
/// document's ID. An empty document produces an empty `Vec`.
pub trait Chunker: Send + Sync {
    /// Split a document into ordered, overlapping passages.
    fn chunk(&self, document: &Document) -> Vec<Passage>;
}

/// Byte offset of every character boundary, plus the end of the text.
///
/// Windowing in character units over this table keeps all slicing valid
/// UTF-8 regardless of content.
fn char_starts(text: &str) -> Vec<usize> {
    let mut starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    starts.push(text.len());
    starts
}

/// Core windowing loop shared by both chunkers.
///
/// `adjust_end` maps a full window to the chosen cut length in characters
/// (at most `chunk_size`); the next window starts `chunk_overlap` characters
/// before that cut, so adjacent passages share exactly that much text.
fn window_chunks(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    adjust_end: impl Fn(&str) -> usize,
) -> Vec<String> {
    let starts = char_starts(text);
    let n_chars = starts.len() - 1;
    if n_chars == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        if start + chunk_size >= n_chars {
            chunks.push(text[starts[start]..].to_string());
            break;
        }

        let window = &text[starts[start]..starts[start + chunk_size]];
        let cut = adjust_end(window);
        chunks.push(text[starts[start]..starts[start + cut]].to_string());

        // An overlap at or beyond the cut would revisit the same window
        // forever; stop instead of looping.
        let next = (start + cut).saturating_sub(chunk_overlap);
        if next <= start {
            break;
        }
        start = next;
    }

    chunks
}

fn into_passages(chunks: Vec<String>, document_id: &str) -> Vec<Passage> {
    chunks
        .into_iter()
        .enumerate()
        .map(|(ordinal, text)| Passage {
            text,
            document_id: document_id.to_string(),
            ordinal,
        })
        .collect()
}

/// Splits text into fixed-size passages by character count with exact overlap.
///
/// The last passage may be shorter than `chunk_size`; every other passage is
/// exactly `chunk_size` characters and shares its last `chunk_overlap`
/// characters with the start of the next passage.
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// Callers are expected to validate `chunk_overlap < chunk_size` via
    /// [`ChatConfig`](crate::config::ChatConfig). An overlap at or beyond
    /// the chunk size cannot make progress; chunking then stops after the
    /// first passage instead of windowing the rest of the text.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Passage> {
        let text = document.text();
        let chunks = window_chunks(&text, self.chunk_size, self.chunk_overlap, |_| self.chunk_size);
        into_passages(chunks, &document.id)
    }
}

/// Splits text into overlapping passages, preferring natural boundaries.
///
/// Each window is cut at the latest paragraph or sentence break found in its
/// later half; when none exists there, the cut falls back to a hard
/// character cut at `chunk_size`. The overlap invariant is unaffected by the
/// adjustment: the next passage always starts `chunk_overlap` characters
/// before the chosen cut.
#[derive(Debug, Clone)]
pub struct SentenceAwareChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SentenceAwareChunker {
    /// Create a new `SentenceAwareChunker`.
    ///
    /// Callers are expected to validate `chunk_overlap < chunk_size` via
    /// [`ChatConfig`](crate::config::ChatConfig); see
    /// [`FixedSizeChunker::new`] for how degenerate parameters behave.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    /// Choose the cut length in characters for one full window.
    ///
    /// A boundary candidate is accepted only if it lies past the midpoint of
    /// the window and past the overlap, so every window makes progress.
    fn cut_length(&self, window: &str) -> usize {
        let mut best = None;
        for separator in BOUNDARY_SEPARATORS {
            if let Some(pos) = window.rfind(separator) {
                let length = window[..pos + separator.len()].chars().count();
                if length * 2 > self.chunk_size && length > self.chunk_overlap {
                    best = Some(best.map_or(length, |b: usize| b.max(length)));
                }
            }
        }
        best.unwrap_or(self.chunk_size)
    }
}

impl Chunker for SentenceAwareChunker {
    fn chunk(&self, document: &Document) -> Vec<Passage> {
        let text = document.text();
        let chunks =
            window_chunks(&text, self.chunk_size, self.chunk_overlap, |w| self.cut_length(w));
        into_passages(chunks, &document.id)
    }
}
