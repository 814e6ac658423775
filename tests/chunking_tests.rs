//! Chunking invariants: coverage, exact overlap, boundary preference.

use docchat::chunking::{Chunker, FixedSizeChunker, SentenceAwareChunker};
use docchat::document::Document;

/// 3200 characters of break-free text with a repeating alphabet, so overlap
/// comparisons are meaningful.
fn break_free_text(len: usize) -> String {
    (0..len).map(|i| (b'a' + (i % 26) as u8) as char).collect()
}

fn doc(text: &str) -> Document {
    Document::new("doc", vec![text.to_string()])
}

/// Reconstruct the original text from passages by dropping each subsequent
/// passage's leading overlap.
fn reconstruct(passages: &[docchat::Passage], overlap: usize) -> String {
    let mut text = String::new();
    for (i, passage) in passages.iter().enumerate() {
        if i == 0 {
            text.push_str(&passage.text);
        } else {
            text.extend(passage.text.chars().skip(overlap));
        }
    }
    text
}

fn assert_overlap_invariant(passages: &[docchat::Passage], overlap: usize) {
    for pair in passages.windows(2) {
        let left: Vec<char> = pair[0].text.chars().collect();
        let shared = overlap.min(left.len());
        let tail: String = left[left.len() - shared..].iter().collect();
        let head: String = pair[1].text.chars().take(shared).collect();
        assert_eq!(tail, head, "passages {} and {} do not share their boundary", pair[0].ordinal, pair[1].ordinal);
    }
}

#[test]
fn fixed_chunker_windows_3200_chars_into_three_passages() {
    let text = break_free_text(3200);
    let chunker = FixedSizeChunker::new(1500, 150);
    let passages = chunker.chunk(&doc(&text));

    let lengths: Vec<usize> = passages.iter().map(|p| p.text.chars().count()).collect();
    assert_eq!(lengths, vec![1500, 1500, 500]);
    assert_overlap_invariant(&passages, 150);
    assert_eq!(reconstruct(&passages, 150), text);
}

#[test]
fn sentence_aware_chunker_matches_fixed_on_break_free_text() {
    let text = break_free_text(3200);
    let passages = SentenceAwareChunker::new(1500, 150).chunk(&doc(&text));

    let lengths: Vec<usize> = passages.iter().map(|p| p.text.chars().count()).collect();
    assert_eq!(lengths, vec![1500, 1500, 500]);
}

#[test]
fn sentence_aware_chunker_cuts_at_sentence_breaks() {
    let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
    let passages = SentenceAwareChunker::new(300, 40).chunk(&doc(&text));

    assert!(passages.len() > 1);
    for passage in &passages[..passages.len() - 1] {
        assert!(
            passage.text.ends_with(". "),
            "passage {} does not end at a sentence break: {:?}",
            passage.ordinal,
            &passage.text[passage.text.len().saturating_sub(20)..]
        );
        assert!(passage.text.chars().count() <= 300);
    }
    assert_overlap_invariant(&passages, 40);
    assert_eq!(reconstruct(&passages, 40), text);
}

#[test]
fn sentence_aware_chunker_cuts_at_paragraph_breaks() {
    let paragraph = "word ".repeat(30).trim_end().to_string();
    let text = format!("{paragraph}\n\n{paragraph}\n\n{paragraph}");
    let passages = SentenceAwareChunker::new(200, 20).chunk(&doc(&text));

    assert!(passages.len() > 1);
    assert!(passages[0].text.ends_with("\n\n"));
}

#[test]
fn latest_boundary_wins_regardless_of_kind() {
    // A paragraph break early in the window followed by sentence breaks
    // later: the cut lands on the latest boundary, not the paragraph break.
    let text = format!("{}\n\n{}", "word ".repeat(20).trim_end(), "A sentence follows here. ".repeat(8));
    let passages = SentenceAwareChunker::new(200, 20).chunk(&doc(&text));

    assert!(passages.len() > 1);
    assert!(passages[0].text.ends_with(". "));
    assert!(passages[0].text.contains("\n\n"));
}

#[test]
fn short_document_yields_single_passage() {
    let passages = FixedSizeChunker::new(1500, 150).chunk(&doc("short text"));
    assert_eq!(passages.len(), 1);
    assert_eq!(passages[0].text, "short text");
    assert_eq!(passages[0].ordinal, 0);
}

#[test]
fn empty_document_yields_no_passages() {
    let passages = FixedSizeChunker::new(1500, 150).chunk(&doc(""));
    assert!(passages.is_empty());
}

#[test]
fn chunking_is_deterministic() {
    let text = "Some sentences here. And some more there. ".repeat(100);
    let chunker = SentenceAwareChunker::new(400, 50);
    let first = chunker.chunk(&doc(&text));
    let second = chunker.chunk(&doc(&text));
    assert_eq!(first, second);
}

#[test]
fn multibyte_text_is_chunked_on_char_boundaries() {
    let text = "Å snö är vit här. Das Straßenbild ändert sich. ".repeat(60);
    let passages = SentenceAwareChunker::new(250, 30).chunk(&doc(&text));

    assert!(passages.len() > 1);
    for passage in &passages {
        assert!(passage.text.chars().count() <= 250);
    }
    assert_overlap_invariant(&passages, 30);
    assert_eq!(reconstruct(&passages, 30), text);
}

#[test]
fn overlap_equal_to_chunk_size_still_terminates() {
    // Degenerate parameters that cannot advance the window: chunking must
    // stop after the first passage rather than loop.
    let text = break_free_text(30);
    let passages = FixedSizeChunker::new(10, 10).chunk(&doc(&text));

    assert_eq!(passages.len(), 1);
    assert_eq!(passages[0].text, &text[..10]);

    let passages = SentenceAwareChunker::new(10, 15).chunk(&doc(&text));
    assert_eq!(passages.len(), 1);
}

#[test]
fn ordinals_are_sequential() {
    let text = break_free_text(5000);
    let passages = FixedSizeChunker::new(500, 50).chunk(&doc(&text));
    for (i, passage) in passages.iter().enumerate() {
        assert_eq!(passage.ordinal, i);
        assert_eq!(passage.document_id, "doc");
    }
}
