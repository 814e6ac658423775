//! Session lifecycle: load/ask flow, state machine, log discipline.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use docchat::embedding::EmbeddingProvider;
use docchat::error::{DocChatError, Result};
use docchat::generation::GenerativeModel;
use docchat::loader::{DocumentSource, FileFormat};
use docchat::{ChatConfig, DocSession, SessionState};

/// Deterministic hash-based embeddings; similar enough for retrieval tests
/// without any network.
struct MockEmbedder {
    dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Echoes a canned answer and counts invocations.
struct MockModel {
    calls: AtomicUsize,
}

impl MockModel {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(prompt.starts_with("Use the following pieces of context"));
        Ok("a grounded answer".to_string())
    }

    fn name(&self) -> &str {
        "mock-model"
    }
}

/// Always unreachable.
struct UnreachableModel;

#[async_trait]
impl GenerativeModel for UnreachableModel {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(DocChatError::GenerationUnavailable {
            model: "unreachable".to_string(),
            message: "connection refused".to_string(),
        })
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

fn text_source(name: &str, text: &str) -> DocumentSource {
    DocumentSource::File {
        name: name.to_string(),
        bytes: text.as_bytes().to_vec(),
        format: FileFormat::Text,
    }
}

fn session_with_model(model: Arc<dyn GenerativeModel>) -> DocSession {
    let config = ChatConfig::builder().chunk_size(120).chunk_overlap(20).top_k(3).build().unwrap();
    DocSession::builder()
        .config(config)
        .embedder(Arc::new(MockEmbedder { dimensions: 32 }))
        .model(model)
        .build()
        .unwrap()
}

const SAMPLE_TEXT: &str = "Rust is a systems programming language. It emphasizes memory safety \
    without garbage collection. The borrow checker enforces ownership rules at compile time. \
    Cargo is the package manager and build tool. Crates are published to a shared registry. \
    Async runtimes schedule cooperative tasks over a small number of threads.";

#[tokio::test]
async fn load_then_ask_answers_and_logs() {
    let model = Arc::new(MockModel::new());
    let session = session_with_model(model.clone());

    session.load_document(&text_source("rust.txt", SAMPLE_TEXT)).await.unwrap();
    assert_eq!(session.state().await, SessionState::Indexed);
    assert!(session.passage_count().await > 1);

    let answer = session.ask("What enforces ownership rules?").await.unwrap();
    assert_eq!(answer.text, "a grounded answer");
    assert!(!answer.sources.is_empty());
    assert!(answer.sources.len() <= 3);

    let log = session.log().await;
    assert_eq!(log.len(), 1);
    assert_eq!(log.entries()[0].query, "What enforces ownership rules?");
    assert_eq!(log.entries()[0].answer.text, "a grounded answer");

    // One question, one model call.
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn ask_before_load_fails() {
    let session = session_with_model(Arc::new(MockModel::new()));
    assert_eq!(session.state().await, SessionState::Empty);

    let result = session.ask("anything").await;
    assert!(matches!(result, Err(DocChatError::Index(_))));
}

#[tokio::test]
async fn blank_query_is_rejected_and_not_logged() {
    let session = session_with_model(Arc::new(MockModel::new()));
    session.load_document(&text_source("rust.txt", SAMPLE_TEXT)).await.unwrap();

    let result = session.ask("   \t  ").await;
    assert!(matches!(result, Err(DocChatError::EmptyQuery)));
    assert!(session.log().await.is_empty());
}

#[tokio::test]
async fn generation_failure_surfaces_and_skips_the_log() {
    let session = session_with_model(Arc::new(UnreachableModel));
    session.load_document(&text_source("rust.txt", SAMPLE_TEXT)).await.unwrap();

    let result = session.ask("What is cargo?").await;
    assert!(matches!(result, Err(DocChatError::GenerationUnavailable { .. })));
    assert!(session.log().await.is_empty());
}

#[tokio::test]
async fn empty_source_is_rejected_and_leaves_session_empty() {
    let session = session_with_model(Arc::new(MockModel::new()));

    let result = session.load_document(&text_source("blank.txt", "   \n  ")).await;
    assert!(matches!(result, Err(DocChatError::EmptyDocument)));
    assert_eq!(session.state().await, SessionState::Empty);
    assert_eq!(session.passage_count().await, 0);
}

#[tokio::test]
async fn invalid_utf8_is_source_unreadable() {
    let session = session_with_model(Arc::new(MockModel::new()));

    let source = DocumentSource::File {
        name: "garbage.txt".to_string(),
        bytes: vec![0xff, 0xfe, 0xfd],
        format: FileFormat::Text,
    };
    let result = session.load_document(&source).await;
    assert!(matches!(result, Err(DocChatError::SourceUnreadable(_))));
    assert_eq!(session.state().await, SessionState::Empty);
}

#[tokio::test]
async fn reloading_replaces_the_index() {
    let session = session_with_model(Arc::new(MockModel::new()));

    session.load_document(&text_source("long.txt", SAMPLE_TEXT)).await.unwrap();
    let first_count = session.passage_count().await;

    session.load_document(&text_source("short.txt", "One small paragraph.")).await.unwrap();
    let second_count = session.passage_count().await;

    assert_eq!(session.state().await, SessionState::Indexed);
    assert_eq!(second_count, 1);
    assert_ne!(first_count, second_count);
}

#[tokio::test]
async fn failed_reload_discards_the_previous_index() {
    let session = session_with_model(Arc::new(MockModel::new()));

    session.load_document(&text_source("rust.txt", SAMPLE_TEXT)).await.unwrap();
    assert_eq!(session.state().await, SessionState::Indexed);

    let result = session.load_document(&text_source("blank.txt", "")).await;
    assert!(matches!(result, Err(DocChatError::EmptyDocument)));

    // The prior index is gone; a new load must start from scratch.
    assert_eq!(session.state().await, SessionState::Empty);
    assert!(matches!(session.ask("anything").await, Err(DocChatError::Index(_))));
}

#[tokio::test]
async fn answers_carry_their_sources_in_retrieval_order() {
    let session = session_with_model(Arc::new(MockModel::new()));
    session.load_document(&text_source("rust.txt", SAMPLE_TEXT)).await.unwrap();

    let answer = session.ask("package manager").await.unwrap();
    for window in answer.sources.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
}

#[tokio::test]
async fn builder_requires_embedder_and_model() {
    let missing_model =
        DocSession::builder().embedder(Arc::new(MockEmbedder { dimensions: 8 })).build();
    assert!(matches!(missing_model, Err(DocChatError::Config(_))));

    let missing_embedder = DocSession::builder().model(Arc::new(MockModel::new())).build();
    assert!(matches!(missing_embedder, Err(DocChatError::Config(_))));
}
