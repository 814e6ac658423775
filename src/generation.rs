//! Grounded answer generation.
//!
//! [`AnswerGenerator`] builds a context-bounded prompt from the retrieved
//! passages and invokes a [`GenerativeModel`] exactly once per question.
//! Determinism is bounded only by the external model's own guarantees.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::document::{Answer, ScoredPassage};
use crate::error::Result;

/// Fixed instruction prefixed to every prompt. The model must answer only
/// from the supplied context, admit when it does not know, and stay short.
const QA_INSTRUCTION: &str = "Use the following pieces of context to answer the question at the \
                              end. If you don't know the answer, just say that you don't know, \
                              don't try to make up an answer. Use three sentences maximum. Keep \
                              the answer as concise as possible.";

/// A capability that generates text from a prompt.
///
/// One call per question; retry policy, if any, belongs to the caller.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// The identifier of the underlying model.
    fn name(&self) -> &str;
}

/// Assemble the bounded prompt: instruction, passages in retrieval order,
/// then the literal question.
pub fn build_prompt(query: &str, context: &[ScoredPassage]) -> String {
    let mut prompt = String::from(QA_INSTRUCTION);
    for scored in context {
        prompt.push_str("\n\n");
        prompt.push_str(&scored.passage.text);
    }
    prompt.push_str("\n\nQuestion: ");
    prompt.push_str(query);
    prompt.push_str("\nHelpful Answer:");
    prompt
}

/// Generates grounded answers from retrieved context.
pub struct AnswerGenerator {
    model: Arc<dyn GenerativeModel>,
}

impl AnswerGenerator {
    /// Create a generator backed by the given model.
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Generate an answer to `query` grounded on `context`.
    ///
    /// The returned [`Answer`] carries the model's text verbatim plus the
    /// context it was given, forming the provenance trail.
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::GenerationUnavailable`](crate::DocChatError::GenerationUnavailable)
    /// if the model call fails. The failure is surfaced, not retried.
    pub async fn generate(&self, query: &str, context: Vec<ScoredPassage>) -> Result<Answer> {
        let prompt = build_prompt(query, &context);

        let text = self.model.generate(&prompt).await.inspect_err(|e| {
            error!(model = self.model.name(), error = %e, "generation failed");
        })?;

        info!(
            model = self.model.name(),
            source_count = context.len(),
            answer_len = text.len(),
            "generated answer"
        );

        Ok(Answer { text, sources: context })
    }
}
