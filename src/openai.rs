//! OpenAI-compatible embedding and generation backends.
//!
//! Both clients speak the OpenAI `/v1` wire shape over `reqwest`, with a
//! configurable base URL so OpenAI-compatible providers (Groq, local
//! servers) work unchanged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{DocChatError, Result};
use crate::generation::GenerativeModel;

/// The default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// The base URL of Groq's OpenAI-compatible API.
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// The default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// The default dimensionality for `text-embedding-3-small`.
const DEFAULT_DIMENSIONS: usize = 1536;

/// Extract a human-readable message from an OpenAI-style error body.
fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ── Embeddings ─────────────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by an OpenAI-compatible embeddings API.
///
/// # Example
///
/// ```rust,ignore
/// use docchat::openai::OpenAiEmbeddings;
///
/// let embedder = OpenAiEmbeddings::from_env()?.with_model("text-embedding-3-large");
/// let vector = embedder.embed("hello world").await?;
/// ```
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
    /// If set, passed to the API so returned vectors are truncated to match.
    request_dimensions: Option<usize>,
}

impl OpenAiEmbeddings {
    /// Create a new provider with the given API key and default model.
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::Embedding`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(DocChatError::Embedding {
                model: DEFAULT_EMBEDDING_MODEL.into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OPENAI_BASE_URL.into(),
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            request_dimensions: None,
        })
    }

    /// Create a provider from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| DocChatError::Embedding {
            model: DEFAULT_EMBEDDING_MODEL.into(),
            message: "OPENAI_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the dimensionality reported and requested for embeddings.
    ///
    /// The value is sent with every request so the API returns vectors of
    /// exactly this size, keeping the provider's declared dimension and its
    /// actual output in agreement.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self.request_dimensions = Some(dimensions);
        self
    }

    /// Point the client at an OpenAI-compatible base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn embedding_error(&self, message: impl Into<String>) -> DocChatError {
        DocChatError::Embedding { model: self.model.clone(), message: message.into() }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| self.embedding_error("API returned empty response"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(model = %self.model, batch_size = texts.len(), "embedding batch");

        let request_body = EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
            dimensions: self.request_dimensions,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "embedding request failed");
                self.embedding_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(model = %self.model, %status, "embedding API error");
            return Err(
                self.embedding_error(format!("API returned {status}: {}", error_detail(&body)))
            );
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| self.embedding_error(format!("failed to parse response: {e}")))?;

        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Chat completions ───────────────────────────────────────────────

/// A [`GenerativeModel`] backed by an OpenAI-compatible chat completions API.
///
/// Single-shot, non-streaming: each call sends one user message and returns
/// the first choice's content verbatim.
///
/// # Example
///
/// ```rust,ignore
/// use docchat::openai::OpenAiChat;
///
/// let model = OpenAiChat::groq(std::env::var("GROQ_API_KEY")?, "llama3-8b-8192")?;
/// let answer = model.generate("Say hello").await?;
/// ```
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiChat {
    /// Create a client against the standard OpenAI API.
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::GenerationUnavailable`] if the key is empty.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::compatible(api_key, OPENAI_BASE_URL, model)
    }

    /// Create a client for an OpenAI-compatible API at `base_url`.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let model = model.into();
        if api_key.is_empty() {
            return Err(DocChatError::GenerationUnavailable {
                model,
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self { client: reqwest::Client::new(), api_key, base_url: base_url.into(), model })
    }

    /// Create a client against Groq's OpenAI-compatible API.
    pub fn groq(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::compatible(api_key, GROQ_BASE_URL, model)
    }

    fn generation_error(&self, message: impl Into<String>) -> DocChatError {
        DocChatError::GenerationUnavailable { model: self.model.clone(), message: message.into() }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl GenerativeModel for OpenAiChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "chat completion request");

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "chat request failed");
                self.generation_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(model = %self.model, %status, "chat API error");
            return Err(
                self.generation_error(format!("API returned {status}: {}", error_detail(&body)))
            );
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.generation_error(format!("failed to parse response: {e}")))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| self.generation_error("API returned no choices"))
    }

    fn name(&self) -> &str {
        &self.model
    }
}
