//! Document loading from files and URLs.
//!
//! One parameterized loader covers both source kinds: uploaded file bytes
//! (parsed as PDF, one text unit per page) and web pages (fetched over HTTP,
//! main content extracted from the HTML). A single failed fetch or parse is
//! surfaced immediately; re-submission is the caller's concern.

use std::io::Write;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::document::Document;
use crate::error::{DocChatError, Result};

/// Declared format of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Portable Document Format; extracted one text unit per page.
    Pdf,
    /// Plain UTF-8 text; the whole file is a single text unit.
    Text,
}

/// A descriptor for where a document's content comes from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Raw uploaded bytes with a declared format.
    File {
        /// Display name of the file; becomes the document ID.
        name: String,
        /// The file's content.
        bytes: Vec<u8>,
        /// The declared format the bytes must parse as.
        format: FileFormat,
    },
    /// A web page to fetch.
    Url(String),
}

/// Selectors tried in priority order when extracting a page's main content.
const CONTENT_SELECTORS: [&str; 8] = [
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".content-body",
    "#content",
];

/// Collect the text of an element's descendants with normalized whitespace.
fn element_text(element: &scraper::ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract the main textual content from an HTML page.
///
/// Tries content-bearing selectors first; falls back to the whole `<body>`.
/// Returns an empty string if nothing textual is found.
fn extract_main_content(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = element_text(&element);
                if text.len() > 200 {
                    return text;
                }
            }
        }
    }

    if let Ok(body) = Selector::parse("body") {
        if let Some(element) = document.select(&body).next() {
            return element_text(&element);
        }
    }

    String::new()
}

/// Loads documents from file bytes or URLs into ordered text units.
pub struct DocumentLoader {
    client: reqwest::Client,
}

impl DocumentLoader {
    /// Create a loader with a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::Config`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("docchat/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| DocChatError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Load a document from the given source.
    ///
    /// # Errors
    ///
    /// Returns [`DocChatError::SourceUnreadable`] if the file cannot be
    /// parsed as its declared format, or the URL is unreachable, returns a
    /// non-success status, or serves a non-text response.
    pub async fn load(&self, source: &DocumentSource) -> Result<Document> {
        match source {
            DocumentSource::File { name, bytes, format } => self.load_file(name, bytes, *format),
            DocumentSource::Url(url) => self.load_url(url).await,
        }
    }

    fn load_file(&self, name: &str, bytes: &[u8], format: FileFormat) -> Result<Document> {
        match format {
            FileFormat::Pdf => {
                // Stage the bytes in a temp file for the parser; the file is
                // removed when `staged` drops, on success and error alike.
                let mut staged = tempfile::NamedTempFile::new().map_err(|e| {
                    DocChatError::SourceUnreadable(format!("failed to stage upload: {e}"))
                })?;
                staged.write_all(bytes).map_err(|e| {
                    DocChatError::SourceUnreadable(format!("failed to stage upload: {e}"))
                })?;

                let pages = pdf_extract::extract_text_by_pages(staged.path()).map_err(|e| {
                    DocChatError::SourceUnreadable(format!("cannot parse '{name}' as PDF: {e}"))
                })?;

                info!(document.id = name, page_count = pages.len(), "loaded PDF");

                Ok(Document::new(name, pages))
            }
            FileFormat::Text => {
                let text = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    DocChatError::SourceUnreadable(format!("'{name}' is not valid UTF-8: {e}"))
                })?;
                Ok(Document::new(name, vec![text]))
            }
        }
    }

    async fn load_url(&self, url: &str) -> Result<Document> {
        let parsed = url::Url::parse(url)
            .map_err(|e| DocChatError::SourceUnreadable(format!("invalid URL '{url}': {e}")))?;

        debug!(url = %parsed, "fetching web page");

        let response = self.client.get(parsed.clone()).send().await.map_err(|e| {
            DocChatError::SourceUnreadable(format!("failed to fetch '{url}': {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocChatError::SourceUnreadable(format!("'{url}' returned HTTP {status}")));
        }

        // Reject binary responses up front; a missing content type is given
        // the benefit of the doubt.
        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !content_type.contains("html") && !content_type.starts_with("text/") {
                return Err(DocChatError::SourceUnreadable(format!(
                    "'{url}' returned non-text content type '{content_type}'"
                )));
            }
        }

        let html = response.text().await.map_err(|e| {
            DocChatError::SourceUnreadable(format!("failed to read body of '{url}': {e}"))
        })?;

        let text = extract_main_content(&html);

        info!(document.id = url, text_len = text.len(), "loaded web page");

        let mut document = Document::new(url, vec![text]);
        document.source_uri = Some(url.to_string());
        Ok(document)
    }
}
