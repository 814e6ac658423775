//! Command-line chat over one document.
//!
//! The binary plays the role of the session/UI layer: it owns the session,
//! feeds queries from stdin into [`DocSession::ask`], and prints answers
//! with their source passages.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use docchat::openai::{OpenAiChat, OpenAiEmbeddings};
use docchat::{ChatConfig, DocSession, DocumentSource, FileFormat, SimilarityMetric};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docchat", about = "Chat with a PDF or a web page", version)]
struct Args {
    /// Path to a PDF file to chat with.
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// URL of a web page to chat with.
    #[arg(long)]
    url: Option<String>,

    /// Number of passages to retrieve per question.
    #[arg(long, default_value_t = 4)]
    top_k: usize,

    /// Target passage size in characters.
    #[arg(long, default_value_t = 1500)]
    chunk_size: usize,

    /// Overlap between consecutive passages in characters.
    #[arg(long, default_value_t = 150)]
    chunk_overlap: usize,

    /// Embedding model identifier (OpenAI-compatible).
    #[arg(long, default_value = "text-embedding-3-small")]
    embedding_model: String,

    /// Generation model identifier.
    #[arg(long, default_value = "llama3-8b-8192")]
    generation_model: String,

    /// Base URL of the generation API (defaults to Groq's endpoint).
    #[arg(long)]
    generation_base_url: Option<String>,

    /// Use euclidean distance instead of cosine similarity.
    #[arg(long)]
    euclidean: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let source = match (&args.file, &args.url) {
        (Some(path), None) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            DocumentSource::File { name, bytes, format: FileFormat::Pdf }
        }
        (None, Some(url)) => DocumentSource::Url(url.clone()),
        _ => anyhow::bail!("pass exactly one of --file or --url"),
    };

    let metric = if args.euclidean { SimilarityMetric::Euclidean } else { SimilarityMetric::Cosine };
    let config = ChatConfig::builder()
        .chunk_size(args.chunk_size)
        .chunk_overlap(args.chunk_overlap)
        .top_k(args.top_k)
        .metric(metric)
        .embedding_model(&args.embedding_model)
        .generation_model(&args.generation_model)
        .build()?;

    let embedder =
        Arc::new(OpenAiEmbeddings::from_env()?.with_model(config.embedding_model.clone()));

    let groq_key = std::env::var("GROQ_API_KEY");
    let model = match (&args.generation_base_url, groq_key) {
        (Some(base_url), _) => OpenAiChat::compatible(
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?,
            base_url,
            &config.generation_model,
        )?,
        (None, Ok(key)) => OpenAiChat::groq(key, &config.generation_model)?,
        (None, Err(_)) => OpenAiChat::new(
            std::env::var("OPENAI_API_KEY").context("set GROQ_API_KEY or OPENAI_API_KEY")?,
            &config.generation_model,
        )?,
    };

    let session = DocSession::builder().config(config).embedder(embedder).model(Arc::new(model)).build()?;

    eprintln!("Indexing document...");
    session.load_document(&source).await?;
    eprintln!("Indexed {} passages. Ask away (Ctrl-D to quit).", session.passage_count().await);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        match session.ask(query).await {
            Ok(answer) => {
                println!("{}\n", answer.text.trim());
                for scored in &answer.sources {
                    let preview: String = scored.passage.text.chars().take(80).collect();
                    println!(
                        "  [#{} score {:.3}] {}...",
                        scored.passage.ordinal, scored.score, preview
                    );
                }
                println!();
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }

    eprintln!("{} questions answered this session.", session.log().await.len());
    Ok(())
}
