use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use termrank::{ranking, Analyzer, AnalyzerConfig, DocumentCollection, StopWords};
use tracing::info;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Rank text files against a query term by TF-IDF", long_about = None)]
struct Args {
    /// Query word
    #[arg(short, long)]
    query: String,

    /// Language of the query and the files
    #[arg(short, long)]
    language: Option<String>,

    /// Extra stop words, one per line
    #[arg(short, long)]
    stop_words: Option<PathBuf>,

    /// Print the lookup keys tolerating this many deletions
    #[arg(short, long)]
    fuzzy: Option<usize>,

    /// JSON analyzer configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Files to rank, one document each
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AnalyzerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    let analyzer = Analyzer::with_config(config);
    let language = args
        .language
        .clone()
        .unwrap_or_else(|| analyzer.default_language().to_string());

    let mut stop_words = StopWords::builtin();
    if let Some(path) = &args.stop_words {
        stop_words
            .load_language(&language, path)
            .with_context(|| format!("Failed to load stop words {}", path.display()))?;
    }

    let start = Instant::now();
    let mut collection = DocumentCollection::default();
    for path in &args.files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let document = analyzer
            .document_in(&text, &language)
            .with_attribute("path", path.display().to_string());
        collection.add_document(document);
    }
    info!("Indexed {} documents in {:?}", collection.len(), start.elapsed());

    let term = analyzer.term_in(&args.query, &language);
    if !term.is_valid() {
        info!("Query '{}' is not an indexable term", args.query);
    }

    if let Some(distance) = args.fuzzy {
        let keys = analyzer.fuzzy().term_variants(&term, distance)?;
        println!(
            "lookup keys ({}): {}",
            keys.len(),
            keys.into_iter().collect::<Vec<_>>().join(" ")
        );
    }

    let start = Instant::now();
    let empty = Default::default();
    let ranked = ranking::rank(
        &term,
        &collection,
        stop_words.for_language(&language).unwrap_or(&empty),
    );
    info!("Ranked {} of {} documents in {:?}", ranked.len(), collection.len(), start.elapsed());

    for document in &ranked {
        let score = ranking::score_of(document).unwrap_or_default();
        let path = document
            .attribute("path")
            .and_then(|value| value.as_str())
            .unwrap_or("?");
        println!("{score:>10.4}  {path}");
    }

    Ok(())
}
