// Re-export main components
pub mod analyzer;
pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod fuzzy;
pub mod ranking;
pub mod stemming;
pub mod stopwords;
pub mod term;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::{Analyzer, LanguageCache, TermCache};
pub use collection::DocumentCollection;
pub use config::AnalyzerConfig;
pub use document::{Document, TermEntry};
pub use fuzzy::FuzzyGenerator;
pub use ranking::{rank, tfidf, TfIdf, TFIDF_ATTRIBUTE};
pub use stemming::{FrenchStemmer, SnowballStemmer, Stemmer, StemmerRegistry};
pub use stopwords::StopWords;
pub use term::Term;
pub use tokenizer::Tokenizer;

// Re-export error types
pub use error::{Error, Result};

// Snowball algorithms for `SnowballStemmer::new`
pub use rust_stemmers::Algorithm;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_workflow() -> Result<()> {
        let analyzer = Analyzer::new();

        let docs: DocumentCollection = [
            "Rust is a blazingly fast and memory-efficient language",
            "Go is a simple programming language",
            "Python lets you work quickly",
        ]
        .into_iter()
        .map(|text| analyzer.document(text))
        .collect();

        let stop_words = StopWords::builtin();
        let english = stop_words.for_language("en").cloned().unwrap_or_default();

        let ranked = rank(&analyzer.term("languages"), &docs, &english);
        assert_eq!(ranked.len(), 2);

        // A typo'd query still reaches "python" through deletion variants.
        let typo = analyzer.term("pythonn");
        let keys = analyzer.fuzzy().term_variants(&typo, 1)?;
        let hits: Vec<usize> = docs.iter().map(|doc| doc.fuzzy_frequency_of(&keys)).collect();
        assert_eq!(hits, vec![0, 0, 1]);

        Ok(())
    }

    #[test]
    fn test_french_workflow() {
        let analyzer = Analyzer::with_config(AnalyzerConfig {
            default_language: "fr".to_string(),
            ..AnalyzerConfig::default()
        });

        let docs: DocumentCollection = [
            "Les chanteuses chantent à l'opéra.",
            "La chanteuse et le pianiste.",
            "Un gâteau au chocolat.",
            "Des gâteaux pour la fête.",
        ]
        .into_iter()
        .map(|text| analyzer.document(text))
        .collect();

        let ranked = tfidf(&analyzer, &analyzer.term("Gâteaux"), &docs, ["le", "la", "des"]);
        assert_eq!(ranked.len(), 2);

        let ranked = tfidf(&analyzer, &analyzer.term("chanteuse"), &docs, ["le", "la", "des"]);
        let score = ranking::score_of(&ranked.documents()[0]).unwrap_or_default();
        assert!((score - 2f64.ln()).abs() < 1e-9);
    }
}
