use crate::analyzer::Analyzer;
use crate::collection::DocumentCollection;
use crate::document::Document;
use crate::term::Term;
use rayon::prelude::*;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Attribute under which a ranked document carries its score.
pub const TFIDF_ATTRIBUTE: &str = "tfidf";

/// TF-IDF components for one document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TfIdf {
    pub tf: f64,
    pub idf: f64,
}

impl TfIdf {
    pub fn score(&self) -> f64 {
        self.tf * self.idf
    }
}

/// Number of documents in `collection` that contain `term`.
pub fn document_frequency(term: &Term, collection: &DocumentCollection) -> usize {
    collection.document_frequency(term)
}

/// `ln(|collection| / df)`, or 0 when no document contains the term.
pub fn inverse_document_frequency(term: &Term, collection: &DocumentCollection) -> f64 {
    idf_from(collection.len(), document_frequency(term, collection))
}

fn idf_from(total_documents: usize, document_frequency: usize) -> f64 {
    if document_frequency == 0 {
        return 0.0;
    }
    (total_documents as f64 / document_frequency as f64).ln()
}

/// Normalize and accent-fold raw stop words the way terms are, de-duplicated.
pub fn normalize_stop_words<I, S>(analyzer: &Analyzer, words: I, language: &str) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|word| {
            let normalized = analyzer.normalize(word.as_ref(), language);
            analyzer.remove_accents(&normalized, language)
        })
        .collect()
}

/// Rank `collection` for `term` using raw stop words.
pub fn tfidf<I, S>(
    analyzer: &Analyzer,
    term: &Term,
    collection: &DocumentCollection,
    stop_words: I,
) -> DocumentCollection
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stop_words = normalize_stop_words(analyzer, stop_words, term.language());
    rank(term, collection, &stop_words)
}

/// TF-IDF of `term` in `document`; both parts are 0 for stop words.
pub fn score_document(
    term: &Term,
    document: &Document,
    collection: &DocumentCollection,
    stop_words: &HashSet<String>,
) -> TfIdf {
    if stop_words.contains(term.normalized()) {
        return TfIdf { tf: 0.0, idf: 0.0 };
    }
    TfIdf {
        tf: document.term_frequency_of(term) as f64,
        idf: inverse_document_frequency(term, collection),
    }
}

/// Rank `collection` for `term` against already normalized stop words.
///
/// Returns clones of the documents scoring above zero, each carrying its
/// score under [`TFIDF_ATTRIBUTE`], best first. Equal scores keep their
/// collection order. The input documents are never modified.
pub fn rank(
    term: &Term,
    collection: &DocumentCollection,
    stop_words: &HashSet<String>,
) -> DocumentCollection {
    let is_stop_word = stop_words.contains(term.normalized());
    let df = if is_stop_word { 0 } else { document_frequency(term, collection) };
    let idf = idf_from(collection.len(), df);

    let mut scored: Vec<(f64, Document)> = collection
        .documents()
        .par_iter()
        .filter_map(|document| {
            let tf = if is_stop_word { 0 } else { document.term_frequency_of(term) };
            let score = TfIdf { tf: tf as f64, idf }.score();
            (score > 0.0).then(|| (score, document.clone().with_attribute(TFIDF_ATTRIBUTE, score)))
        })
        .collect();

    // Stable: ties stay in collection order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    debug!(
        term = term.stem(),
        documents = collection.len(),
        df,
        idf,
        matched = scored.len(),
        "ranked collection"
    );

    scored.into_iter().map(|(_, document)| document).collect()
}

/// Score previously attached by [`rank`].
pub fn score_of(document: &Document) -> Option<f64> {
    document.attribute(TFIDF_ATTRIBUTE).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn collection(analyzer: &Analyzer, texts: &[&str]) -> DocumentCollection {
        texts.iter().map(|text| analyzer.document(text)).collect()
    }

    #[test]
    fn test_idf() {
        let analyzer = Analyzer::new();
        let docs = collection(
            &analyzer,
            &["rust rust rust", "python code", "go code", "java code"],
        );

        let rust = analyzer.term("rust");
        assert_eq!(document_frequency(&rust, &docs), 1);
        assert!((inverse_document_frequency(&rust, &docs) - 4f64.ln()).abs() < 1e-12);

        let missing = analyzer.term("haskell");
        assert_eq!(inverse_document_frequency(&missing, &docs), 0.0);

        let code = analyzer.term("code");
        assert!((inverse_document_frequency(&code, &docs) - (4.0f64 / 3.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_tfidf_scenario() {
        let analyzer = Analyzer::new();
        let docs = collection(
            &analyzer,
            &["rust rust rust", "python code", "go code", "java code"],
        );

        let ranked = tfidf(&analyzer, &analyzer.term("rust"), &docs, Vec::<String>::new());
        assert_eq!(ranked.len(), 1);

        let score = score_of(&ranked.documents()[0]).unwrap();
        assert!((score - 3.0 * 4f64.ln()).abs() < 1e-9);
        assert!((score - 4.159).abs() < 1e-3);

        // the input collection is untouched
        assert!(docs.iter().all(|doc| !doc.has_attribute(TFIDF_ATTRIBUTE)));
    }

    #[test]
    fn test_stop_word_scores_zero() {
        let analyzer = Analyzer::new();
        let docs = collection(
            &analyzer,
            &["the the the end", "the start", "nothing here"],
        );
        let the = analyzer.term("the");

        let ranked = tfidf(&analyzer, &the, &docs, ["The", "a"]);
        assert!(ranked.is_empty());

        let stop_words = normalize_stop_words(&analyzer, ["THE"], "en");
        for doc in docs.iter() {
            assert_eq!(score_document(&the, doc, &docs, &stop_words).score(), 0.0);
        }
    }

    #[test]
    fn test_ranking_order_and_ties() {
        let analyzer = Analyzer::new();
        let docs = collection(
            &analyzer,
            &[
                "search once",
                "nothing relevant",
                "search search search",
                "another search",
                "search search",
            ],
        );

        let ranked = rank(&analyzer.term("searching"), &docs, &HashSet::new());
        let texts: Vec<&str> = ranked.iter().map(Document::text).collect();
        assert_eq!(
            texts,
            vec!["search search search", "search search", "search once", "another search"]
        );
    }

    #[test]
    fn test_rank_with_builtin_stop_words() {
        let analyzer = Analyzer::new();
        let stop_words = crate::StopWords::builtin();
        let english = stop_words.for_language("en").cloned().unwrap_or_default();

        let docs = collection(&analyzer, &["the cat", "the dog"]);
        assert!(rank(&analyzer.term("the"), &docs, &english).is_empty());
        assert_eq!(rank(&analyzer.term("cats"), &docs, &english).len(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 32, ..ProptestConfig::default() })]

        #[test]
        fn prop_scores_are_positive_and_sorted(
            texts in proptest::collection::vec("(alpha|beta|gamma|delta| ){1,12}", 1..6),
            query in "alpha|beta|gamma|delta",
        ) {
            let analyzer = Analyzer::new();
            let docs: DocumentCollection =
                texts.iter().map(|text| analyzer.document(text)).collect();
            let term = analyzer.term(&query);

            for doc in docs.iter() {
                let parts = score_document(&term, doc, &docs, &HashSet::new());
                prop_assert!(parts.tf >= 0.0 && parts.idf >= 0.0);
            }

            let scores: Vec<f64> = rank(&term, &docs, &HashSet::new())
                .iter()
                .filter_map(score_of)
                .collect();
            prop_assert!(scores.iter().all(|score| *score > 0.0));
            prop_assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
        }
    }
}
