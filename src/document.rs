use crate::analyzer::Analyzer;
use crate::stemming::language_key;
use crate::term::Term;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// A term of a document and how many times it occurs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermEntry {
    pub term: Term,
    pub count: usize,
}

/// Document represents a scored unit of text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    text: String,
    language: String,
    /// stem -> first term seen with that stem, and its occurrence count
    terms: HashMap<String, TermEntry>,
    #[serde(default)]
    attributes: HashMap<String, Value>,
}

impl Document {
    /// Tokenize `text` and index every valid term.
    pub fn new(text: &str, language: &str, analyzer: &Analyzer) -> Self {
        let mut document = Self {
            language: language_key(language),
            ..Self::default()
        };
        document.set_text(text, analyzer);
        document
    }

    /// Build a document from words that are already split.
    pub fn from_words<I, S>(words: I, language: &str, analyzer: &Analyzer) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut document = Self {
            language: language_key(language),
            ..Self::default()
        };
        document.set_terms_from_words(words, analyzer);
        document
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and rebuild the term index from it.
    pub fn set_text(&mut self, text: &str, analyzer: &Analyzer) -> &mut Self {
        let tokenizer = analyzer.tokenizer();
        let prepared = tokenizer.prepare(text, &self.language);
        let terms: Vec<Term> = tokenizer
            .split(&prepared)
            .filter(|word| !word.is_empty())
            .map(|word| analyzer.term_in(word, &self.language))
            .collect();

        self.text = prepared.into_owned();
        self.set_terms(terms)
    }

    pub fn set_terms_from_words<I, S>(&mut self, words: I, analyzer: &Analyzer) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<Term> = words
            .into_iter()
            .map(|word| analyzer.term_in(word.as_ref(), &self.language))
            .collect();
        self.set_terms(terms)
    }

    /// Replace the term index.
    pub fn set_terms<I>(&mut self, terms: I) -> &mut Self
    where
        I: IntoIterator<Item = Term>,
    {
        self.terms.clear();
        for term in terms {
            self.add_term(term);
        }
        self
    }

    /// Count one occurrence of `term`. Invalid terms are ignored.
    pub fn add_term(&mut self, term: Term) -> &mut Self {
        if term.is_valid() {
            self.terms
                .entry(term.stem().to_string())
                .or_insert_with(|| TermEntry { term, count: 0 })
                .count += 1;
        }
        self
    }

    pub fn has_term(&self, term: &Term) -> bool {
        self.terms.contains_key(term.stem())
    }

    pub fn terms(&self) -> &HashMap<String, TermEntry> {
        &self.terms
    }

    /// Occurrences of `term`'s stem, 0 if absent.
    pub fn term_frequency_of(&self, term: &Term) -> usize {
        self.terms.get(term.stem()).map_or(0, |entry| entry.count)
    }

    /// Occurrences summed over every stem in `keys`, for lookups through
    /// fuzzy variants.
    pub fn fuzzy_frequency_of(&self, keys: &BTreeSet<String>) -> usize {
        keys.iter()
            .filter_map(|key| self.terms.get(key))
            .map(|entry| entry.count)
            .sum()
    }

    // ========== Attributes ==========

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    pub fn set_attributes(&mut self, attributes: HashMap<String, Value>) -> &mut Self {
        self.attributes = attributes;
        self
    }

    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_attribute(key, value);
        self
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_repeated_terms() {
        let analyzer = Analyzer::new();
        let doc = analyzer.document("The cat sat. The cats ran, a cat hid!");

        let cat = analyzer.term("cat");
        assert!(doc.has_term(&cat));
        assert_eq!(doc.term_frequency_of(&cat), 3);
        assert_eq!(doc.term_frequency_of(&analyzer.term("dog")), 0);
        assert_eq!(doc.terms()[cat.stem()].term.original(), "cat");
    }

    #[test]
    fn test_invalid_words_are_not_indexed() {
        let analyzer = Analyzer::new();
        let doc = analyzer.document("an ox at 1984, 42nd");
        assert!(doc.terms().is_empty());
    }

    #[test]
    fn test_empty_text() {
        let analyzer = Analyzer::new();
        let doc = analyzer.document("");
        assert!(doc.terms().is_empty());
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn test_contractions_expand_before_indexing() {
        let analyzer = Analyzer::new();
        let doc = analyzer.document("It won't stop");
        assert_eq!(doc.text(), "It will not stop");
        assert!(doc.has_term(&analyzer.term("will")));
    }

    #[test]
    fn test_from_words_and_set_text() {
        let analyzer = Analyzer::new();
        let mut doc = Document::from_words(["maisons", "Maison", "le"], "fr", &analyzer);
        assert_eq!(doc.language(), "fr");
        assert_eq!(doc.terms().len(), 1);
        assert_eq!(doc.term_frequency_of(&analyzer.term_in("maison", "fr")), 2);

        doc.set_text("Les jardins d'été", &analyzer);
        assert_eq!(doc.term_frequency_of(&analyzer.term_in("maison", "fr")), 0);
        assert!(doc.has_term(&analyzer.term_in("été", "fr")));
        assert!(doc.has_term(&analyzer.term_in("jardin", "fr")));
    }

    #[test]
    fn test_fuzzy_frequency() {
        let analyzer = Analyzer::new();
        let doc = analyzer.document("search engines search fast");
        let keys: BTreeSet<String> = ["search".to_string(), "fast".to_string(), "slow".to_string()]
            .into_iter()
            .collect();
        assert_eq!(doc.fuzzy_frequency_of(&keys), 3);
    }

    #[test]
    fn test_attributes() {
        let analyzer = Analyzer::new();
        let mut doc = analyzer.document("attributes");
        assert!(!doc.has_attribute("tfidf"));

        doc.add_attribute("tfidf", 1.5).add_attribute("path", "a.txt");
        assert_eq!(doc.attribute("tfidf").and_then(Value::as_f64), Some(1.5));
        assert_eq!(doc.attribute("path").and_then(Value::as_str), Some("a.txt"));

        doc.set_attributes(HashMap::new());
        assert!(doc.attributes().is_empty());
    }
}
