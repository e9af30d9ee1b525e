use crate::config::AnalyzerConfig;
use crate::document::Document;
use crate::fuzzy::FuzzyGenerator;
use crate::stemming::{language_key, SharedRegistry, Stemmer, StemmerRegistry};
use crate::term::{self, Term};
use crate::tokenizer::Tokenizer;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

/// Memo tables for one language.
#[derive(Debug, Default)]
pub struct LanguageCache {
    normalized: DashMap<String, String>,
    unaccented: DashMap<String, String>,
    validity: DashMap<String, bool>,
    stems: DashMap<String, String>,
}

impl LanguageCache {
    pub fn len(&self) -> usize {
        self.normalized.len() + self.unaccented.len() + self.validity.len() + self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&self) {
        self.normalized.clear();
        self.unaccented.clear();
        self.validity.clear();
        self.stems.clear();
    }
}

fn memoize<V, F>(table: &DashMap<String, V>, key: &str, compute: F) -> V
where
    V: Clone,
    F: FnOnce() -> V,
{
    if let Some(hit) = table.get(key) {
        return hit.value().clone();
    }
    let value = compute();
    table.insert(key.to_string(), value.clone());
    value
}

/// Process-lifetime memoization of term analysis, keyed by language and then
/// by the exact input string. Entries never cross languages.
#[derive(Debug, Default)]
pub struct TermCache {
    languages: DashMap<String, Arc<LanguageCache>>,
}

impl TermCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables for `language` (already lower-cased), created on first use.
    pub fn language(&self, language: &str) -> Arc<LanguageCache> {
        if let Some(cache) = self.languages.get(language) {
            return Arc::clone(cache.value());
        }
        Arc::clone(self.languages.entry(language.to_string()).or_default().value())
    }

    /// Total entries across languages and tables.
    pub fn len(&self) -> usize {
        self.languages.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for entry in self.languages.iter() {
            entry.value().clear();
        }
        debug!("cleared term cache");
    }

    pub fn clear_language(&self, language: &str) {
        if let Some(cache) = self.languages.get(&language_key(language)) {
            cache.value().clear();
        }
    }
}

/// Turns raw words and text into [`Term`]s and [`Document`]s.
///
/// The analyzer owns the stemmer registry and every memo table, so one
/// instance should be built up front and shared (it is `Send + Sync`).
pub struct Analyzer {
    config: AnalyzerConfig,
    registry: SharedRegistry,
    cache: TermCache,
    tokenizer: Tokenizer,
    fuzzy: FuzzyGenerator,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self::with_registry(config, StemmerRegistry::default())
    }

    pub fn with_registry(config: AnalyzerConfig, registry: StemmerRegistry) -> Self {
        let tokenizer = Tokenizer::new()
            .with_contractions(config.expand_contractions)
            .with_sentence_repair(config.repair_sentence_boundaries);
        let fuzzy = FuzzyGenerator::new(config.max_fuzzy_distance);

        Self {
            config,
            registry: RwLock::new(registry),
            cache: TermCache::new(),
            tokenizer,
            fuzzy,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn default_language(&self) -> &str {
        &self.config.default_language
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn fuzzy(&self) -> &FuzzyGenerator {
        &self.fuzzy
    }

    pub fn cache(&self) -> &TermCache {
        &self.cache
    }

    // ========== Stemmer registry ==========

    pub fn has_stemmer(&self, language: &str) -> bool {
        self.registry.read().has(language)
    }

    /// Register a stemmer; stems cached for that language are dropped.
    pub fn register_stemmer<S>(&self, language: &str, stemmer: S)
    where
        S: Stemmer + 'static,
    {
        let mut registry = self.registry.write();
        registry.add(language, stemmer);
        self.cache.language(&language_key(language)).stems.clear();
    }

    /// Remove a stemmer; words in that language then stem to themselves.
    pub fn remove_stemmer(&self, language: &str) -> bool {
        let mut registry = self.registry.write();
        let removed = registry.remove(language).is_some();
        self.cache.language(&language_key(language)).stems.clear();
        removed
    }

    // ========== Memoized term functions ==========

    pub fn normalize(&self, raw: &str, language: &str) -> String {
        let cache = self.cache.language(&language_key(language));
        memoize(&cache.normalized, raw, || term::normalize(raw))
    }

    pub fn remove_accents(&self, word: &str, language: &str) -> String {
        let cache = self.cache.language(&language_key(language));
        memoize(&cache.unaccented, word, || term::remove_accents(word))
    }

    pub fn is_valid(&self, normalized: &str, language: &str) -> bool {
        let cache = self.cache.language(&language_key(language));
        memoize(&cache.validity, normalized, || term::is_valid(normalized))
    }

    /// Stem a normalized word. Unregistered languages return it unchanged.
    pub fn stem(&self, normalized: &str, language: &str) -> String {
        let language = language_key(language);
        let cache = self.cache.language(&language);
        // Held across compute and insert so a registry change cannot slip a
        // stale stem into the table.
        let registry = self.registry.read();
        memoize(&cache.stems, normalized, || {
            trace!(word = normalized, language = %language, "stemming");
            registry.stem(normalized, &language)
        })
    }

    // ========== Terms and documents ==========

    /// Build a term in the default language.
    pub fn term(&self, raw: &str) -> Term {
        self.term_in(raw, &self.config.default_language)
    }

    pub fn term_in(&self, raw: &str, language: &str) -> Term {
        let language = language_key(language);
        let normalized = self.normalize(raw, &language);
        let folded = self.remove_accents(&normalized, &language);
        let stem = self.remove_accents(&self.stem(&normalized, &language), &language);
        let is_valid = self.is_valid(&folded, &language);

        Term::from_parts(raw, language, folded, stem, is_valid)
    }

    /// Tokenize `text` in the default language and index its terms.
    pub fn document(&self, text: &str) -> Document {
        self.document_in(text, &self.config.default_language)
    }

    pub fn document_in(&self, text: &str, language: &str) -> Document {
        Document::new(text, language, self)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
