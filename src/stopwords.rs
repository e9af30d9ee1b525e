use crate::error::Result;
use crate::stemming::language_key;
use crate::term::{normalize, remove_accents};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::debug;

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
    "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being",
    "below", "between", "both", "but", "by", "can't", "cannot", "could", "couldn't",
    "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down", "during",
    "each", "few", "for", "from", "further", "had", "hadn't", "has", "hasn't",
    "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i",
    "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's",
    "its", "itself", "let's", "me", "more", "most", "mustn't", "my", "myself",
    "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "ought",
    "our", "ours", "ourselves", "out", "over", "own", "same", "shan't", "she",
    "she'd", "she'll", "she's", "should", "shouldn't", "so", "some", "such",
    "than", "that", "that's", "the", "their", "theirs", "them", "themselves",
    "then", "there", "there's", "these", "they", "they'd", "they'll", "they're",
    "they've", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were",
    "weren't", "what", "what's", "when", "when's", "where", "where's", "which",
    "while", "who", "who's", "whom", "why", "why's", "with", "won't", "would",
    "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
    "yourself", "yourselves",
];

const FRENCH: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "cette", "dans", "de", "des", "du", "elle", "elles",
    "en", "est", "et", "été", "être", "eux", "il", "ils", "je", "la", "le", "les", "leur",
    "leurs", "lui", "ma", "mais", "me", "même", "mes", "moi", "mon", "ne", "nos", "notre",
    "nous", "on", "ou", "où", "par", "pas", "pour", "qu", "que", "qui", "sa", "se", "ses",
    "son", "sont", "sur", "ta", "te", "tes", "toi", "ton", "tu", "un", "une", "vos",
    "votre", "vous",
];

/// Per-language sets of stop words.
///
/// Words are stored the way [`crate::Term::normalized`] reports them
/// (normalized, accent-free), so lookups compare like with like.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    languages: HashMap<String, HashSet<String>>,
}

impl StopWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// English and French lists.
    pub fn builtin() -> Self {
        let mut stop_words = Self::new();
        stop_words.extend("en", ENGLISH.iter().copied());
        stop_words.extend("fr", FRENCH.iter().copied());
        stop_words
    }

    /// Add one raw word; returns false if it was already present or
    /// normalizes to nothing.
    pub fn insert(&mut self, language: &str, word: &str) -> bool {
        let normalized = remove_accents(&normalize(word));
        if normalized.is_empty() {
            return false;
        }
        self.languages
            .entry(language_key(language))
            .or_default()
            .insert(normalized)
    }

    pub fn extend<I, S>(&mut self, language: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.insert(language, word.as_ref());
        }
    }

    /// Read one word per line; blank lines and `#` comments are skipped.
    pub fn load_language<P: AsRef<Path>>(&mut self, language: &str, path: P) -> Result<usize> {
        let contents = fs::read_to_string(path.as_ref())?;
        let mut added = 0;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if self.insert(language, line) {
                added += 1;
            }
        }
        debug!(language, added, path = %path.as_ref().display(), "loaded stop words");
        Ok(added)
    }

    /// `normalized` must already be normalized and accent-free.
    pub fn contains(&self, normalized: &str, language: &str) -> bool {
        self.languages
            .get(&language_key(language))
            .is_some_and(|words| words.contains(normalized))
    }

    pub fn for_language(&self, language: &str) -> Option<&HashSet<String>> {
        self.languages.get(&language_key(language))
    }

    /// Every stop word across languages, de-duplicated.
    pub fn all(&self) -> HashSet<&str> {
        self.languages
            .values()
            .flat_map(|words| words.iter().map(String::as_str))
            .collect()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_lists() {
        let stop_words = StopWords::builtin();
        assert!(stop_words.contains("the", "en"));
        assert!(stop_words.contains("the", "EN"));
        assert!(stop_words.contains("ete", "fr"));
        assert!(!stop_words.contains("the", "fr"));
        assert!(!stop_words.contains("rust", "en"));
        assert!(stop_words.all().contains("les"));
    }

    #[test]
    fn test_insert_normalizes() {
        let mut stop_words = StopWords::new();
        assert!(stop_words.insert("fr", "Même,"));
        assert!(!stop_words.insert("fr", "meme"));
        assert!(!stop_words.insert("fr", "!!"));
        assert!(stop_words.contains("meme", "fr"));
    }

    #[test]
    fn test_load_language() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "# German")?;
        writeln!(file, "der")?;
        writeln!(file)?;
        writeln!(file, "Über")?;

        let mut stop_words = StopWords::new();
        assert_eq!(stop_words.load_language("de", file.path())?, 2);
        assert!(stop_words.contains("uber", "de"));
        assert_eq!(stop_words.languages().collect::<Vec<_>>(), vec!["de"]);
        Ok(())
    }
}
