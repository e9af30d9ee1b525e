use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

lazy_static::lazy_static! {
    static ref URL_PREFIX: Regex =
        Regex::new(r"(?i)^(https?://)?www\.").expect("url prefix pattern is valid");
}

/// HTML entity some sources leave in place of an apostrophe.
const APOSTROPHE_ENTITY: &str = "&#39;";

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '’' | '´' | '`')
}

/// Normalize a raw word: drop a leading elision (`l'`, `d’`...), drop one
/// trailing non-letter, canonicalize apostrophes, trim everything that is
/// not a letter, a digit or a hyphen from both ends, then lower-case.
pub fn normalize(raw: &str) -> String {
    let word = strip_elision(raw);

    let word = match word.chars().next_back() {
        Some(last) if !last.is_alphabetic() => &word[..word.len() - last.len_utf8()],
        _ => word,
    };

    let word: String = word
        .chars()
        .map(|c| if is_apostrophe(c) { '\'' } else { c })
        .collect();

    word.trim_matches(|c: char| !(c.is_alphabetic() || c.is_ascii_digit() || c == '-'))
        .to_lowercase()
}

fn strip_elision(word: &str) -> &str {
    let Some(first) = word.chars().next() else {
        return word;
    };
    let rest = &word[first.len_utf8()..];

    if let Some(stripped) = rest.strip_prefix(APOSTROPHE_ENTITY) {
        return stripped;
    }

    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if is_apostrophe(c) => chars.as_str(),
        _ => word,
    }
}

/// Fold accented Latin letters to their base letters. Ligatures expand to two
/// letters and upper-case letters stay upper-case.
pub fn remove_accents(word: &str) -> String {
    let mut folded = String::with_capacity(word.len());
    for c in word.chars() {
        match fold_accent(c) {
            Some(base) => folded.push_str(base),
            None => folded.push(c),
        }
    }
    folded
}

fn fold_accent(c: char) -> Option<&'static str> {
    let base = match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => "a",
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => "A",
        'ç' => "c",
        'Ç' => "C",
        'é' | 'è' | 'ê' | 'ë' => "e",
        'É' | 'È' | 'Ê' | 'Ë' => "E",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'Í' | 'Ì' | 'Î' | 'Ï' => "I",
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => "o",
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => "O",
        'ú' | 'ù' | 'û' | 'ü' => "u",
        'Ú' | 'Ù' | 'Û' | 'Ü' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' | 'Ÿ' => "Y",
        'ñ' => "n",
        'Ñ' => "N",
        'œ' => "oe",
        'Œ' => "OE",
        'æ' => "ae",
        'Æ' => "AE",
        _ => return None,
    };
    Some(base)
}

/// Whether a normalized word is worth indexing: longer than two characters,
/// not a `www.` address and starting with a letter.
pub fn is_valid(normalized: &str) -> bool {
    normalized.chars().count() > 2
        && !URL_PREFIX.is_match(normalized)
        && normalized.chars().next().is_some_and(char::is_alphabetic)
}

/// One word occurrence, normalized and stemmed for a language.
///
/// Terms are built by [`crate::Analyzer`]. Two terms are equal, and hash the
/// same, when their stems are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    original: String,
    language: String,
    normalized: String,
    stem: String,
    is_valid: bool,
}

impl Term {
    pub(crate) fn from_parts(
        original: &str,
        language: String,
        normalized: String,
        stem: String,
        is_valid: bool,
    ) -> Self {
        Self {
            original: original.to_string(),
            language,
            normalized,
            stem,
            is_valid,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Case-folded, accent-free, trimmed form.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Index key: the stemmed normalized form, accent-free.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.stem == other.stem
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.stem.hash(state);
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
