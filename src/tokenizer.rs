use regex::Regex;
use std::borrow::Cow;

lazy_static::lazy_static! {
    /// Runs of whitespace and punctuation, collapsed into one delimiter.
    static ref DELIMITERS: Regex = Regex::new(
        r#"[\s\u{00A0},;:()\[\]{}<>"“”„‟«»‹›…/\\!?¡¿·.]+"#
    )
    .expect("delimiter pattern is valid");

    static ref CONTRACTIONS: Vec<(Regex, &'static str)> = [
        (r"(?i)\bcan['’]t\b", "cannot"),
        (r"(?i)\bwon['’]t\b", "will not"),
        (r"(?i)\bshan['’]t\b", "shall not"),
        (r"(?i)n['’]t\b", " not"),
        (r"(?i)['’]re\b", " are"),
        (r"(?i)['’]s\b", " is"),
        (r"(?i)['’]ll\b", " will"),
        (r"(?i)['’]d\b", " would"),
        (r"(?i)['’]ve\b", " have"),
        (r"(?i)['’]m\b", " am"),
    ]
    .iter()
    .map(|(pattern, expansion)| {
        (Regex::new(pattern).expect("contraction pattern is valid"), *expansion)
    })
    .collect();

    static ref GLUED_SENTENCE: Regex =
        Regex::new(r"([^\s.])\.([^\s.])").expect("sentence pattern is valid");

    static ref GLUED_ELLIPSIS: Regex =
        Regex::new(r"(\.{3,})([^\s.])").expect("ellipsis pattern is valid");
}

/// Splits plain text into raw words.
///
/// Markup must already be stripped and entities decoded.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    expand_contractions: bool,
    repair_sentence_boundaries: bool,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            expand_contractions: true,
            repair_sentence_boundaries: false,
        }
    }

    pub fn with_contractions(mut self, enabled: bool) -> Self {
        self.expand_contractions = enabled;
        self
    }

    pub fn with_sentence_repair(mut self, enabled: bool) -> Self {
        self.repair_sentence_boundaries = enabled;
        self
    }

    /// Rewrite text ahead of splitting: optional sentence-boundary repair,
    /// then English contraction expansion.
    pub fn prepare<'t>(&self, text: &'t str, language: &str) -> Cow<'t, str> {
        let mut prepared = Cow::Borrowed(text);

        if self.repair_sentence_boundaries {
            prepared = replace_owned(prepared, &GLUED_SENTENCE, "$1. $2");
            prepared = replace_owned(prepared, &GLUED_ELLIPSIS, "$1 $2");
        }

        if self.expand_contractions && language.eq_ignore_ascii_case("en") {
            for (pattern, expansion) in CONTRACTIONS.iter() {
                prepared = replace_owned(prepared, pattern, expansion);
            }
        }

        prepared
    }

    /// Lazily split prepared text on delimiter runs.
    ///
    /// Fragments at the edges may be empty; callers skip them.
    pub fn split<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        DELIMITERS.split(text)
    }

    /// Prepare and split, keeping only non-empty words.
    pub fn tokenize(&self, text: &str, language: &str) -> Vec<String> {
        let prepared = self.prepare(text, language);
        self.split(&prepared)
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn replace_owned<'t>(text: Cow<'t, str>, pattern: &Regex, replacement: &str) -> Cow<'t, str> {
    let replaced = match pattern.replace_all(&text, replacement) {
        Cow::Owned(replaced) => Some(replaced),
        Cow::Borrowed(_) => None,
    };
    match replaced {
        Some(replaced) => Cow::Owned(replaced),
        None => text,
    }
}
