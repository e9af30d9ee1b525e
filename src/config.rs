use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Analyzer settings. Every field has a default, so a partial JSON object
/// is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Language used when a caller does not name one.
    pub default_language: String,
    /// Expand English contractions before splitting.
    pub expand_contractions: bool,
    /// Insert a space after a period glued to the next word.
    pub repair_sentence_boundaries: bool,
    /// Upper bound on deletions for fuzzy variant generation.
    pub max_fuzzy_distance: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            expand_contractions: true,
            repair_sentence_boundaries: false,
            max_fuzzy_distance: 2,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
