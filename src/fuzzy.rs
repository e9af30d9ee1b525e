use crate::error::{Error, Result};
use crate::term::Term;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::trace;

/// Generates the strings reachable from a term by deleting characters.
///
/// The number of variants grows combinatorially with the distance, so every
/// generator carries a bound and refuses distances above it. Results are
/// memoized per `(term, distance)`.
pub struct FuzzyGenerator {
    max_distance: usize,
    cache: DashMap<(String, usize), Arc<[String]>>,
}

impl FuzzyGenerator {
    pub fn new(max_distance: usize) -> Self {
        Self {
            max_distance,
            cache: DashMap::new(),
        }
    }

    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    /// Every string obtained by deleting exactly `distance` characters from
    /// `term`. Duplicates are kept: a distance of 1 yields one entry per
    /// character. A distance of 0 yields the term itself.
    pub fn misspelled_variants(&self, term: &str, distance: usize) -> Result<Arc<[String]>> {
        self.check(distance)?;
        Ok(self.deletions(term, distance))
    }

    /// Same as [`Self::misspelled_variants`], duplicates collapsed.
    pub fn variant_set(&self, term: &str, distance: usize) -> Result<BTreeSet<String>> {
        Ok(self.misspelled_variants(term, distance)?.iter().cloned().collect())
    }

    /// Lookup keys tolerating up to `distance` deletions: the term's stem and
    /// its variants at every distance from 1 to `distance`.
    pub fn term_variants(&self, term: &Term, distance: usize) -> Result<BTreeSet<String>> {
        self.check(distance)?;

        let mut keys = BTreeSet::new();
        keys.insert(term.stem().to_string());
        for d in 1..=distance {
            keys.extend(self.deletions(term.stem(), d).iter().cloned());
        }
        Ok(keys)
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    fn check(&self, distance: usize) -> Result<()> {
        if distance > self.max_distance {
            return Err(Error::DistanceExceedsBound {
                distance,
                max: self.max_distance,
            });
        }
        Ok(())
    }

    fn deletions(&self, term: &str, distance: usize) -> Arc<[String]> {
        let key = (term.to_string(), distance);
        if let Some(hit) = self.cache.get(&key) {
            return Arc::clone(hit.value());
        }

        trace!(term, distance, "generating deletion variants");
        let variants: Arc<[String]> = match distance {
            0 => Arc::from(vec![term.to_string()]),
            1 => term
                .char_indices()
                .map(|(at, c)| format!("{}{}", &term[..at], &term[at + c.len_utf8()..]))
                .collect(),
            _ => {
                let chars: Vec<(usize, char)> = term.char_indices().collect();
                let mut variants = Vec::new();
                if chars.len() >= distance {
                    for &(at, c) in &chars[..=chars.len() - distance] {
                        let prefix = &term[..at];
                        let rest = &term[at + c.len_utf8()..];
                        for tail in self.deletions(rest, distance - 1).iter() {
                            variants.push(format!("{prefix}{tail}"));
                        }
                    }
                }
                variants.into()
            }
        };

        self.cache.insert(key, Arc::clone(&variants));
        variants
    }
}

impl Default for FuzzyGenerator {
    fn default() -> Self {
        Self::new(2)
    }
}
