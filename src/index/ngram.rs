//! An inverted index over fixed-length n-grams for approximate lookup.
//!
//! Trades the exactness of a metric tree for speed. Lookup runs a
//! two-phase pipeline: candidates are generated from shared n-grams and
//! ranked by the cheap symmetric-difference gram distance, then the
//! survivors are curated with the real metric. A stored term can only
//! become a candidate if it shares at least one n-gram with the query, so
//! the real metric is never evaluated against the whole vocabulary.

use ahash::{AHashMap, AHashSet};
use log::debug;

use super::{Dictionary, ResultElem};
use crate::error::{CorrigoError, Result};
use crate::metric::Metric;

/// Default boundary padding. U+FFFF is a noncharacter and will not occur
/// in meaningful terms.
const PADDING: char = '\u{ffff}';

/// An n-gram dictionary over string terms.
///
/// When a term is added, it is padded on both ends with a sentinel
/// character (half the n-gram length per side) so boundary characters
/// participate in n-grams, and every overlapping window of length `n` is
/// indexed. Grows monotonically; there is no removal.
pub struct NgramIndex<M> {
    n: usize,
    padding: char,
    metric: M,
    index: AHashMap<String, AHashSet<String>>,
}

impl<M: Metric<String>> NgramIndex<M> {
    /// Create an index over n-grams of length `n`.
    ///
    /// `metric` is only applied during the curation phase, after
    /// candidates were retrieved by gram distance. Fails with
    /// [`CorrigoError::InvalidArgument`] if `n` is zero.
    pub fn new(n: usize, metric: M) -> Result<Self> {
        if n < 1 {
            return Err(CorrigoError::invalid_argument(format!(
                "n-gram length must be greater than zero, got {n}"
            )));
        }
        Ok(NgramIndex {
            n,
            padding: PADDING,
            metric,
            index: AHashMap::new(),
        })
    }

    /// Replace the boundary padding character. The padding should not
    /// occur in stored terms.
    pub fn padding(mut self, padding: char) -> Self {
        self.padding = padding;
        self
    }

    fn ngrams(&self, term: &str) -> AHashSet<String> {
        let pad = self.n / 2;
        let mut padded: Vec<char> = Vec::with_capacity(term.len() + 2 * pad);
        padded.extend(std::iter::repeat_n(self.padding, pad));
        padded.extend(term.chars());
        padded.extend(std::iter::repeat_n(self.padding, pad));
        // Terms shorter than the window still produce one n-gram.
        while padded.len() < self.n {
            padded.push(self.padding);
        }
        padded
            .windows(self.n)
            .map(|window| window.iter().collect())
            .collect()
    }

    /// Phase one: every term sharing an n-gram with the query, ranked by
    /// the symmetric-difference gram distance |Q ∪ T| - |Q ∩ T|.
    ///
    /// A single edit changes at most `n` overlapping n-grams, so a
    /// candidate more than `n` gram-distance behind the running best can
    /// never curate into a tied-best result and is dropped early. The
    /// second pass repeats the cut because the best may have improved
    /// after a candidate was admitted.
    fn candidates(&self, query_grams: &AHashSet<String>) -> Vec<ResultElem<String>> {
        let slack = self.n as u32;
        let mut best = u32::MAX;
        let mut seen: AHashSet<&String> = AHashSet::new();
        let mut found: Vec<ResultElem<String>> = Vec::new();

        for gram in query_grams {
            let Some(terms) = self.index.get(gram) else {
                continue;
            };
            for term in terms {
                if !seen.insert(term) {
                    continue;
                }
                let term_grams = self.ngrams(term);
                let shared = query_grams.intersection(&term_grams).count();
                let union = query_grams.len() + term_grams.len() - shared;
                let d = (union - shared) as u32;
                if d > best.saturating_add(slack) {
                    continue;
                }
                if d < best {
                    best = d;
                }
                found.push(ResultElem::new(term.clone(), d));
            }
        }
        found.retain(|elem| elem.distance() <= best.saturating_add(slack));
        found
    }

    /// Phase two: re-rank the candidates with the real metric, keeping
    /// only the closest ones within `max_dist`.
    fn curate(
        &self,
        query: &String,
        found: Vec<ResultElem<String>>,
        max_dist: u32,
        skip_query: bool,
    ) -> Vec<ResultElem<String>> {
        debug!("curating {} n-gram candidates", found.len());
        let mut best = u32::MAX;
        let mut result: Vec<ResultElem<String>> = Vec::new();
        for elem in found {
            let term = elem.into_value();
            if skip_query && term == *query {
                continue;
            }
            let d = self.metric.distance(query, &term);
            if d > max_dist || d > best {
                continue;
            }
            if d < best {
                best = d;
                result.clear();
            }
            result.push(ResultElem::new(term, d));
        }
        result
    }
}

impl<M: Metric<String>> Dictionary<String> for NgramIndex<M> {
    fn add(&mut self, value: String) {
        for gram in self.ngrams(&value) {
            self.index.entry(gram).or_default().insert(value.clone());
        }
    }

    fn lookup(&self, query: &String, max_dist: u32) -> Vec<ResultElem<String>> {
        let found = self.candidates(&self.ngrams(query));
        self.curate(query, found, max_dist, false)
    }

    fn lookup_distinct(&self, query: &String, max_dist: u32) -> Vec<ResultElem<String>> {
        let found = self.candidates(&self.ngrams(query));
        self.curate(query, found, max_dist, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Levenshtein;

    fn index_of(words: &[&str]) -> NgramIndex<Levenshtein> {
        let mut index = NgramIndex::new(3, Levenshtein::new()).unwrap();
        for word in words {
            index.add(word.to_string());
        }
        index
    }

    fn values(result: &[ResultElem<String>]) -> Vec<&str> {
        let mut v: Vec<&str> = result.iter().map(|e| e.value().as_str()).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_zero_length_is_rejected() {
        assert!(matches!(
            NgramIndex::new(0, Levenshtein::new()),
            Err(CorrigoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_ngrams_cover_boundaries() {
        let index = NgramIndex::new(3, Levenshtein::new()).unwrap().padding('$');
        let grams = index.ngrams("abc");
        let mut grams: Vec<&str> = grams.iter().map(String::as_str).collect();
        grams.sort_unstable();
        assert_eq!(grams, vec!["$ab", "abc", "bc$"]);
    }

    #[test]
    fn test_short_term_still_indexed() {
        let index = NgramIndex::new(4, Levenshtein::new()).unwrap().padding('$');
        let grams = index.ngrams("a");
        // Padded to "$$a$$": windows $$a$, $a$$.
        assert_eq!(grams.len(), 2);
    }

    #[test]
    fn test_self_lookup() {
        let index = index_of(&["halligalli", "dingens", "zeug"]);
        let result = index.lookup(&"halligalli".to_string(), 2);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value(), "halligalli");
        assert_eq!(result[0].distance(), 0);
    }

    #[test]
    fn test_distinct_excludes_query() {
        let index = index_of(&["dingens", "dingensx"]);
        let result = index.lookup_distinct(&"dingens".to_string(), 2);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value(), "dingensx");
        assert_eq!(result[0].distance(), 1);
    }

    #[test]
    fn test_best_only_filtering() {
        let index = index_of(&["ab1de", "ab2de", "ab23de", "ab44de"]);
        let result = index.lookup(&"abcde".to_string(), 2);
        assert_eq!(values(&result), vec!["ab1de", "ab2de"]);
        assert!(result.iter().all(|e| e.distance() == 1));
    }

    #[test]
    fn test_idempotent_insertion() {
        let mut index = index_of(&["wetter", "winter", "wirt"]);
        let before = index.lookup(&"winter".to_string(), 2);
        index.add("winter".to_string());
        let after = index.lookup(&"winter".to_string(), 2);
        assert_eq!(before, after);
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn test_unindexed_grams_contribute_nothing() {
        let index = index_of(&["abcdef"]);
        assert!(index.lookup(&"zzzzzz".to_string(), 1).is_empty());
    }

    #[test]
    fn test_matches_brute_force() {
        let words = [
            "schneider", "schneiders", "schneiser", "schreiner", "schreiben",
            "scheinwerfer", "reiniger", "steiger",
        ];
        let index = index_of(&words);
        let metric = Levenshtein::new();
        for query in ["schneider", "schneide", "schreiness", "steigers"] {
            let query = query.to_string();
            let by_index = index.lookup(&query, 2);
            // Brute force: real metric against every stored term.
            let best = words
                .iter()
                .map(|w| metric.distance(&query, &w.to_string()))
                .filter(|&d| d <= 2)
                .min();
            match best {
                None => assert!(by_index.is_empty(), "query {query}"),
                Some(best) => {
                    let mut expected: Vec<&str> = words
                        .iter()
                        .copied()
                        .filter(|w| metric.distance(&query, &w.to_string()) == best)
                        .collect();
                    expected.sort_unstable();
                    assert_eq!(values(&by_index), expected, "query {query}");
                    assert!(by_index.iter().all(|e| e.distance() == best));
                }
            }
        }
    }
}
