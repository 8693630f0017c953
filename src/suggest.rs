//! Weighted "did you mean" suggestion resolution.
//!
//! [`DidYouMean`] wraps either index type and re-ranks equally distant
//! matches by a per-term weight, typically the frequency of the term in a
//! corpus, so that the most common candidate is suggested first.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::{BkTree, Dictionary, NgramIndex};
use crate::metric::Metric;

/// A weighted suggestion: a stored term and its accumulated weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    term: String,
    weight: u64,
}

impl Suggestion {
    /// The suggested term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The accumulated weight of the term.
    pub fn weight(&self) -> u64 {
        self.weight
    }
}

/// Resolves "did you mean" suggestions over a backing dictionary.
///
/// Construction picks the backing index; afterwards the resolver behaves
/// identically for either choice.
pub struct DidYouMean<D> {
    dict: D,
    weights: AHashMap<String, u64>,
}

impl<M: Metric<String>> DidYouMean<BkTree<String, M>> {
    /// Create a resolver backed by a [`BkTree`].
    pub fn with_bk_tree(metric: M) -> Self {
        DidYouMean {
            dict: BkTree::new(metric),
            weights: AHashMap::new(),
        }
    }
}

impl<M: Metric<String>> DidYouMean<NgramIndex<M>> {
    /// Create a resolver backed by an [`NgramIndex`] over n-grams of
    /// length `n`. Fails if `n` is zero.
    pub fn with_ngram_index(n: usize, metric: M) -> Result<Self> {
        Ok(DidYouMean {
            dict: NgramIndex::new(n, metric)?,
            weights: AHashMap::new(),
        })
    }
}

impl<D: Dictionary<String>> DidYouMean<D> {
    /// Add a term, accumulating `weight` onto any weight recorded so far.
    ///
    /// The term enters the backing dictionary only on first sighting, so
    /// repeated additions adjust the weight without growing the index.
    pub fn add(&mut self, term: &str, weight: u64) {
        match self.weights.get_mut(term) {
            Some(total) => *total += weight,
            None => {
                self.weights.insert(term.to_string(), weight);
                self.dict.add(term.to_string());
            }
        }
    }

    /// The accumulated weight of `term`, if it was ever added.
    pub fn weight(&self, term: &str) -> Option<u64> {
        self.weights.get(term).copied()
    }

    /// Return the stored terms most similar to `word`, heaviest first.
    ///
    /// Matches are the distinct best matches of the backing dictionary
    /// (the word itself is never suggested); equally similar terms are
    /// ordered by descending weight, ties broken by term, so the most
    /// frequent candidate comes first.
    pub fn suggest(&self, word: &str, max_dist: u32) -> Vec<Suggestion> {
        let word = word.to_string();
        let mut result: Vec<Suggestion> = self
            .dict
            .lookup_distinct(&word, max_dist)
            .into_iter()
            .map(|elem| {
                let term = elem.into_value();
                let weight = self.weights.get(&term).copied().unwrap_or(0);
                Suggestion { term, weight }
            })
            .collect();
        result.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.term.cmp(&b.term)));
        result
    }
}
