//! Approximate-match indexes over a caller-supplied metric.
//!
//! Two interchangeable implementations of the [`Dictionary`] boundary:
//!
//! - [`BkTree`]: a metric tree that prunes subtrees with the triangle
//!   inequality. Exact with respect to the metric.
//! - [`NgramIndex`]: an inverted index over fixed-length n-grams that
//!   generates candidates cheaply and curates them with the real metric.
//!   Faster on large vocabularies, exact only insofar as near matches
//!   share n-grams with the query.
//!
//! [`OrderedLookup`] additionally streams the matches of a [`BkTree`] in a
//! caller-supplied order, lazily and with an optional deadline.

pub mod bktree;
pub mod ngram;
pub mod ordered;

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use bktree::BkTree;
pub use ngram::NgramIndex;
pub use ordered::OrderedLookup;

/// A dictionary supporting approximate lookup.
///
/// Both index types implement this boundary identically, so callers can
/// swap one for the other.
pub trait Dictionary<V> {
    /// Add the given value to the dictionary.
    ///
    /// Adding a value that is already present (distance 0 to a stored
    /// value) leaves the dictionary unchanged; the dictionary is a set.
    fn add(&mut self, value: V);

    /// Return the stored values most similar to `query`.
    ///
    /// Only values within `max_dist` of the query qualify; of those, only
    /// the ones at the smallest occurring distance are returned, so every
    /// element of a non-empty result is equally similar to the query. The
    /// result is empty when nothing qualifies; an empty dictionary is not
    /// an error. If the query itself is stored, the result is typically
    /// just `(query, 0)`; use
    /// [`lookup_distinct`](Dictionary::lookup_distinct) to see its
    /// neighbors instead.
    fn lookup(&self, query: &V, max_dist: u32) -> Vec<ResultElem<V>>;

    /// Like [`lookup`](Dictionary::lookup), but never returns the query
    /// value itself, so that looking up a stored term surfaces its
    /// neighbors.
    fn lookup_distinct(&self, query: &V, max_dist: u32) -> Vec<ResultElem<V>>;
}

/// A single lookup result: a stored value and its distance from the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultElem<V> {
    value: V,
    distance: u32,
}

impl<V> ResultElem<V> {
    /// Create a result element.
    pub fn new(value: V, distance: u32) -> Self {
        ResultElem { value, distance }
    }

    /// The value found in the dictionary.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The distance of the value from the query.
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Consume the element, returning the value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// Order result elements by ascending distance.
    pub fn cmp_by_distance(&self, other: &Self) -> Ordering {
        self.distance.cmp(&other.distance)
    }
}

impl<V: fmt::Display> fmt::Display for ResultElem<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.value, self.distance)
    }
}
