//! # Corrigo
//!
//! Approximate-match dictionaries for Rust, serving spell-checking and
//! "did you mean" style lookups over large term vocabularies.
//!
//! ## Features
//!
//! - BK-tree index with triangle-inequality pruning
//! - Ordered, cancellable lazy retrieval over the tree
//! - N-gram inverted index with two-phase candidate curation
//! - Pluggable integer metrics, including a cost-parameterized Levenshtein
//! - Weighted "did you mean" suggestion resolution
//!
//! The indexes are single-threaded by design: insertion takes `&mut self`
//! and ordered retrieval borrows the tree, so the borrow checker rules
//! out mutation during traversal. Share an index across threads only with
//! external synchronization.

// Core modules
mod error;
pub mod index;
pub mod ingest;
pub mod metric;
pub mod suggest;

// Re-exports for the public API
pub use error::{CorrigoError, Result};
pub use index::{BkTree, Dictionary, NgramIndex, OrderedLookup, ResultElem};
pub use metric::{CaseInsensitiveCosts, CostFunction, LengthMetric, Levenshtein, Metric, UnitCosts};
pub use suggest::{DidYouMean, Suggestion};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
