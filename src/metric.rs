//! Integer-valued metrics over stored values.
//!
//! The indexes in this crate never look inside the values they store; all
//! similarity structure comes from a caller-supplied [`Metric`]. The
//! Levenshtein edit distance in [`levenshtein`] is the implementation the
//! crate is normally used with, parameterized by the cost functions in
//! [`costs`].

pub mod costs;
pub mod levenshtein;

pub use costs::{CaseInsensitiveCosts, CostFunction, UnitCosts};
pub use levenshtein::{LengthMetric, Levenshtein};

/// An integer-valued distance function over values of type `V`.
///
/// Implementations must satisfy the metric axioms:
///
/// - `distance(a, b) == 0` if and only if `a` and `b` are equal,
/// - `distance(a, b) == distance(b, a)`,
/// - `distance(a, c) <= distance(a, b) + distance(b, c)`.
///
/// The indexes rely on these axioms both for pruning and for treating
/// distance 0 as "already stored" on insertion. A degenerate metric that
/// reports 0 for distinguishable values makes those values collapse into a
/// single stored instance; that is a violation of this contract, not
/// something the indexes detect.
pub trait Metric<V: ?Sized> {
    /// Compute the distance between `a` and `b`.
    fn distance(&self, a: &V, b: &V) -> u32;
}
