//! A Burkhard-Keller tree for approximate lookup in a metric space.
//!
//! Every child of a node is keyed by its exact distance to that node.
//! During lookup the triangle inequality proves that only children keyed
//! within `[d - max_dist, d + max_dist]` of the node's own distance `d`
//! can hold matches, so all other subtrees are skipped unvisited. Expected
//! sublinear behavior rests entirely on that pruning; a near-constant
//! metric degrades lookup to a linear scan.

use log::trace;

use super::{Dictionary, ResultElem};
use crate::metric::Metric;

/// A metric tree index over values of type `V`.
///
/// Typical use: [`add`](Dictionary::add) values, then
/// [`lookup`](Dictionary::lookup) a query to find the stored values most
/// similar to it. Tree shape is a side effect of insertion order and
/// metric geometry; no balancing is performed, and there is no way to
/// delete values.
///
/// The metric must satisfy the [`Metric`] axioms; in particular the tree
/// treats distance 0 as "already stored" on insertion.
pub struct BkTree<V, M> {
    root: Option<Box<BkNode<V>>>,
    metric: M,
}

pub(crate) struct BkNode<V> {
    value: V,
    /// `children[d]` holds the child at exactly distance `d`, if any.
    children: Vec<Option<Box<BkNode<V>>>>,
}

impl<V> BkNode<V> {
    fn new(value: V) -> Self {
        BkNode {
            value,
            children: Vec::new(),
        }
    }

    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = &BkNode<V>> {
        self.children.iter().filter_map(|slot| slot.as_deref())
    }
}

impl<V, M: Metric<V>> BkTree<V, M> {
    /// Create an empty tree organized by `metric`.
    pub fn new(metric: M) -> Self {
        BkTree { root: None, metric }
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn root(&self) -> Option<&BkNode<V>> {
        self.root.as_deref()
    }

    pub(crate) fn metric(&self) -> &M {
        &self.metric
    }

    fn insert(metric: &M, node: &mut BkNode<V>, value: V) {
        let d = metric.distance(&node.value, &value) as usize;
        if d == 0 {
            // Distance 0 means the value is already stored, by the metric
            // contract.
            return;
        }
        if d >= node.children.len() {
            node.children.resize_with(d + 1, || None);
        }
        match &mut node.children[d] {
            Some(child) => Self::insert(metric, child, value),
            slot @ None => *slot = Some(Box::new(BkNode::new(value))),
        }
    }

    fn collect(
        metric: &M,
        node: &BkNode<V>,
        query: &V,
        max_dist: u32,
        out: &mut Vec<ResultElem<V>>,
    ) where
        V: Clone,
    {
        let d = metric.distance(&node.value, query);
        if d <= max_dist {
            out.push(ResultElem::new(node.value.clone(), d));
        }
        // Only children keyed within [d - max_dist, d + max_dist] can be
        // within max_dist of the query.
        let lo = d.saturating_sub(max_dist) as usize;
        let hi = (d as usize + max_dist as usize + 1).min(node.children.len());
        if lo >= hi {
            return;
        }
        for child in node.children[lo..hi].iter().filter_map(|slot| slot.as_deref()) {
            Self::collect(metric, child, query, max_dist, out);
        }
    }

    fn lookup_impl(&self, query: &V, max_dist: u32, skip_query: bool) -> Vec<ResultElem<V>>
    where
        V: Clone + PartialEq,
    {
        let mut result = Vec::new();
        let Some(root) = self.root.as_deref() else {
            return result;
        };
        Self::collect(&self.metric, root, query, max_dist, &mut result);
        if skip_query {
            result.retain(|elem| elem.value() != query);
        }
        trace!("bk-tree lookup collected {} values within {}", result.len(), max_dist);
        let Some(best) = result.iter().map(ResultElem::distance).min() else {
            return result;
        };
        result.retain(|elem| elem.distance() == best);
        result
    }
}

impl<V, M> Dictionary<V> for BkTree<V, M>
where
    V: Clone + PartialEq,
    M: Metric<V>,
{
    fn add(&mut self, value: V) {
        match &mut self.root {
            Some(root) => Self::insert(&self.metric, root, value),
            root @ None => *root = Some(Box::new(BkNode::new(value))),
        }
    }

    fn lookup(&self, query: &V, max_dist: u32) -> Vec<ResultElem<V>> {
        self.lookup_impl(query, max_dist, false)
    }

    fn lookup_distinct(&self, query: &V, max_dist: u32) -> Vec<ResultElem<V>> {
        self.lookup_impl(query, max_dist, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Levenshtein;

    fn tree_of(words: &[&str]) -> BkTree<String, Levenshtein> {
        let mut tree = BkTree::new(Levenshtein::new());
        for word in words {
            tree.add(word.to_string());
        }
        tree
    }

    fn values(result: &[ResultElem<String>]) -> Vec<&str> {
        let mut v: Vec<&str> = result.iter().map(|e| e.value().as_str()).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_empty_tree_lookup() {
        let tree: BkTree<String, Levenshtein> = BkTree::new(Levenshtein::new());
        assert!(tree.is_empty());
        assert!(tree.lookup(&"anything".to_string(), 3).is_empty());
    }

    #[test]
    fn test_self_lookup() {
        let tree = tree_of(&["halligalli", "dingens", "zeug"]);
        for max_dist in [0, 1, 5] {
            let result = tree.lookup(&"halligalli".to_string(), max_dist);
            assert_eq!(result.len(), 1);
            assert_eq!(result[0].value(), "halligalli");
            assert_eq!(result[0].distance(), 0);
        }
    }

    #[test]
    fn test_distinct_excludes_query() {
        let tree = tree_of(&["dingens", "dingensx"]);
        let result = tree.lookup_distinct(&"dingens".to_string(), 2);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value(), "dingensx");
        assert_eq!(result[0].distance(), 1);
    }

    #[test]
    fn test_best_only_filtering() {
        let tree = tree_of(&["ab1de", "ab2de", "ab23de", "ab44de"]);
        let result = tree.lookup(&"abcde".to_string(), 2);
        assert_eq!(values(&result), vec!["ab1de", "ab2de"]);
        assert!(result.iter().all(|e| e.distance() == 1));
    }

    #[test]
    fn test_idempotent_insertion() {
        let mut tree = tree_of(&["alpha", "beta", "gamma"]);
        let before = tree.lookup(&"beta".to_string(), 2);
        tree.add("beta".to_string());
        tree.add("alpha".to_string());
        let after = tree.lookup(&"beta".to_string(), 2);
        assert_eq!(before, after);
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn test_nothing_within_radius() {
        let tree = tree_of(&["completely", "different"]);
        assert!(tree.lookup(&"xyz".to_string(), 1).is_empty());
    }
}
