//! Ordered, cancellable lazy retrieval over a [`BkTree`].
//!
//! [`OrderedLookup`] decouples the order in which matches are delivered
//! from the metric structure of the tree: a caller-supplied comparator
//! drives a min-heap frontier of not-yet-inspected nodes, and the metric
//! is only used to test whether a popped value qualifies.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::debug;

use super::bktree::{BkNode, BkTree};
use crate::error::{CorrigoError, Result};
use crate::metric::Metric;

/// Yields the values of a [`BkTree`] within `max_dist` of a query, in the
/// order given by a caller-supplied comparator.
///
/// The comparator is independent of the tree's metric and is never applied
/// to the query value; it only ever compares stored values with each
/// other.
///
/// The ordering guarantee requires that the tree was populated in
/// non-decreasing comparator order, smallest value first. The library
/// cannot verify this; violating it leaves the result order undefined.
///
/// The lookup borrows the tree for its whole lifetime, so the tree cannot
/// be modified while it is alive.
pub struct OrderedLookup<'t, V, M, C>
where
    C: Fn(&V, &V) -> Ordering,
{
    query: V,
    max_dist: u32,
    metric: &'t M,
    order: Rc<C>,
    frontier: BinaryHeap<FrontierEntry<'t, V, C>>,
    prepared: Option<&'t V>,
    expired: bool,
    deadline: Option<Instant>,
}

struct FrontierEntry<'t, V, C> {
    node: &'t BkNode<V>,
    order: Rc<C>,
}

impl<V, C: Fn(&V, &V) -> Ordering> PartialEq for FrontierEntry<'_, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<V, C: Fn(&V, &V) -> Ordering> Eq for FrontierEntry<'_, V, C> {}

impl<V, C: Fn(&V, &V) -> Ordering> PartialOrd for FrontierEntry<'_, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V, C: Fn(&V, &V) -> Ordering> Ord for FrontierEntry<'_, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops its maximum; flip the caller's order so the
        // smallest value surfaces first.
        (self.order)(other.node.value(), self.node.value())
    }
}

impl<'t, V, M, C> OrderedLookup<'t, V, M, C>
where
    M: Metric<V>,
    C: Fn(&V, &V) -> Ordering,
{
    /// Create a lookup over `tree` for the values within `max_dist` of
    /// `query`, yielded in the total order given by `order`.
    pub fn new(tree: &'t BkTree<V, M>, query: V, max_dist: u32, order: C) -> Self {
        let order = Rc::new(order);
        let mut frontier = BinaryHeap::new();
        if let Some(root) = tree.root() {
            frontier.push(FrontierEntry {
                node: root,
                order: Rc::clone(&order),
            });
        }
        OrderedLookup {
            query,
            max_dist,
            metric: tree.metric(),
            order,
            frontier,
            prepared: None,
            expired: false,
            deadline: None,
        }
    }

    /// Limit how much longer this lookup may keep searching.
    ///
    /// The deadline is `millis` milliseconds from now. Once it passes, the
    /// lookup permanently yields no further results; a result already
    /// announced by [`has_next`](OrderedLookup::has_next) is still
    /// delivered. An unexpired deadline may be replaced by calling this
    /// again, but re-arming after the deadline has fired fails with
    /// [`CorrigoError::InvalidState`]; the lookup should be discarded at
    /// that point.
    ///
    /// The deadline is checked once per inspected node, so the overrun is
    /// bounded by one child expansion plus one metric evaluation.
    pub fn set_deadline(&mut self, millis: u64) -> Result<()> {
        if self.expired {
            return Err(CorrigoError::invalid_state(
                "deadline has already fired; the lookup cannot be re-armed",
            ));
        }
        self.deadline = Some(Instant::now() + Duration::from_millis(millis));
        Ok(())
    }

    /// Whether another match is available, preparing it if necessary.
    ///
    /// Once this returns true, the next
    /// [`try_next`](OrderedLookup::try_next) call succeeds even if the
    /// deadline expires in between.
    pub fn has_next(&mut self) -> bool {
        self.prepare();
        self.prepared.is_some()
    }

    /// Return the next match in comparator order.
    ///
    /// Fails with [`CorrigoError::Exhausted`] when no match remains.
    pub fn try_next(&mut self) -> Result<&'t V> {
        self.prepare();
        self.prepared
            .take()
            .ok_or_else(|| CorrigoError::exhausted("ordered lookup has no further matches"))
    }

    fn prepare(&mut self) {
        if self.prepared.is_some() {
            return;
        }
        loop {
            if let Some(deadline) = self.deadline
                && Instant::now() >= deadline
            {
                let uninspected = self.frontier.len();
                self.expired = true;
                self.frontier.clear();
                debug!(
                    "ordered lookup deadline fired, {} nodes left uninspected",
                    uninspected
                );
                return;
            }
            let Some(entry) = self.frontier.pop() else {
                return;
            };
            let node = entry.node;
            for child in node.children() {
                self.frontier.push(FrontierEntry {
                    node: child,
                    order: Rc::clone(&self.order),
                });
            }
            if self.metric.distance(node.value(), &self.query) <= self.max_dist {
                self.prepared = Some(node.value());
                return;
            }
        }
    }
}

impl<'t, V, M, C> Iterator for OrderedLookup<'t, V, M, C>
where
    M: Metric<V>,
    C: Fn(&V, &V) -> Ordering,
{
    type Item = &'t V;

    fn next(&mut self) -> Option<&'t V> {
        self.prepare();
        self.prepared.take()
    }
}
