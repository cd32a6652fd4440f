//! Exhaustiveness analysis over single-rooted type hierarchies

use crate::hierarchy::{Hierarchy, NodeId};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};

/// Tracks which nodes of a type hierarchy are handled by the cases of a
/// match-like construct.
///
/// Callers feed every match arm to [`include`] in source order, then ask
/// [`unmatched_types`] once for the minimal set of unhandled nodes to
/// report. A handled supertype implicitly handles its whole subtree, and a
/// node whose direct children are all handled counts as handled itself.
///
/// One checker per analysis session; the checker borrows its hierarchy for
/// its whole lifetime, which pins a session to a single hierarchy. The
/// hierarchy must be fully built (sealed, for [`TypeHierarchy`]) before
/// the first call; coverage recorded for an ancestor goes stale if its
/// children set grows afterwards.
///
/// [`include`]: CoverageChecker::include
/// [`unmatched_types`]: CoverageChecker::unmatched_types
/// [`TypeHierarchy`]: crate::hierarchy::TypeHierarchy
pub struct CoverageChecker<'h, H: Hierarchy> {
    hierarchy: &'h H,
    matched: HashSet<NodeId>,
}

impl<'h, H: Hierarchy> CoverageChecker<'h, H> {
    pub fn new(hierarchy: &'h H) -> Self {
        Self {
            hierarchy,
            matched: HashSet::new(),
        }
    }

    /// Record that `node` is handled, along with its entire subtree.
    ///
    /// Returns true when `node` was already covered (a redundant arm),
    /// false when this call newly covered it.
    pub fn include(&mut self, node: NodeId) -> bool {
        if self.matched.contains(&node) {
            trace!("{} already covered", node);
            return true;
        }
        debug!("including {} and its subtree", node);

        self.matched.insert(node);
        let mut queue = VecDeque::new();
        queue.push_back(node);
        while let Some(current) = queue.pop_front() {
            for &child in self.hierarchy.children(current) {
                if self.matched.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        // Fold fully covered ancestors upward, nearest first. An ancestor
        // already in the set was settled by an earlier call; one with an
        // uncovered child blocks everything above it.
        let chain = self.hierarchy.ancestry(node);
        for &ancestor in chain.iter().rev().skip(1) {
            if self.matched.contains(&ancestor) {
                break;
            }
            let children = self.hierarchy.children(ancestor);
            if !children.iter().all(|child| self.matched.contains(child)) {
                break;
            }
            trace!("{} covered through its children", ancestor);
            self.matched.insert(ancestor);
        }

        false
    }

    /// Whether `node` is currently considered handled
    pub fn is_covered(&self, node: NodeId) -> bool {
        self.matched.contains(&node)
    }

    /// Minimal set of unhandled nodes in the subtree rooted at `node`.
    ///
    /// A partially covered node expands into its children so the report
    /// names exactly what is missing; a node with no coverage anywhere
    /// below collapses to itself, keeping reports small for untouched
    /// branches. Output order follows the hierarchy's child order.
    pub fn unmatched_types(&self, node: NodeId) -> Vec<NodeId> {
        if self.matched.contains(&node) {
            return Vec::new();
        }
        let children = self.hierarchy.children(node);
        if children.iter().any(|child| self.matched.contains(child)) {
            children
                .iter()
                .flat_map(|&child| self.unmatched_types(child))
                .collect()
        } else {
            vec![node]
        }
    }
}
