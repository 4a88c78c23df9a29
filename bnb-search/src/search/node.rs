//! Search node representation.

use crate::model::{Domain, IncumbentTracker, Interval};
use crate::oracle::Relaxation;

/// A bound change from branching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundChange {
    /// Variable index.
    pub var: usize,

    /// New lower bound.
    pub new_lb: f64,

    /// New upper bound.
    pub new_ub: f64,
}

impl BoundChange {
    /// Create a "down" branch: x <= floor(value).
    pub fn down_branch(var: usize, old: Interval, value: f64) -> Self {
        Self {
            var,
            new_lb: old.lower,
            new_ub: value.floor(),
        }
    }

    /// Create an "up" branch: x >= ceil(value).
    pub fn up_branch(var: usize, old: Interval, value: f64) -> Self {
        Self {
            var,
            new_lb: value.ceil(),
            new_ub: old.upper,
        }
    }

    /// Interval of the variable after the change.
    pub fn new_interval(&self) -> Interval {
        Interval::new(self.new_lb, self.new_ub)
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Unique node identifier, increasing in creation order.
    pub id: u64,

    /// Parent node ID (None for root).
    pub parent_id: Option<u64>,

    /// Depth in the tree (0 for root).
    pub depth: usize,

    /// Variable bounds at this node.
    pub domain: Domain,

    /// Bound change from parent to this node.
    pub branched: Option<BoundChange>,

    /// Parent's relaxation value, inherited at creation.
    /// Lower bound on this subtree until the node is bounded itself.
    pub bound_estimate: f64,

    /// Relaxation at this node, once evaluated.
    pub relaxation: Option<Relaxation>,
}

impl SearchNode {
    /// Create the root node.
    pub fn root(domain: Domain) -> Self {
        Self {
            id: 0,
            parent_id: None,
            depth: 0,
            domain,
            branched: None,
            bound_estimate: f64::NEG_INFINITY,
            relaxation: None,
        }
    }

    /// Create a child node from a bound change.
    pub fn child(&self, id: u64, bound_change: BoundChange) -> Self {
        Self {
            id,
            parent_id: Some(self.id),
            depth: self.depth + 1,
            domain: self
                .domain
                .with_interval(bound_change.var, bound_change.new_interval()),
            branched: Some(bound_change),
            bound_estimate: self.bound(),
            relaxation: None,
        }
    }

    /// Check if this is the root node.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Best known lower bound on this subtree.
    ///
    /// The node's own relaxation value once evaluated, the inherited estimate before.
    pub fn bound(&self) -> f64 {
        self.relaxation
            .as_ref()
            .map_or(self.bound_estimate, |r| r.objective)
    }

    /// Check if this node can be pruned by the incumbent.
    ///
    /// A node can be pruned if its bound does not strictly improve on the incumbent.
    pub fn can_prune(&self, incumbent: &IncumbentTracker) -> bool {
        incumbent.has_incumbent() && !incumbent.improves(self.bound())
    }
}
