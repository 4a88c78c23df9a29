//! Open-node frontier for tree exploration.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::SearchNode;
use crate::model::IncumbentTracker;
use crate::settings::NodeSelection;

/// Entry in the best-bound heap.
struct QueuedNode {
    node: SearchNode,
    bound: f64,
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: lowest bound first, then lowest id
        other
            .bound
            .total_cmp(&self.bound)
            .then_with(|| other.node.id.cmp(&self.node.id))
    }
}

enum Frontier {
    Heap(BinaryHeap<QueuedNode>),
    Stack(Vec<SearchNode>),
}

/// Open nodes awaiting exploration.
pub struct NodeQueue {
    /// Node storage; the variant encodes the selection strategy.
    frontier: Frontier,
}

impl NodeQueue {
    /// Create a new node queue with the given strategy.
    pub fn new(strategy: NodeSelection) -> Self {
        let frontier = match strategy {
            NodeSelection::BestBound => Frontier::Heap(BinaryHeap::new()),
            NodeSelection::DepthFirst => Frontier::Stack(Vec::new()),
        };
        Self { frontier }
    }

    /// Add a node to the queue.
    pub fn push(&mut self, node: SearchNode) {
        match &mut self.frontier {
            Frontier::Heap(heap) => {
                let bound = node.bound();
                heap.push(QueuedNode { node, bound });
            }
            Frontier::Stack(stack) => stack.push(node),
        }
    }

    /// Get the next node to process.
    pub fn pop(&mut self) -> Option<SearchNode> {
        match &mut self.frontier {
            Frontier::Heap(heap) => heap.pop().map(|q| q.node),
            Frontier::Stack(stack) => stack.pop(),
        }
    }

    /// Get the best (lowest) bound across all open nodes.
    ///
    /// +inf when the queue is empty.
    pub fn best_bound(&self) -> f64 {
        match &self.frontier {
            Frontier::Heap(heap) => heap.peek().map_or(f64::INFINITY, |q| q.bound),
            Frontier::Stack(stack) => stack
                .iter()
                .map(SearchNode::bound)
                .fold(f64::INFINITY, f64::min),
        }
    }

    /// Drop nodes that cannot improve on the incumbent.
    ///
    /// Returns the number of pruned nodes.
    pub fn prune_by_bound(&mut self, incumbent: &IncumbentTracker) -> usize {
        let before = self.len();
        match &mut self.frontier {
            Frontier::Heap(heap) => heap.retain(|q| !q.node.can_prune(incumbent)),
            Frontier::Stack(stack) => stack.retain(|n| !n.can_prune(incumbent)),
        }
        before - self.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of nodes in the queue.
    pub fn len(&self) -> usize {
        match &self.frontier {
            Frontier::Heap(heap) => heap.len(),
            Frontier::Stack(stack) => stack.len(),
        }
    }
}
