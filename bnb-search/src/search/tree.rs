//! Branch-and-bound tree controller.

use std::time::{Duration, Instant};

use super::{BranchDecision, BranchingSelector, NodeQueue, SearchNode};
use crate::error::{BnbResult, SearchError};
use crate::model::{
    round_integers, validate_problem, Domain, IncumbentTracker, ProblemDefinition, SearchResult,
    SearchStatus,
};
use crate::oracle::{check_relaxation, RelaxationOracle, RelaxationOutcome};
use crate::settings::SearchSettings;

/// Disposition of one processed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// Discarded: bound cannot improve on the incumbent.
    Pruned,

    /// Discarded: empty domain or infeasible relaxation.
    Infeasible,

    /// Relaxation solution is integer-feasible; `improved` if it became the incumbent.
    Integral {
        /// Whether the incumbent was replaced.
        improved: bool,
    },

    /// Split into two children.
    Branched,

    /// Oracle stopped on its time budget; the node stays unresolved.
    Interrupted,
}

/// Counters and timing for one search invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    /// Nodes taken off the queue.
    pub nodes_explored: u64,
    /// Nodes discarded by bound or infeasibility, open ones included.
    pub nodes_pruned: u64,
    /// Nodes split into two children.
    pub nodes_branched: u64,
    /// Subset of `nodes_pruned` discarded as infeasible.
    pub nodes_infeasible: u64,
    /// Incumbent replacements.
    pub incumbent_updates: u64,
    /// Deepest node explored.
    pub max_depth: usize,
    /// Root relaxation value, recorded once.
    pub root_bound: Option<f64>,
    /// Search start.
    pub start: Option<Instant>,
    /// `start + time_limit`, if representable.
    pub deadline: Option<Instant>,
    /// Set once by [`BranchAndBound::stop`].
    pub finished: Option<Instant>,
}

impl SearchStats {
    fn new() -> Self {
        Self {
            nodes_explored: 0,
            nodes_pruned: 0,
            nodes_branched: 0,
            nodes_infeasible: 0,
            incumbent_updates: 0,
            max_depth: 0,
            root_bound: None,
            start: None,
            deadline: None,
            finished: None,
        }
    }

    /// Record the root bound; later calls are ignored.
    pub fn record_root_bound(&mut self, bound: f64) {
        if self.root_bound.is_none() {
            self.root_bound = Some(bound);
        }
    }

    /// Wall-clock time since start, frozen once the search finished.
    pub fn elapsed(&self) -> Duration {
        match (self.start, self.finished) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }
}

/// Branch-and-bound tree controller.
///
/// Owns the node queue, incumbent and statistics of one search.
pub struct BranchAndBound {
    /// Node queue.
    queue: NodeQueue,

    /// Branching variable selector.
    branching: BranchingSelector,

    /// Incumbent solution tracker.
    pub incumbent: IncumbentTracker,

    /// Next node ID to assign.
    next_node_id: u64,

    /// Run statistics.
    stats: SearchStats,

    /// Bound of the last node taken off the queue.
    last_bound: f64,

    /// Bound of a node whose oracle call was interrupted.
    unresolved_bound: Option<f64>,

    /// Settings.
    settings: SearchSettings,
}

impl BranchAndBound {
    /// Create a new controller.
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            queue: NodeQueue::new(settings.node_selection),
            branching: BranchingSelector::new(settings.branching_rule),
            incumbent: IncumbentTracker::new(settings.improvement_tol),
            next_node_id: 1, // 0 reserved for root
            stats: SearchStats::new(),
            last_bound: f64::NEG_INFINITY,
            unresolved_bound: None,
            settings,
        }
    }

    /// Reset all run state, push the root node and start the clock.
    ///
    /// A deadline past the representable range of `Instant` means no deadline.
    pub fn initialize(&mut self, root_domain: Domain) {
        self.queue = NodeQueue::new(self.settings.node_selection);
        self.branching = BranchingSelector::new(self.settings.branching_rule);
        self.incumbent = IncumbentTracker::new(self.settings.improvement_tol);
        self.next_node_id = 1;
        self.stats = SearchStats::new();
        self.last_bound = f64::NEG_INFINITY;
        self.unresolved_bound = None;

        let start = Instant::now();
        self.stats.start = Some(start);
        self.stats.deadline = self
            .settings
            .time_limit
            .and_then(|limit| start.checked_add(limit));

        self.queue.push(SearchNode::root(root_domain));
    }

    /// Run the search to termination.
    pub fn run<P, O>(&mut self, problem: &P, oracle: &mut O) -> BnbResult<SearchResult>
    where
        P: ProblemDefinition + ?Sized,
        O: RelaxationOracle + ?Sized,
    {
        let root_domain = validate_problem(problem)?;
        self.initialize(root_domain);

        let status = loop {
            let Some(node) = self.next_node() else {
                break self.exhausted_status();
            };

            if self.process_node(node, problem, oracle)? == NodeOutcome::Interrupted {
                log::warn!("Relaxation interrupted at node {}", self.stats.nodes_explored);
                break SearchStatus::TimeLimit;
            }

            self.log_progress();

            if let Some(status) = self.check_termination() {
                break status;
            }
        };

        self.stop();
        let result = self.finalize(status);
        if self.settings.verbose {
            log::info!("{}", result);
        }
        Ok(result)
    }

    /// Get the next node to process.
    pub fn next_node(&mut self) -> Option<SearchNode> {
        let node = self.queue.pop()?;
        self.stats.nodes_explored += 1;
        self.stats.max_depth = self.stats.max_depth.max(node.depth);
        self.last_bound = node.bound();
        Some(node)
    }

    /// Bound a node and decide its fate.
    pub fn process_node<P, O>(
        &mut self,
        mut node: SearchNode,
        problem: &P,
        oracle: &mut O,
    ) -> BnbResult<NodeOutcome>
    where
        P: ProblemDefinition + ?Sized,
        O: RelaxationOracle + ?Sized,
    {
        // Inherited bound already dominated by an incumbent found after the parent
        if node.can_prune(&self.incumbent) {
            return Ok(self.node_pruned(&node));
        }

        if node.domain.is_malformed() {
            return Ok(self.node_infeasible(&node));
        }

        let relaxation = match oracle.solve(&node.domain, self.remaining_time())? {
            RelaxationOutcome::Optimal(relaxation) => relaxation,
            RelaxationOutcome::Infeasible => return Ok(self.node_infeasible(&node)),
            RelaxationOutcome::Interrupted => {
                self.unresolved_bound = Some(node.bound());
                return Ok(NodeOutcome::Interrupted);
            }
        };
        check_relaxation(&relaxation, &node.domain, self.settings.feasibility_tol)?;

        if node.is_root() {
            self.stats.record_root_bound(relaxation.objective);
        }
        let objective = relaxation.objective;
        self.last_bound = objective;
        node.relaxation = Some(relaxation);

        if node.can_prune(&self.incumbent) {
            return Ok(self.node_pruned(&node));
        }

        let values = node.relaxation.as_ref().map(|r| r.values.as_slice()).unwrap_or_default();

        if problem.is_integer_feasible(values, self.settings.feasibility_tol) {
            let assignment = round_integers(problem, values);
            let improved = self.update_incumbent(&assignment, objective);
            log::debug!(
                "Node {} integral: obj={:.6e} improved={}",
                node.id,
                objective,
                improved
            );
            return Ok(NodeOutcome::Integral { improved });
        }

        let decision = self
            .branching
            .select(values, problem, &node.domain, self.settings.feasibility_tol)
            .ok_or_else(|| {
                SearchError::Internal(format!(
                    "node {} rejected as non-integral but has no fractional variable",
                    node.id
                ))
            })?;

        log::debug!(
            "Node {} branched on x{} = {:.6} (bound {:.6e})",
            node.id,
            decision.var,
            decision.value,
            objective
        );
        let (down, up) = self.branch(&node, decision);
        // Down child is explored first under depth-first order
        self.enqueue(up);
        self.enqueue(down);
        self.stats.nodes_branched += 1;

        Ok(NodeOutcome::Branched)
    }

    fn node_pruned(&mut self, node: &SearchNode) -> NodeOutcome {
        log::debug!("Node {} pruned by bound {:.6e}", node.id, node.bound());
        self.stats.nodes_pruned += 1;
        NodeOutcome::Pruned
    }

    fn node_infeasible(&mut self, node: &SearchNode) -> NodeOutcome {
        log::debug!("Node {} infeasible", node.id);
        self.stats.nodes_pruned += 1;
        self.stats.nodes_infeasible += 1;
        NodeOutcome::Infeasible
    }

    /// Create child nodes from a branching decision.
    ///
    /// Returns the two child nodes (down, up).
    pub fn branch(
        &mut self,
        parent: &SearchNode,
        decision: BranchDecision,
    ) -> (SearchNode, SearchNode) {
        let down_id = self.next_node_id;
        let up_id = self.next_node_id + 1;
        self.next_node_id += 2;

        let down_child = parent.child(down_id, decision.down_branch);
        let up_child = parent.child(up_id, decision.up_branch);

        (down_child, up_child)
    }

    /// Add a node to the queue.
    pub fn enqueue(&mut self, node: SearchNode) {
        self.queue.push(node);
    }

    /// Update incumbent with a new solution.
    ///
    /// Returns true if incumbent was improved.
    pub fn update_incumbent(&mut self, x: &[f64], obj: f64) -> bool {
        let improved = self.incumbent.consider(obj, x);

        if improved {
            self.stats.incumbent_updates += 1;

            // Prune nodes dominated by new incumbent
            let pruned = self.queue.prune_by_bound(&self.incumbent);
            self.stats.nodes_pruned += pruned as u64;

            if self.settings.verbose {
                log::info!("New incumbent: obj={:.6e}, pruned {} nodes", obj, pruned);
            }
        }

        improved
    }

    /// Time left before the deadline.
    pub fn remaining_time(&self) -> Option<Duration> {
        self.stats
            .deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Check if time limit is exceeded.
    pub fn time_limit_exceeded(&self) -> bool {
        self.stats
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn exhausted_status(&self) -> SearchStatus {
        if self.incumbent.has_incumbent() {
            SearchStatus::Optimal
        } else {
            SearchStatus::Infeasible
        }
    }

    /// Check termination conditions.
    ///
    /// Returns Some(status) if we should terminate, None otherwise.
    /// Does not modify any state.
    pub fn check_termination(&self) -> Option<SearchStatus> {
        if self.queue.is_empty() {
            return Some(self.exhausted_status());
        }

        if self.time_limit_exceeded() {
            return Some(SearchStatus::TimeLimit);
        }

        if self.stats.nodes_explored >= self.settings.max_nodes {
            return Some(SearchStatus::NodeLimit);
        }

        None
    }

    /// Freeze the clock. Later calls keep the first stop time.
    pub fn stop(&mut self) {
        if self.stats.finished.is_none() {
            self.stats.finished = Some(Instant::now());
        }
    }

    /// Best proven lower bound.
    ///
    /// Minimum over open and unresolved nodes, falling back to the last node
    /// taken off the queue, and never above the incumbent.
    pub fn best_bound(&self) -> f64 {
        let open = match self.unresolved_bound {
            Some(bound) => bound.min(self.queue.best_bound()),
            None if self.queue.is_empty() => self.last_bound,
            None => self.queue.best_bound(),
        };
        open.min(self.incumbent.objective)
    }

    /// Get the current optimality gap against the best bound.
    pub fn gap(&self) -> f64 {
        self.incumbent.gap(self.best_bound())
    }

    /// Build the result for a terminal status.
    pub fn finalize(&self, status: SearchStatus) -> SearchResult {
        let best_bound = match status {
            SearchStatus::Optimal => self.incumbent.objective,
            SearchStatus::Infeasible => f64::INFINITY,
            SearchStatus::TimeLimit | SearchStatus::NodeLimit => self.best_bound(),
        };
        let has_incumbent = self.incumbent.has_incumbent();

        SearchResult {
            status,
            best_objective: has_incumbent.then_some(self.incumbent.objective),
            best_assignment: self.incumbent.assignment.clone(),
            root_bound: self.stats.root_bound,
            best_bound,
            nodes_explored: self.stats.nodes_explored,
            nodes_pruned: self.stats.nodes_pruned,
            nodes_branched: self.stats.nodes_branched,
            nodes_infeasible: self.stats.nodes_infeasible,
            max_depth: self.stats.max_depth,
            incumbent_updates: self.stats.incumbent_updates,
            elapsed: self.stats.elapsed(),
        }
    }

    /// Log progress (if verbose).
    pub fn log_progress(&self) {
        if !self.settings.verbose {
            return;
        }

        if self.stats.nodes_explored % self.settings.log_freq.max(1) != 0 {
            return;
        }

        log::info!(
            "Nodes: {} ({} open, {} infeasible) | Depth: {} | Bound: {:.6e} | Incumbent: {:.6e} \
             | Gap: {:.2}% | Time: {:.1}s",
            self.stats.nodes_explored,
            self.queue.len(),
            self.stats.nodes_infeasible,
            self.stats.max_depth,
            self.best_bound(),
            self.incumbent.objective,
            self.gap() * 100.0,
            self.stats.elapsed().as_secs_f64(),
        );
    }

    /// Get statistics for display.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Number of open nodes.
    pub fn open_nodes(&self) -> usize {
        self.queue.len()
    }
}
