//! Search result types.

use std::fmt;
use std::time::Duration;

/// Terminal status of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Frontier exhausted with an incumbent: optimality proven.
    Optimal,

    /// Frontier exhausted without ever finding an integer point: infeasibility proven.
    Infeasible,

    /// Time limit reached, best solution (if any) returned.
    TimeLimit,

    /// Node limit reached, best solution (if any) returned.
    NodeLimit,
}

impl SearchStatus {
    /// Returns true if the status is a proof (optimality or infeasibility).
    pub fn is_proven(&self) -> bool {
        matches!(self, SearchStatus::Optimal | SearchStatus::Infeasible)
    }

    /// Returns true if the search stopped on a limit.
    pub fn is_limit(&self) -> bool {
        matches!(self, SearchStatus::TimeLimit | SearchStatus::NodeLimit)
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchStatus::Optimal => "Optimal",
            SearchStatus::Infeasible => "Infeasible",
            SearchStatus::TimeLimit => "TimeLimit",
            SearchStatus::NodeLimit => "NodeLimit",
        };
        f.write_str(s)
    }
}

/// Complete search result with statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Terminal status.
    pub status: SearchStatus,

    /// Objective of the incumbent, if one was found.
    pub best_objective: Option<f64>,

    /// Assignment of the incumbent, if one was found.
    pub best_assignment: Option<Vec<f64>>,

    /// Relaxation value of the root node (the "LP relaxation" figure).
    pub root_bound: Option<f64>,

    /// Best proven lower bound at termination.
    pub best_bound: f64,

    /// Nodes popped from the frontier.
    pub nodes_explored: u64,

    /// Nodes discarded by bound or infeasibility.
    pub nodes_pruned: u64,

    /// Nodes split into two children.
    pub nodes_branched: u64,

    /// Nodes discarded because their domain or relaxation was infeasible.
    pub nodes_infeasible: u64,

    /// Deepest node explored (root is depth 0).
    pub max_depth: usize,

    /// Number of times the incumbent was replaced.
    pub incumbent_updates: u64,

    /// Wall-clock time of the search.
    pub elapsed: Duration,
}

impl SearchResult {
    /// Elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Relative gap between best objective and root bound.
    ///
    /// Infinite when either is absent.
    pub fn gap(&self) -> f64 {
        match (self.best_objective, self.root_bound) {
            (Some(obj), Some(bound)) => compute_gap(obj, bound),
            _ => f64::INFINITY,
        }
    }

    /// Relative gap between best objective and the final best bound.
    pub fn final_gap(&self) -> f64 {
        match self.best_objective {
            Some(obj) => compute_gap(obj, self.best_bound),
            None => f64::INFINITY,
        }
    }

    /// Root gap in percent, `"inf"` when unbounded.
    pub fn gap_percent(&self) -> String {
        format_percent(self.gap())
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status={} lp_relaxation={} best_objective={} nodes={} gap={}% time={:.3}s",
            self.status,
            format_value(self.root_bound),
            format_value(self.best_objective),
            self.nodes_explored,
            self.gap_percent(),
            self.elapsed_seconds(),
        )
    }
}

/// Compute relative gap.
pub fn compute_gap(primal: f64, dual: f64) -> f64 {
    if primal.is_infinite() || dual.is_infinite() {
        return f64::INFINITY;
    }
    let denom = primal.abs().max(1e-10);
    (primal - dual).abs() / denom
}

fn format_percent(gap: f64) -> String {
    if gap.is_finite() {
        format!("{:.4}", gap * 100.0)
    } else {
        "inf".to_string()
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.6}", v),
        _ => "inf".to_string(),
    }
}

/// Tracks the best known integer-feasible solution (incumbent).
#[derive(Debug, Clone)]
pub struct IncumbentTracker {
    /// Current best assignment (if any).
    pub assignment: Option<Vec<f64>>,

    /// Objective value of incumbent.
    /// Initialized to +inf for minimization.
    pub objective: f64,

    /// Number of times incumbent was updated.
    pub update_count: u64,

    /// Improvement tolerance, relative to max(1, |objective|).
    tol: f64,
}

impl Default for IncumbentTracker {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl IncumbentTracker {
    /// Create a new incumbent tracker.
    pub fn new(tol: f64) -> Self {
        Self {
            assignment: None,
            objective: f64::INFINITY,
            update_count: 0,
            tol,
        }
    }

    /// Check if we have an incumbent.
    pub fn has_incumbent(&self) -> bool {
        self.assignment.is_some()
    }

    /// True if `value` is strictly better than the incumbent beyond tolerance.
    ///
    /// Every finite value improves on an empty tracker.
    pub fn improves(&self, value: f64) -> bool {
        if !self.objective.is_finite() {
            return value < self.objective;
        }
        value < self.objective - self.tol * self.objective.abs().max(1.0)
    }

    /// Offer a solution; returns true if it became the incumbent.
    ///
    /// Ties keep the first solution found.
    pub fn consider(&mut self, objective: f64, assignment: &[f64]) -> bool {
        if !self.improves(objective) {
            return false;
        }
        self.assignment = Some(assignment.to_vec());
        self.objective = objective;
        self.update_count += 1;
        true
    }

    /// Compute relative gap to a dual bound.
    pub fn gap(&self, dual_bound: f64) -> f64 {
        compute_gap(self.objective, dual_bound)
    }
}
