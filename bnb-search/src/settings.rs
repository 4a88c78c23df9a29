//! Configuration settings for the search.

use std::time::Duration;

/// Branching variable selection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchingRule {
    /// Select the variable farthest from its nearest integer.
    ///
    /// Ties go to the smallest variable index.
    #[default]
    MostFractional,

    /// Select the fractional variable with the smallest index.
    FirstFractional,
}

/// Node selection strategy for the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeSelection {
    /// Always select the open node with the best (lowest) bound.
    #[default]
    BestBound,

    /// Depth-first search (LIFO).
    DepthFirst,
}

/// Search settings.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    // === Termination criteria ===
    /// Wall-clock budget (None = run until the frontier is exhausted).
    pub time_limit: Option<Duration>,

    /// Maximum number of nodes to explore.
    pub max_nodes: u64,

    // === Tolerances ===
    /// Integer feasibility tolerance.
    /// A value is integral if |x - round(x)| <= feasibility_tol.
    pub feasibility_tol: f64,

    /// Improvement tolerance, relative to max(1, |incumbent|).
    /// Used both for incumbent replacement and prune-by-bound.
    pub improvement_tol: f64,

    // === Search strategy ===
    /// Branching variable selection rule.
    pub branching_rule: BranchingRule,

    /// Node selection strategy.
    pub node_selection: NodeSelection,

    // === Output ===
    /// Print progress information.
    pub verbose: bool,

    /// Log frequency (print every N nodes).
    pub log_freq: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            time_limit: None,
            max_nodes: u64::MAX,
            feasibility_tol: 1e-6,
            improvement_tol: 1e-6,
            branching_rule: BranchingRule::default(),
            node_selection: NodeSelection::default(),
            verbose: false,
            log_freq: 100,
        }
    }
}

impl SearchSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            log_freq: 1,
            ..Self::default()
        }
    }

    /// Set time limit in seconds.
    ///
    /// Negative or NaN values are a zero budget; infinite values remove the limit.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Duration::try_from_secs_f64(seconds.max(0.0)).ok();
        self
    }

    /// Set maximum nodes.
    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Set node selection strategy.
    pub fn with_node_selection(mut self, node_selection: NodeSelection) -> Self {
        self.node_selection = node_selection;
        self
    }

    /// Set branching rule.
    pub fn with_branching_rule(mut self, rule: BranchingRule) -> Self {
        self.branching_rule = rule;
        self
    }

    /// Set both integrality and improvement tolerances.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.feasibility_tol = tol;
        self.improvement_tol = tol;
        self
    }
}
