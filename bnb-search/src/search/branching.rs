//! Branching variable selection.

use super::BoundChange;
use crate::model::{fractional_vars, Domain, ProblemDefinition};
use crate::settings::BranchingRule;

/// A branching decision.
#[derive(Debug, Clone)]
pub struct BranchDecision {
    /// Variable to branch on.
    pub var: usize,

    /// Current (fractional) value.
    pub value: f64,

    /// Bound change for "down" branch (x <= floor(value)).
    pub down_branch: BoundChange,

    /// Bound change for "up" branch (x >= ceil(value)).
    pub up_branch: BoundChange,
}

/// Branching variable selector.
pub struct BranchingSelector {
    /// Branching rule to use.
    rule: BranchingRule,
}

impl BranchingSelector {
    /// Create a new branching selector.
    pub fn new(rule: BranchingRule) -> Self {
        Self { rule }
    }

    /// Select a branching variable.
    ///
    /// Returns None if no integer variable is fractional.
    pub fn select<P: ProblemDefinition + ?Sized>(
        &self,
        x: &[f64],
        prob: &P,
        domain: &Domain,
        tol: f64,
    ) -> Option<BranchDecision> {
        let fractional = fractional_vars(prob, x, tol);

        let (var, value, _) = match self.rule {
            BranchingRule::MostFractional => select_most_fractional(&fractional)?,
            BranchingRule::FirstFractional => fractional.first().copied()?,
        };

        Some(make_decision(var, value, domain))
    }
}

/// Select variable farthest from an integer.
///
/// `fractional` is in index order; ties keep the smallest index.
fn select_most_fractional(fractional: &[(usize, f64, f64)]) -> Option<(usize, f64, f64)> {
    fractional
        .iter()
        .copied()
        .reduce(|best, cand| if cand.2 > best.2 { cand } else { best })
}

/// Create a branch decision for a variable.
fn make_decision(var: usize, value: f64, domain: &Domain) -> BranchDecision {
    let old = domain[var];

    BranchDecision {
        var,
        value,
        down_branch: BoundChange::down_branch(var, old, value),
        up_branch: BoundChange::up_branch(var, old, value),
    }
}
