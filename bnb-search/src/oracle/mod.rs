//! Relaxation oracle interface.
//!
//! The oracle solves the continuous relaxation of the problem restricted to a
//! node's domain. It is the only place constraints are evaluated; the search
//! itself only sees bounds and variable values.

use std::time::Duration;

use crate::error::{BnbResult, SearchError};
use crate::model::Domain;

/// Optimal solution of a relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    /// Optimal relaxation objective (a lower bound for the node's subtree).
    pub objective: f64,

    /// Variable values at the optimum, one per variable. May be fractional.
    pub values: Vec<f64>,
}

impl Relaxation {
    /// Create a relaxation result.
    pub fn new(objective: f64, values: Vec<f64>) -> Self {
        Self { objective, values }
    }
}

/// Outcome of one oracle call.
#[derive(Debug, Clone, PartialEq)]
pub enum RelaxationOutcome {
    /// Relaxation solved to optimality.
    Optimal(Relaxation),

    /// Relaxation has no feasible point; the node can be discarded.
    Infeasible,

    /// The oracle stopped on its time budget before reaching a verdict.
    Interrupted,
}

impl RelaxationOutcome {
    /// Shorthand for `Optimal(Relaxation::new(objective, values))`.
    pub fn optimal(objective: f64, values: Vec<f64>) -> Self {
        RelaxationOutcome::Optimal(Relaxation::new(objective, values))
    }
}

/// Solver for node relaxations.
///
/// Implementations must be deterministic: identical domains must produce
/// identical outcomes, otherwise node counts are not reproducible.
/// Numerical failures and unbounded relaxations are reported as
/// [`SearchError::Oracle`], never as `Infeasible`.
pub trait RelaxationOracle {
    /// Solve the relaxation over `domain`.
    ///
    /// `time_budget` is the time left before the search deadline; the oracle
    /// should not run much longer than that and may return `Interrupted`.
    fn solve(
        &mut self,
        domain: &Domain,
        time_budget: Option<Duration>,
    ) -> BnbResult<RelaxationOutcome>;
}

impl<F> RelaxationOracle for F
where
    F: FnMut(&Domain, Option<Duration>) -> BnbResult<RelaxationOutcome>,
{
    fn solve(
        &mut self,
        domain: &Domain,
        time_budget: Option<Duration>,
    ) -> BnbResult<RelaxationOutcome> {
        self(domain, time_budget)
    }
}

/// Check that an oracle solution is usable by the search.
///
/// Every value must be finite and lie in its interval of `domain`, up to `tol`.
pub(crate) fn check_relaxation(
    relaxation: &Relaxation,
    domain: &Domain,
    tol: f64,
) -> BnbResult<()> {
    if relaxation.values.len() != domain.len() {
        return Err(SearchError::Oracle(format!(
            "relaxation returned {} values for {} variables",
            relaxation.values.len(),
            domain.len()
        )));
    }
    if !relaxation.objective.is_finite() {
        return Err(SearchError::Oracle(format!(
            "relaxation objective is not finite: {}",
            relaxation.objective
        )));
    }
    for ((var, interval), &value) in domain.iter().zip(&relaxation.values) {
        if !value.is_finite() {
            return Err(SearchError::Oracle(format!(
                "relaxation value of variable {} is not finite",
                var
            )));
        }
        if !interval.contains(value, tol) {
            return Err(SearchError::Oracle(format!(
                "relaxation value x{} = {} outside [{}, {}]",
                var, value, interval.lower, interval.upper
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Interval;

    #[test]
    fn test_closure_oracle() {
        let mut calls = 0;
        let mut oracle = |domain: &Domain, _: Option<Duration>| -> BnbResult<RelaxationOutcome> {
            calls += 1;
            let values: Vec<f64> = domain.iter().map(|(_, iv)| iv.upper).collect();
            Ok(RelaxationOutcome::optimal(-values.iter().sum::<f64>(), values))
        };

        let domain = Domain::new(vec![Interval::binary(); 2]);
        let outcome = oracle.solve(&domain, None).unwrap();
        assert_eq!(outcome, RelaxationOutcome::optimal(-2.0, vec![1.0, 1.0]));
        drop(oracle);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_check_relaxation() {
        let domain = Domain::new(vec![Interval::binary(); 2]);
        assert!(check_relaxation(&Relaxation::new(1.0, vec![0.0, 1.0]), &domain, 1e-6).is_ok());

        let err = check_relaxation(&Relaxation::new(1.0, vec![0.0]), &domain, 1e-6).unwrap_err();
        assert!(matches!(err, SearchError::Oracle(_)));

        let single = Domain::new(vec![Interval::new(0.0, 5.0)]);
        let unbounded = Relaxation::new(f64::NEG_INFINITY, vec![0.0]);
        assert!(check_relaxation(&unbounded, &single, 1e-6).is_err());
        assert!(check_relaxation(&Relaxation::new(0.0, vec![f64::NAN]), &single, 1e-6).is_err());
    }

    #[test]
    fn test_check_relaxation_outside_domain() {
        let domain = Domain::new(vec![Interval::binary(), Interval::new(2.0, 3.0)]);

        // Within tolerance of the bounds
        let close = Relaxation::new(0.0, vec![1.0 + 1e-7, 2.0 - 1e-7]);
        assert!(check_relaxation(&close, &domain, 1e-6).is_ok());

        let above = Relaxation::new(0.0, vec![1.0 + 1e-5, 2.5]);
        let err = check_relaxation(&above, &domain, 1e-6).unwrap_err();
        assert!(matches!(err, SearchError::Oracle(_)));

        let below = Relaxation::new(0.0, vec![0.5, 1.5]);
        assert!(check_relaxation(&below, &domain, 1e-6).is_err());
    }
}
