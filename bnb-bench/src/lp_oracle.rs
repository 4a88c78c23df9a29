//! LP relaxation oracle backed by the `microlp` simplex solver.

use std::time::Duration;

use bnb_search::{BnbResult, Domain, RelaxationOracle, RelaxationOutcome, SearchError};
use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};

use crate::model::{LinearModel, Sense};

/// Solves the continuous relaxation of a [`LinearModel`] over a node domain.
///
/// The simplex solver has no time limit of its own, so the budget handed
/// down by the search is ignored and every call runs to a verdict.
pub struct LpOracle<'a> {
    model: &'a LinearModel,
    solves: u64,
}

impl<'a> LpOracle<'a> {
    pub fn new(model: &'a LinearModel) -> Self {
        Self { model, solves: 0 }
    }

    /// Number of LPs solved so far.
    pub fn solves(&self) -> u64 {
        self.solves
    }
}

fn comparison(sense: Sense) -> ComparisonOp {
    match sense {
        Sense::Le => ComparisonOp::Le,
        Sense::Ge => ComparisonOp::Ge,
        Sense::Eq => ComparisonOp::Eq,
    }
}

impl RelaxationOracle for LpOracle<'_> {
    fn solve(
        &mut self,
        domain: &Domain,
        _time_budget: Option<Duration>,
    ) -> BnbResult<RelaxationOutcome> {
        self.solves += 1;

        let mut lp = Problem::new(OptimizationDirection::Minimize);
        let vars: Vec<Variable> = domain
            .iter()
            .map(|(j, iv)| lp.add_var(self.model.objective[j], (iv.lower, iv.upper)))
            .collect();

        for (i, row) in self.model.rows.outer_iterator().enumerate() {
            let terms: Vec<(Variable, f64)> = row.iter().map(|(j, &val)| (vars[j], val)).collect();
            lp.add_constraint(terms, comparison(self.model.senses[i]), self.model.rhs[i]);
        }

        match lp.solve() {
            Ok(solution) => {
                let values: Vec<f64> = vars.iter().map(|&v| solution[v]).collect();
                Ok(RelaxationOutcome::optimal(solution.objective(), values))
            }
            Err(microlp::Error::Infeasible) => Ok(RelaxationOutcome::Infeasible),
            Err(microlp::Error::Unbounded) => Err(SearchError::Oracle(format!(
                "relaxation of '{}' is unbounded",
                self.model.name
            ))),
            Err(e) => Err(SearchError::Oracle(e.to_string())),
        }
    }
}
