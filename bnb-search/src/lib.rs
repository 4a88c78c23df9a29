//! Problem-agnostic branch-and-bound search for integer programs.
//!
//! The engine repeatedly bounds a node relaxation through a
//! [`RelaxationOracle`], prunes against the incumbent, branches on a
//! fractional variable and keeps the best integer solution found under a
//! wall-clock budget. Constraints never reach the search: a problem is an
//! ordered list of variables ([`ProblemDefinition`]) plus an oracle that
//! solves its continuous relaxation over a [`Domain`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use bnb_search::{
//!     solve, BnbResult, Domain, IntegerProgram, RelaxationOutcome, SearchSettings, SearchStatus,
//! };
//!
//! // min -x0 - x1 over binaries: the relaxation optimum is the upper corner
//! let prob = IntegerProgram::binary(2)?;
//! let mut oracle = |domain: &Domain, _: Option<Duration>| -> BnbResult<RelaxationOutcome> {
//!     let x: Vec<f64> = domain.iter().map(|(_, iv)| iv.upper).collect();
//!     Ok(RelaxationOutcome::optimal(-x.iter().sum::<f64>(), x))
//! };
//!
//! let result = solve(&prob, &mut oracle, &SearchSettings::default())?;
//! assert_eq!(result.status, SearchStatus::Optimal);
//! assert_eq!(result.best_objective, Some(-2.0));
//! # Ok::<(), bnb_search::SearchError>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod oracle;
pub mod search;
pub mod settings;

pub use error::{BnbResult, SearchError};
pub use model::{
    compute_gap, Domain, IncumbentTracker, IntegerProgram, Interval, ProblemDefinition,
    SearchResult, SearchStatus, VarKind, VariableSpec,
};
pub use oracle::{Relaxation, RelaxationOracle, RelaxationOutcome};
pub use search::{BranchAndBound, SearchStats};
pub use settings::{BranchingRule, NodeSelection, SearchSettings};

/// Solve an integer program by branch and bound.
///
/// Each call owns a fresh controller: no state is shared between invocations.
pub fn solve<P, O>(
    problem: &P,
    oracle: &mut O,
    settings: &SearchSettings,
) -> BnbResult<SearchResult>
where
    P: ProblemDefinition + ?Sized,
    O: RelaxationOracle + ?Sized,
{
    let mut tree = BranchAndBound::new(settings.clone());
    tree.run(problem, oracle)
}
