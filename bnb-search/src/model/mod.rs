//! Problem, domain and solution types.

mod domain;
mod problem;
mod solution;

pub use domain::{Domain, Interval};
pub use problem::{
    fractionality, validate_problem, IntegerProgram, ProblemDefinition, VarKind, VariableSpec,
};
pub use solution::{compute_gap, IncumbentTracker, SearchResult, SearchStatus};

pub(crate) use problem::{fractional_vars, round_integers};
