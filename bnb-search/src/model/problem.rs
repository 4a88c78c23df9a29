//! Problem definition: the variable schema the search works over.

use super::{Domain, Interval};
use crate::error::{BnbResult, SearchError};

/// Variable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// 0/1 variable.
    Binary,

    /// General integer variable.
    Integer,

    /// Continuous variable (never branched on).
    Continuous,
}

impl VarKind {
    /// True for binary and general integer variables.
    pub fn is_integral(&self) -> bool {
        matches!(self, VarKind::Binary | VarKind::Integer)
    }
}

/// Declared type and bounds of one decision variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSpec {
    /// Variable type.
    pub kind: VarKind,

    /// Declared interval.
    pub bounds: Interval,

    /// Optional name for logging.
    pub name: Option<String>,
}

impl VariableSpec {
    /// A 0/1 variable.
    pub fn binary() -> Self {
        Self {
            kind: VarKind::Binary,
            bounds: Interval::binary(),
            name: None,
        }
    }

    /// An integer variable in `[lower, upper]`.
    pub fn integer(lower: f64, upper: f64) -> Self {
        Self {
            kind: VarKind::Integer,
            bounds: Interval::new(lower, upper),
            name: None,
        }
    }

    /// A continuous variable in `[lower, upper]`.
    pub fn continuous(lower: f64, upper: f64) -> Self {
        Self {
            kind: VarKind::Continuous,
            bounds: Interval::new(lower, upper),
            name: None,
        }
    }

    /// Attach a name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declared interval, with binary variables clamped to `[0, 1]`.
    pub fn root_interval(&self) -> Interval {
        match self.kind {
            VarKind::Binary => {
                Interval::new(self.bounds.lower.max(0.0), self.bounds.upper.min(1.0))
            }
            _ => self.bounds,
        }
    }
}

/// Distance from `val` to its nearest integer.
pub fn fractionality(val: f64) -> f64 {
    (val - val.round()).abs()
}

/// Everything the search needs to know about a problem.
///
/// The search never sees constraints; those live behind the
/// [`RelaxationOracle`](crate::RelaxationOracle).
pub trait ProblemDefinition {
    /// Ordered variable descriptors.
    fn variables(&self) -> &[VariableSpec];

    /// Number of variables.
    fn num_vars(&self) -> usize {
        self.variables().len()
    }

    /// Check if a solution is integer-feasible within tolerance.
    ///
    /// Every binary or integer variable must lie within `tol` of an integer.
    fn is_integer_feasible(&self, values: &[f64], tol: f64) -> bool {
        self.variables()
            .iter()
            .zip(values)
            .all(|(spec, &val)| !spec.kind.is_integral() || fractionality(val) <= tol)
    }

    /// Root domain: the declared bounds of every variable.
    fn root_domain(&self) -> Domain {
        Domain::new(self.variables().iter().map(VariableSpec::root_interval).collect())
    }
}

/// Validate a problem definition and build its root domain.
pub fn validate_problem<P: ProblemDefinition + ?Sized>(problem: &P) -> BnbResult<Domain> {
    if problem.num_vars() == 0 {
        return Err(SearchError::InvalidProblem("problem has no variables".to_string()));
    }

    let domain = problem.root_domain();
    for (i, spec) in problem.variables().iter().enumerate() {
        let iv = domain[i];
        if iv.lower.is_nan() || iv.upper.is_nan() {
            return Err(SearchError::InvalidProblem(format!(
                "variable {} has NaN bounds",
                i
            )));
        }
        if iv.is_empty() {
            return Err(SearchError::InvalidProblem(format!(
                "variable {} has empty domain [{}, {}] ({:?})",
                i, iv.lower, iv.upper, spec.kind
            )));
        }
    }

    Ok(domain)
}

/// Concrete problem definition: an ordered list of variables.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerProgram {
    variables: Vec<VariableSpec>,
}

impl IntegerProgram {
    /// Create a problem from its variables.
    pub fn new(variables: Vec<VariableSpec>) -> BnbResult<Self> {
        let prob = Self { variables };
        validate_problem(&prob)?;
        Ok(prob)
    }

    /// Problem with `n` binary variables.
    pub fn binary(n: usize) -> BnbResult<Self> {
        Self::new(vec![VariableSpec::binary(); n])
    }

    /// Indices of integer variables (includes binary).
    pub fn integer_vars(&self) -> Vec<usize> {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, v)| v.kind.is_integral())
            .map(|(i, _)| i)
            .collect()
    }

    /// Get fractional integer variables and their values.
    ///
    /// Returns (var_index, current_value, fractionality) for each fractional variable.
    pub fn fractional_vars(&self, values: &[f64], tol: f64) -> Vec<(usize, f64, f64)> {
        fractional_vars(self, values, tol)
    }
}

impl ProblemDefinition for IntegerProgram {
    fn variables(&self) -> &[VariableSpec] {
        &self.variables
    }
}

/// Fractional integer variables of `values`, in index order.
pub(crate) fn fractional_vars<P: ProblemDefinition + ?Sized>(
    problem: &P,
    values: &[f64],
    tol: f64,
) -> Vec<(usize, f64, f64)> {
    problem
        .variables()
        .iter()
        .zip(values)
        .enumerate()
        .filter(|(_, (spec, _))| spec.kind.is_integral())
        .filter_map(|(i, (_, &val))| {
            let frac = fractionality(val);
            (frac > tol).then_some((i, val, frac))
        })
        .collect()
}

/// Round integer variables to nearest integer.
pub(crate) fn round_integers<P>(problem: &P, values: &[f64]) -> Vec<f64>
where
    P: ProblemDefinition + ?Sized,
{
    problem
        .variables()
        .iter()
        .zip(values)
        .map(|(spec, &val)| if spec.kind.is_integral() { val.round() } else { val })
        .collect()
}
