//! Variable domains.

use std::ops::Index;

/// Closed interval `[lower, upper]` for one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound (may be -inf).
    pub lower: f64,

    /// Upper bound (may be +inf).
    pub upper: f64,
}

impl Interval {
    /// Create a new interval.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// The binary interval `[0, 1]`.
    pub fn binary() -> Self {
        Self::new(0.0, 1.0)
    }

    /// True if no real value fits (`lower > upper`).
    pub fn is_empty(&self) -> bool {
        self.lower > self.upper
    }

    /// True if `value` lies within the interval, up to `tol`.
    pub fn contains(&self, value: f64, tol: f64) -> bool {
        value >= self.lower - tol && value <= self.upper + tol
    }

    /// True if `self` is a subset of `other`.
    pub fn is_subset_of(&self, other: &Interval) -> bool {
        self.lower >= other.lower && self.upper <= other.upper
    }
}

/// Per-variable bounds at a search node.
///
/// Indexed by variable position in the problem definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    intervals: Vec<Interval>,
}

impl Domain {
    /// Create a domain from per-variable intervals.
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// True if the domain has no variables.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Interval of variable `var`.
    pub fn get(&self, var: usize) -> Option<Interval> {
        self.intervals.get(var).copied()
    }

    /// All intervals, in variable order.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Iterate over `(var, interval)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Interval)> + '_ {
        self.intervals.iter().copied().enumerate()
    }

    /// True if some variable has `lower > upper`.
    ///
    /// Such a domain contains no point and is infeasible without consulting
    /// the relaxation oracle.
    pub fn is_malformed(&self) -> bool {
        self.intervals.iter().any(Interval::is_empty)
    }

    /// Copy of this domain with the interval of `var` replaced.
    pub fn with_interval(&self, var: usize, interval: Interval) -> Self {
        let mut intervals = self.intervals.clone();
        intervals[var] = interval;
        Self { intervals }
    }

    /// True if `values` lies inside every interval, up to `tol`.
    pub fn contains(&self, values: &[f64], tol: f64) -> bool {
        values.len() == self.intervals.len()
            && self
                .intervals
                .iter()
                .zip(values)
                .all(|(iv, &v)| iv.contains(v, tol))
    }
}

impl Index<usize> for Domain {
    type Output = Interval;

    fn index(&self, var: usize) -> &Interval {
        &self.intervals[var]
    }
}
