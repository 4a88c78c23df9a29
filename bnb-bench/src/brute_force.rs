//! Exhaustive enumeration for small pure-integer models.

use anyhow::{bail, Result};
use bnb_search::ProblemDefinition;

use crate::model::LinearModel;

/// Largest number of points `brute_force` will enumerate.
pub const MAX_POINTS: u64 = 1 << 22;

/// Best integer point of `model`, or `None` if it has none.
///
/// Ties keep the first point enumerated, with the first variable moving
/// fastest. Fails on continuous variables, unbounded variables and boxes
/// larger than [`MAX_POINTS`].
pub fn brute_force(model: &LinearModel, tol: f64) -> Result<Option<(f64, Vec<f64>)>> {
    if !model.is_pure_integer() {
        bail!("brute force requires a pure integer model");
    }

    let domain = model.root_domain();
    let mut lower = Vec::with_capacity(domain.len());
    let mut upper = Vec::with_capacity(domain.len());
    let mut points: u64 = 1;
    for (j, iv) in domain.iter() {
        if !iv.lower.is_finite() || !iv.upper.is_finite() {
            bail!("variable {} is unbounded", j);
        }
        let (lo, hi) = (iv.lower.ceil(), iv.upper.floor());
        if lo > hi {
            return Ok(None);
        }
        if lo < i64::MIN as f64 || hi > i64::MAX as f64 {
            bail!("variable {} bounds exceed the integer range", j);
        }
        let (lo, hi) = (lo as i64, hi as i64);
        let Some(count) = hi.checked_sub(lo).and_then(|d| d.checked_add(1)) else {
            bail!("variable {} has too many integer values to enumerate", j);
        };
        points = points.saturating_mul(count as u64);
        if points > MAX_POINTS {
            bail!("more than {} integer points to enumerate", MAX_POINTS);
        }
        lower.push(lo);
        upper.push(hi);
    }

    let n = lower.len();
    let mut point = lower.clone();
    let mut best: Option<(f64, Vec<f64>)> = None;

    loop {
        let x: Vec<f64> = point.iter().map(|&v| v as f64).collect();
        if model.is_feasible(&x, tol) {
            let obj = model.objective_value(&x);
            if best.as_ref().map_or(true, |(b, _)| obj < *b) {
                best = Some((obj, x));
            }
        }

        // Odometer increment
        let mut i = 0;
        loop {
            if i == n {
                return Ok(best);
            }
            if point[i] < upper[i] {
                point[i] += 1;
                break;
            }
            point[i] = lower[i];
            i += 1;
        }
    }
}
