//! Shared fixtures: single-constraint knapsack models with an exact relaxation.

#![allow(dead_code)]

use std::time::Duration;

use bnb_search::{BnbResult, Domain, RelaxationOracle, RelaxationOutcome};

/// min c^T x  s.t.  w^T x <= C  (or == C), x within the node domain.
///
/// Weights must be positive. The relaxation is the fractional knapsack,
/// solved exactly by filling items in order of cost per unit weight.
#[derive(Debug, Clone)]
pub struct KnapsackOracle {
    pub costs: Vec<f64>,
    pub weights: Vec<f64>,
    pub capacity: f64,
    pub equality: bool,
    pub calls: usize,
}

impl KnapsackOracle {
    pub fn packing(costs: Vec<f64>, weights: Vec<f64>, capacity: f64) -> Self {
        Self {
            costs,
            weights,
            capacity,
            equality: false,
            calls: 0,
        }
    }

    pub fn exact(costs: Vec<f64>, weights: Vec<f64>, capacity: f64) -> Self {
        Self {
            equality: true,
            ..Self::packing(costs, weights, capacity)
        }
    }

    pub fn objective(&self, x: &[f64]) -> f64 {
        self.costs.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    pub fn load(&self, x: &[f64]) -> f64 {
        self.weights.iter().zip(x).map(|(w, v)| w * v).sum()
    }

    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        let load = self.load(x);
        if self.equality {
            (load - self.capacity).abs() <= tol
        } else {
            load <= self.capacity + tol
        }
    }

    /// Exhaustive minimum over the integer points of `[lower, upper]^n`.
    pub fn brute_force(&self, lower: &[i64], upper: &[i64]) -> Option<(f64, Vec<f64>)> {
        let n = self.costs.len();
        let mut point: Vec<i64> = lower.to_vec();
        let mut best: Option<(f64, Vec<f64>)> = None;

        loop {
            let x: Vec<f64> = point.iter().map(|&v| v as f64).collect();
            if self.is_feasible(&x, 1e-9) {
                let obj = self.objective(&x);
                if best.as_ref().map_or(true, |(b, _)| obj < *b) {
                    best = Some((obj, x));
                }
            }

            // Odometer increment
            let mut i = 0;
            loop {
                if i == n {
                    return best;
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
}

impl RelaxationOracle for KnapsackOracle {
    fn solve(
        &mut self,
        domain: &Domain,
        _time_budget: Option<Duration>,
    ) -> BnbResult<RelaxationOutcome> {
        self.calls += 1;

        let n = self.costs.len();
        let mut x: Vec<f64> = domain.intervals().iter().map(|iv| iv.lower).collect();
        let mut remaining = self.capacity - self.load(&x);
        if remaining < -1e-9 {
            return Ok(RelaxationOutcome::Infeasible);
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            let ra = self.costs[a] / self.weights[a];
            let rb = self.costs[b] / self.weights[b];
            ra.total_cmp(&rb).then(a.cmp(&b))
        });

        for i in order {
            if remaining <= 1e-12 {
                break;
            }
            if !self.equality && self.costs[i] >= 0.0 {
                continue;
            }
            let room = domain[i].upper - x[i];
            if room <= 0.0 {
                continue;
            }
            let take = room.min(remaining / self.weights[i]);
            x[i] += take;
            remaining -= take * self.weights[i];
        }

        if self.equality && remaining > 1e-9 {
            return Ok(RelaxationOutcome::Infeasible);
        }

        let objective = self.objective(&x);
        Ok(RelaxationOutcome::optimal(objective, x))
    }
}
