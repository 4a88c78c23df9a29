//! Seeded random instance generation.

use anyhow::Result;
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{ConstraintDef, KindDef, LinearModel, ModelFile, Sense, VariableDef};

/// Family of generated instances.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceKind {
    /// max p^T x  s.t.  A x <= b  (solved as min -p^T x)
    Packing,
    /// min c^T x  s.t.  A x >= b
    Covering,
}

/// Shape of generated instances.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub kind: InstanceKind,
    pub num_vars: usize,
    pub num_constraints: usize,
    /// Probability that a coefficient is nonzero.
    pub density: f64,
    /// Upper bound of every variable; 1 gives binary variables.
    pub max_value: i64,
    /// Right-hand side as a fraction of the row's largest activity.
    pub tightness: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            kind: InstanceKind::Packing,
            num_vars: 12,
            num_constraints: 3,
            density: 0.6,
            max_value: 1,
            tightness: 0.5,
        }
    }
}

/// Generate one instance. Equal `(config, seed)` pairs give identical models.
///
/// Coefficients are small positive integers and every row has at least one
/// nonzero, so packing instances always admit `x = 0` and covering instances
/// always admit `x = max_value`.
pub fn generate(config: &GeneratorConfig, seed: u64) -> Result<LinearModel> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = config.num_vars;
    let upper = config.max_value.max(1) as f64;

    let objective: Vec<f64> = (0..n)
        .map(|_| {
            let c = rng.gen_range(1..=20) as f64;
            match config.kind {
                InstanceKind::Packing => -c,
                InstanceKind::Covering => c,
            }
        })
        .collect();

    let variables = (0..n)
        .map(|j| VariableDef {
            kind: if config.max_value <= 1 { KindDef::Binary } else { KindDef::Integer },
            lower: Some(0.0),
            upper: Some(upper),
            name: Some(format!("x{}", j)),
        })
        .collect();

    let mut constraints = Vec::with_capacity(config.num_constraints);
    for _ in 0..config.num_constraints {
        let mut terms: Vec<(usize, f64)> = Vec::new();
        for j in 0..n {
            if rng.gen_bool(config.density.clamp(0.0, 1.0)) {
                terms.push((j, rng.gen_range(1..=9) as f64));
            }
        }
        if terms.is_empty() && n > 0 {
            terms.push((rng.gen_range(0..n), rng.gen_range(1..=9) as f64));
        }

        let max_activity: f64 = terms.iter().map(|&(_, a)| a * upper).sum();
        let target = config.tightness.clamp(0.0, 1.0) * max_activity;
        let (sense, rhs) = match config.kind {
            InstanceKind::Packing => (Sense::Le, target.floor()),
            InstanceKind::Covering => (Sense::Ge, target.ceil()),
        };

        constraints.push(ConstraintDef { terms, sense, rhs });
    }

    let name = match config.kind {
        InstanceKind::Packing => format!("packing-{}x{}-{}", config.num_constraints, n, seed),
        InstanceKind::Covering => format!("covering-{}x{}-{}", config.num_constraints, n, seed),
    };

    LinearModel::from_file(ModelFile {
        name,
        objective,
        variables,
        constraints,
    })
}
