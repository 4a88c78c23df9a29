//! Linear integer models: JSON instance files and their sparse form.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{bail, Context, Result};
use bnb_search::model::validate_problem;
use bnb_search::{ProblemDefinition, VarKind, VariableSpec};
use serde::{Deserialize, Serialize};
use sprs::{CsMat, TriMat};

/// Row sense of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    /// `a^T x <= b`
    Le,
    /// `a^T x >= b`
    Ge,
    /// `a^T x == b`
    Eq,
}

/// Variable entry of an instance file. Missing bounds are infinite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDef {
    pub kind: KindDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindDef {
    Binary,
    Integer,
    Continuous,
}

/// Constraint entry of an instance file: sparse `(column, coefficient)` terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintDef {
    pub terms: Vec<(usize, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

/// On-disk layout of a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    #[serde(default)]
    pub name: String,
    pub objective: Vec<f64>,
    pub variables: Vec<VariableDef>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDef>,
}

/// minimize c^T x  s.t.  A x (<=, >=, ==) b, x within its declared bounds,
/// with integrality on binary and integer columns.
///
/// `A` is stored row-major (CSR) so each constraint is one outer view.
#[derive(Debug, Clone)]
pub struct LinearModel {
    pub name: String,
    pub objective: Vec<f64>,
    pub variables: Vec<VariableSpec>,
    pub rows: CsMat<f64>,
    pub senses: Vec<Sense>,
    pub rhs: Vec<f64>,
}

impl LinearModel {
    /// Build and validate a model from its file layout.
    pub fn from_file(file: ModelFile) -> Result<Self> {
        let n = file.variables.len();
        let m = file.constraints.len();

        if file.objective.len() != n {
            bail!(
                "objective has {} coefficients but the model declares {} variables",
                file.objective.len(),
                n
            );
        }
        if let Some(j) = file.objective.iter().position(|c| !c.is_finite()) {
            bail!("objective coefficient {} is not finite", j);
        }

        let variables: Vec<VariableSpec> = file.variables.iter().map(variable_spec).collect();

        let mut tri = TriMat::new((m, n));
        let mut senses = Vec::with_capacity(m);
        let mut rhs = Vec::with_capacity(m);
        for (i, row) in file.constraints.iter().enumerate() {
            if !row.rhs.is_finite() {
                bail!("constraint {}: right-hand side is not finite", i);
            }
            for &(j, val) in &row.terms {
                if j >= n {
                    bail!("constraint {}: column {} out of range (n = {})", i, j, n);
                }
                if !val.is_finite() {
                    bail!("constraint {}: coefficient on column {} is not finite", i, j);
                }
                tri.add_triplet(i, j, val);
            }
            senses.push(row.sense);
            rhs.push(row.rhs);
        }

        let rows: CsMat<f64> = tri.to_csr();

        let model = Self {
            name: file.name,
            objective: file.objective,
            variables,
            rows,
            senses,
            rhs,
        };
        validate_problem(&model).with_context(|| format!("invalid model '{}'", model.name))?;
        Ok(model)
    }

    /// File layout of this model.
    pub fn to_file(&self) -> ModelFile {
        let variables = self
            .variables
            .iter()
            .map(|spec| VariableDef {
                kind: match spec.kind {
                    VarKind::Binary => KindDef::Binary,
                    VarKind::Integer => KindDef::Integer,
                    VarKind::Continuous => KindDef::Continuous,
                },
                lower: Some(spec.bounds.lower).filter(|l| l.is_finite()),
                upper: Some(spec.bounds.upper).filter(|u| u.is_finite()),
                name: spec.name.clone(),
            })
            .collect();

        let constraints = self
            .rows
            .outer_iterator()
            .zip(self.senses.iter().zip(&self.rhs))
            .map(|(row, (&sense, &rhs))| ConstraintDef {
                terms: row.iter().map(|(j, &val)| (j, val)).collect(),
                sense,
                rhs,
            })
            .collect();

        ModelFile {
            name: self.name.clone(),
            objective: self.objective.clone(),
            variables,
            constraints,
        }
    }

    /// Load a model from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);
        let layout: ModelFile = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse JSON from {}", path.as_ref().display()))?;
        Self::from_file(layout)
    }

    /// Save the model to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file {}", path.as_ref().display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.to_file())
            .with_context(|| format!("Failed to write JSON to {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn num_constraints(&self) -> usize {
        self.rhs.len()
    }

    /// c^T x
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// A x
    pub fn row_activity(&self, x: &[f64]) -> Vec<f64> {
        self.rows
            .outer_iterator()
            .map(|row| row.iter().map(|(j, &val)| val * x[j]).sum::<f64>())
            .collect()
    }

    /// Whether `x` satisfies every row and variable bound within `tol`.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        if x.len() != self.variables.len() {
            return false;
        }
        if !self.root_domain().contains(x, tol) {
            return false;
        }

        self.row_activity(x)
            .iter()
            .zip(self.senses.iter().zip(&self.rhs))
            .all(|(&ax, (&sense, &b))| match sense {
                Sense::Le => ax <= b + tol,
                Sense::Ge => ax >= b - tol,
                Sense::Eq => (ax - b).abs() <= tol,
            })
    }

    /// Whether every variable is binary or integer.
    pub fn is_pure_integer(&self) -> bool {
        self.variables.iter().all(|v| v.kind.is_integral())
    }
}

impl ProblemDefinition for LinearModel {
    fn variables(&self) -> &[VariableSpec] {
        &self.variables
    }
}

fn variable_spec(def: &VariableDef) -> VariableSpec {
    let lower = def.lower.unwrap_or(f64::NEG_INFINITY);
    let upper = def.upper.unwrap_or(f64::INFINITY);

    let spec = match def.kind {
        KindDef::Binary => {
            let mut spec = VariableSpec::binary();
            spec.bounds.lower = def.lower.unwrap_or(0.0);
            spec.bounds.upper = def.upper.unwrap_or(1.0);
            spec
        }
        KindDef::Integer => VariableSpec::integer(lower, upper),
        KindDef::Continuous => VariableSpec::continuous(lower, upper),
    };

    match &def.name {
        Some(name) => spec.with_name(name.clone()),
        None => spec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knapsack_json() -> &'static str {
        r#"{
            "name": "tiny",
            "objective": [-2.0, -3.0, 1.0],
            "variables": [
                {"kind": "binary"},
                {"kind": "binary"},
                {"kind": "continuous", "lower": 0.0, "upper": 4.0}
            ],
            "constraints": [
                {"terms": [[0, 1.0], [1, 2.0]], "sense": "le", "rhs": 2.0},
                {"terms": [[2, 1.0]], "sense": "ge", "rhs": 0.5}
            ]
        }"#
    }

    fn tiny() -> LinearModel {
        let file: ModelFile = serde_json::from_str(knapsack_json()).unwrap();
        LinearModel::from_file(file).unwrap()
    }

    #[test]
    fn test_parse_model() {
        let model = tiny();

        assert_eq!(model.name, "tiny");
        assert_eq!(model.num_vars(), 3);
        assert_eq!(model.num_constraints(), 2);
        assert_eq!(model.rows.nnz(), 3);
        assert!(model.rows.is_csr());
        assert_eq!(model.senses, vec![Sense::Le, Sense::Ge]);
        assert_eq!(model.variables[0].kind, VarKind::Binary);
        assert_eq!(model.variables[2].bounds.upper, 4.0);
        assert!(!model.is_pure_integer());
    }

    #[test]
    fn test_feasibility() {
        let model = tiny();

        assert!(model.is_feasible(&[0.0, 1.0, 0.5], 1e-9));
        assert!(!model.is_feasible(&[1.0, 1.0, 0.5], 1e-9));
        assert!(!model.is_feasible(&[0.0, 1.0, 0.0], 1e-9));
        assert!(!model.is_feasible(&[0.0, 1.0, 5.0], 1e-9));
        assert_eq!(model.row_activity(&[1.0, 0.5, 2.0]), vec![2.0, 2.0]);
        assert_eq!(model.objective_value(&[0.0, 1.0, 0.5]), -2.5);
    }

    #[test]
    fn test_file_layout_preserved() {
        let model = tiny();
        let again = LinearModel::from_file(model.to_file()).unwrap();

        assert_eq!(again.variables, model.variables);
        assert_eq!(again.rows, model.rows);
        assert_eq!(again.rhs, model.rhs);
        // Infinite bounds are omitted rather than written as JSON numbers
        let unbounded = VariableSpec::integer(0.0, f64::INFINITY);
        let file = ModelFile {
            name: String::new(),
            objective: vec![1.0],
            variables: vec![VariableDef {
                kind: KindDef::Integer,
                lower: Some(0.0),
                upper: None,
                name: None,
            }],
            constraints: vec![],
        };
        let model = LinearModel::from_file(file).unwrap();
        assert_eq!(model.variables[0], unbounded);
        assert!(serde_json::to_string(&model.to_file()).unwrap().contains("\"lower\":0.0"));
        assert!(!serde_json::to_string(&model.to_file()).unwrap().contains("upper"));
    }

    #[test]
    fn test_rejects_bad_models() {
        let mut file: ModelFile = serde_json::from_str(knapsack_json()).unwrap();
        file.constraints[0].terms.push((7, 1.0));
        assert!(LinearModel::from_file(file).is_err());

        let mut file: ModelFile = serde_json::from_str(knapsack_json()).unwrap();
        file.objective.pop();
        assert!(LinearModel::from_file(file).is_err());

        let mut file: ModelFile = serde_json::from_str(knapsack_json()).unwrap();
        file.variables[2].lower = Some(5.0);
        assert!(LinearModel::from_file(file).is_err());
    }
}
