//! Solve one model and turn the outcome into a report record.

use anyhow::Result;
use bnb_search::{solve, SearchResult, SearchSettings};

use crate::brute_force::brute_force;
use crate::lp_oracle::LpOracle;
use crate::model::LinearModel;
use crate::report::{agrees_with, BenchRecord};

/// Run the search with the LP oracle.
pub fn solve_model(model: &LinearModel, settings: &SearchSettings) -> Result<SearchResult> {
    let mut oracle = LpOracle::new(model);
    let result = solve(model, &mut oracle, settings)?;
    log::debug!("{}: {} LP solves", model.name, oracle.solves());
    Ok(result)
}

/// Solve `model` and record the outcome; search errors become error records.
///
/// With `verify`, the result is checked against exhaustive enumeration and
/// the incumbent against the model's rows.
pub fn run_instance(model: &LinearModel, settings: &SearchSettings, verify: bool) -> BenchRecord {
    match solve_model(model, settings) {
        Ok(result) => record_result(model, &result, settings, verify),
        Err(e) => {
            log::error!("{}: {:#}", model.name, e);
            BenchRecord::from_error(model, e)
        }
    }
}

/// Record an already computed result.
pub fn record_result(
    model: &LinearModel,
    result: &SearchResult,
    settings: &SearchSettings,
    verify: bool,
) -> BenchRecord {
    let mut record = BenchRecord::from_result(model, result);
    if verify {
        match verify_result(model, result, settings.feasibility_tol) {
            Ok(ok) => record.verified = Some(ok),
            Err(e) => log::warn!("{}: not verified: {:#}", model.name, e),
        }
    }
    record
}

fn verify_result(model: &LinearModel, result: &SearchResult, tol: f64) -> Result<bool> {
    let expected = brute_force(model, tol)?;

    let incumbent_ok = match &result.best_assignment {
        Some(x) => model.is_feasible(x, 1e-6),
        None => true,
    };
    let ok = incumbent_ok && agrees_with(result, expected.as_ref().map(|(obj, _)| *obj), 1e-6);

    if !ok {
        log::warn!(
            "{}: search reported {} but enumeration found {:?}",
            model.name,
            result,
            expected.map(|(obj, _)| obj)
        );
    }
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{generate, GeneratorConfig, InstanceKind};
    use bnb_search::{NodeSelection, SearchStatus};

    #[test]
    fn test_lp_search_matches_brute_force() {
        for kind in [InstanceKind::Packing, InstanceKind::Covering] {
            for max_value in [1, 3] {
                let config = GeneratorConfig {
                    kind,
                    num_vars: 6,
                    num_constraints: 2,
                    max_value,
                    ..GeneratorConfig::default()
                };
                for seed in 0..8 {
                    let model = generate(&config, seed).unwrap();
                    for policy in [NodeSelection::BestBound, NodeSelection::DepthFirst] {
                        let settings = SearchSettings::default().with_node_selection(policy);
                        let record = run_instance(&model, &settings, true);

                        assert_eq!(record.status, "Optimal", "{} {:?}", model.name, policy);
                        assert_eq!(record.verified, Some(true), "{} {:?}", model.name, policy);
                    }
                }
            }
        }
    }

    #[test]
    fn test_infeasible_model() {
        let file: crate::model::ModelFile = serde_json::from_str(
            r#"{"name": "parity",
                "objective": [1.0, 1.0, 1.0],
                "variables": [{"kind": "binary"}, {"kind": "binary"}, {"kind": "binary"}],
                "constraints": [{"terms": [[0, 2.0], [1, 2.0], [2, 2.0]],
                                 "sense": "eq", "rhs": 3.0}]}"#,
        )
        .unwrap();
        let model = LinearModel::from_file(file).unwrap();

        let result = solve_model(&model, &SearchSettings::default()).unwrap();
        assert_eq!(result.status, SearchStatus::Infeasible);
        assert!(result.best_objective.is_none());

        let record = run_instance(&model, &SearchSettings::default(), true);
        assert_eq!(record.status, "Infeasible");
        assert_eq!(record.verified, Some(true));
        assert_eq!(record.gap_percent, "inf");
    }

    #[test]
    fn test_unbounded_relaxation_is_error_record() {
        let file: crate::model::ModelFile = serde_json::from_str(
            r#"{"name": "ray", "objective": [-1.0],
                "variables": [{"kind": "integer", "lower": 0.0}]}"#,
        )
        .unwrap();
        let model = LinearModel::from_file(file).unwrap();

        let record = run_instance(&model, &SearchSettings::default(), false);
        assert_eq!(record.status, "Error");
        assert!(record.error.is_some());
    }
}
