//! Randomized checks against exhaustive enumeration.

mod common;

use bnb_search::{
    solve, BranchingRule, IntegerProgram, NodeSelection, ProblemDefinition, SearchSettings,
    SearchStatus, VariableSpec,
};
use common::KnapsackOracle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_knapsack(rng: &mut StdRng, n: usize, max_units: i64) -> KnapsackOracle {
    let weights: Vec<f64> = (0..n).map(|_| rng.gen_range(1..=9) as f64).collect();
    let costs: Vec<f64> = (0..n).map(|_| rng.gen_range(-12..=3) as f64).collect();
    let total: f64 = weights.iter().sum::<f64>() * max_units as f64;
    let capacity = rng.gen_range(0..=(total as i64)) as f64;

    if rng.gen_bool(0.3) {
        KnapsackOracle::exact(costs, weights, capacity)
    } else {
        KnapsackOracle::packing(costs, weights, capacity)
    }
}

fn all_settings() -> Vec<SearchSettings> {
    let mut out = Vec::new();
    for policy in [NodeSelection::BestBound, NodeSelection::DepthFirst] {
        for rule in [BranchingRule::MostFractional, BranchingRule::FirstFractional] {
            out.push(
                SearchSettings::default()
                    .with_node_selection(policy)
                    .with_branching_rule(rule),
            );
        }
    }
    out
}

fn check_against_brute_force(
    prob: &IntegerProgram,
    oracle: &KnapsackOracle,
    lower: &[i64],
    upper: &[i64],
) {
    let expected = oracle.brute_force(lower, upper);

    for settings in all_settings() {
        let sol = solve(prob, &mut oracle.clone(), &settings).unwrap();

        match &expected {
            None => {
                assert_eq!(sol.status, SearchStatus::Infeasible, "{:?} {:?}", oracle, settings);
                assert!(sol.best_assignment.is_none());
            }
            Some((best, _)) => {
                assert_eq!(sol.status, SearchStatus::Optimal, "{:?} {:?}", oracle, settings);
                let obj = sol.best_objective.unwrap();
                assert!(
                    (obj - best).abs() < 1e-6,
                    "got {} expected {} for {:?}",
                    obj,
                    best,
                    oracle
                );

                // Incumbent is an integer point of the declared domain satisfying the constraint
                let x = sol.best_assignment.as_ref().unwrap();
                assert!(prob.root_domain().contains(x, 0.0));
                assert!(prob.is_integer_feasible(x, 0.0));
                assert!(oracle.is_feasible(x, 1e-6));
                assert!((oracle.objective(x) - obj).abs() < 1e-6);

                // Root relaxation is a valid lower bound
                assert!(sol.root_bound.unwrap() <= obj + 1e-6);
                assert!(sol.gap().is_finite());
            }
        }
    }
}

#[test]
fn test_binary_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..150 {
        let n = rng.gen_range(1..=8);
        let oracle = random_knapsack(&mut rng, n, 1);
        let prob = IntegerProgram::binary(n).unwrap();
        check_against_brute_force(&prob, &oracle, &vec![0; n], &vec![1; n]);
    }
}

#[test]
fn test_general_integer_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..60 {
        let n = rng.gen_range(1..=4);
        let lower: Vec<i64> = (0..n).map(|_| rng.gen_range(0..=1)).collect();
        let upper: Vec<i64> = lower.iter().map(|&l| l + rng.gen_range(0..=3)).collect();
        let oracle = random_knapsack(&mut rng, n, 4);
        let prob = IntegerProgram::new(
            lower
                .iter()
                .zip(&upper)
                .map(|(&l, &u)| VariableSpec::integer(l as f64, u as f64))
                .collect(),
        )
        .unwrap();

        check_against_brute_force(&prob, &oracle, &lower, &upper);
    }
}

#[test]
fn test_best_bound_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let n = rng.gen_range(4..=12);
        let oracle = random_knapsack(&mut rng, n, 1);
        let prob = IntegerProgram::binary(n).unwrap();
        let settings = SearchSettings::default();

        let a = solve(&prob, &mut oracle.clone(), &settings).unwrap();
        let b = solve(&prob, &mut oracle.clone(), &settings).unwrap();

        assert_eq!(a.status, b.status);
        assert_eq!(a.nodes_explored, b.nodes_explored);
        assert_eq!(a.best_objective, b.best_objective);
        assert_eq!(a.best_assignment, b.best_assignment);
    }
}

#[test]
fn test_incumbent_never_below_root_bound() {
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..40 {
        let n = rng.gen_range(6..=14);
        let oracle = random_knapsack(&mut rng, n, 1);
        let prob = IntegerProgram::binary(n).unwrap();
        let settings = SearchSettings::default().with_node_selection(NodeSelection::DepthFirst);

        let sol = solve(&prob, &mut oracle.clone(), &settings).unwrap();
        if let (Some(obj), Some(root)) = (sol.best_objective, sol.root_bound) {
            assert!(obj >= root - 1e-6);
            assert!(sol.best_bound <= obj);
        }
    }
}
