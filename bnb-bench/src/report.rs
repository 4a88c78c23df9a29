//! Result tables and JSON reports.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use bnb_search::{ProblemDefinition, SearchResult, SearchStatus};
use serde::{Deserialize, Serialize};

use crate::model::LinearModel;

/// One solved instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchRecord {
    /// Instance name
    pub name: String,
    /// Number of variables
    pub n: usize,
    /// Number of constraints
    pub m: usize,
    /// Terminal status, or "Error"
    pub status: String,
    /// Root relaxation value
    pub lp_relaxation: Option<f64>,
    pub best_objective: Option<f64>,
    pub best_bound: Option<f64>,
    pub nodes_explored: u64,
    pub nodes_pruned: u64,
    #[serde(default)]
    pub nodes_infeasible: u64,
    #[serde(default)]
    pub max_depth: usize,
    /// Gap in percent, "inf" when either side is missing
    pub gap_percent: String,
    pub time_s: f64,
    /// Agreement with brute force, when checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BenchRecord {
    pub fn from_result(model: &LinearModel, result: &SearchResult) -> Self {
        Self {
            name: model.name.clone(),
            n: model.num_vars(),
            m: model.num_constraints(),
            status: result.status.to_string(),
            lp_relaxation: result.root_bound,
            best_objective: result.best_objective,
            best_bound: Some(result.best_bound).filter(|b| b.is_finite()),
            nodes_explored: result.nodes_explored,
            nodes_pruned: result.nodes_pruned,
            nodes_infeasible: result.nodes_infeasible,
            max_depth: result.max_depth,
            gap_percent: result.gap_percent(),
            time_s: result.elapsed_seconds(),
            verified: None,
            error: None,
        }
    }

    pub fn from_error(model: &LinearModel, error: impl ToString) -> Self {
        Self {
            name: model.name.clone(),
            n: model.num_vars(),
            m: model.num_constraints(),
            status: "Error".to_string(),
            lp_relaxation: None,
            best_objective: None,
            best_bound: None,
            nodes_explored: 0,
            nodes_pruned: 0,
            nodes_infeasible: 0,
            max_depth: 0,
            gap_percent: "inf".to_string(),
            time_s: 0.0,
            verified: None,
            error: Some(error.to_string()),
        }
    }
}

/// Summary statistics for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchSummary {
    pub total: usize,
    pub optimal: usize,
    pub infeasible: usize,
    pub time_limit: usize,
    pub node_limit: usize,
    pub errors: usize,
    /// Instances checked against brute force, and how many disagreed
    pub verified: usize,
    pub mismatches: usize,
    pub total_nodes: u64,
    pub total_time_s: f64,
    /// Geometric mean of nodes explored over proven instances
    pub geom_mean_nodes: f64,
}

pub fn compute_summary(records: &[BenchRecord]) -> BenchSummary {
    let mut summary = BenchSummary {
        total: records.len(),
        ..BenchSummary::default()
    };
    let mut log_sum = 0.0;
    let mut log_count = 0;

    for r in records {
        summary.total_time_s += r.time_s;
        summary.total_nodes += r.nodes_explored;

        match r.verified {
            Some(true) => summary.verified += 1,
            Some(false) => {
                summary.verified += 1;
                summary.mismatches += 1;
            }
            None => {}
        }

        let proven = match r.status.as_str() {
            "Optimal" => {
                summary.optimal += 1;
                true
            }
            "Infeasible" => {
                summary.infeasible += 1;
                true
            }
            "TimeLimit" => {
                summary.time_limit += 1;
                false
            }
            "NodeLimit" => {
                summary.node_limit += 1;
                false
            }
            _ => {
                summary.errors += 1;
                false
            }
        };
        if proven && r.nodes_explored > 0 {
            log_sum += (r.nodes_explored as f64).ln();
            log_count += 1;
        }
    }

    summary.geom_mean_nodes = if log_count > 0 {
        (log_sum / log_count as f64).exp()
    } else {
        0.0
    };
    summary
}

/// A full run: settings used, one record per instance and the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub node_selection: String,
    pub branching: String,
    pub records: Vec<BenchRecord>,
    pub summary: BenchSummary,
}

impl BenchReport {
    pub fn new(node_selection: String, branching: String, records: Vec<BenchRecord>) -> Self {
        let summary = compute_summary(&records);
        Self {
            node_selection,
            branching,
            records,
            summary,
        }
    }

    /// Save to JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file {}", path.as_ref().display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write JSON to {}", path.as_ref().display()))?;
        Ok(())
    }
}

fn format_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}

/// Print the results table
pub fn print_results_table(records: &[BenchRecord]) {
    println!(
        "\n{:<24} {:>5} {:>5} {:>10} {:>14} {:>14} {:>10} {:>10} {:>10}",
        "Problem", "n", "m", "Status", "LP Relaxation", "Best Obj", "Nodes", "Gap (%)", "Time (s)"
    );
    println!("{}", "-".repeat(110));

    for r in records {
        println!(
            "{:<24} {:>5} {:>5} {:>10} {:>14} {:>14} {:>10} {:>10} {:>10.3}",
            r.name,
            r.n,
            r.m,
            r.status,
            format_opt(r.lp_relaxation),
            format_opt(r.best_objective),
            r.nodes_explored,
            r.gap_percent,
            r.time_s
        );
        if let Some(err) = &r.error {
            println!("    error: {}", err);
        }
        if r.verified == Some(false) {
            println!("    MISMATCH against brute force");
        }
    }
}

/// Print results summary
pub fn print_summary(summary: &BenchSummary) {
    println!("\n{}", "=".repeat(60));
    println!("Branch-and-Bound Benchmark Summary");
    println!("{}", "=".repeat(60));
    println!("Total problems:      {}", summary.total);
    if summary.total > 0 {
        println!(
            "Optimal:             {} ({:.1}%)",
            summary.optimal,
            100.0 * summary.optimal as f64 / summary.total as f64
        );
    }
    println!("Infeasible:          {}", summary.infeasible);
    println!("Time limit:          {}", summary.time_limit);
    println!("Node limit:          {}", summary.node_limit);
    println!("Errors:              {}", summary.errors);
    if summary.verified > 0 {
        println!("Verified:            {} ({} mismatches)", summary.verified, summary.mismatches);
    }
    println!("Total nodes:         {}", summary.total_nodes);
    println!("Total time:          {:.2}s", summary.total_time_s);
    println!("Geom mean nodes:     {:.1}", summary.geom_mean_nodes);
    println!("{}", "=".repeat(60));
}

/// Whether a search result agrees with an exhaustive optimum.
pub fn agrees_with(result: &SearchResult, expected: Option<f64>, tol: f64) -> bool {
    match (result.status, expected) {
        (SearchStatus::Optimal, Some(best)) => result
            .best_objective
            .is_some_and(|obj| (obj - best).abs() <= tol * best.abs().max(1.0)),
        (SearchStatus::Infeasible, None) => true,
        // Limits prove nothing; only a better-than-optimal incumbent is wrong
        (SearchStatus::TimeLimit | SearchStatus::NodeLimit, Some(best)) => {
            result.best_objective.map_or(true, |obj| obj >= best - tol * best.abs().max(1.0))
        }
        (SearchStatus::TimeLimit | SearchStatus::NodeLimit, None) => {
            result.best_objective.is_none()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(status: &str, nodes: u64, verified: Option<bool>) -> BenchRecord {
        BenchRecord {
            name: "p".to_string(),
            n: 2,
            m: 1,
            status: status.to_string(),
            lp_relaxation: Some(-3.5),
            best_objective: Some(-3.0),
            best_bound: Some(-3.0),
            nodes_explored: nodes,
            nodes_pruned: 0,
            nodes_infeasible: 0,
            max_depth: 1,
            gap_percent: "0.0000".to_string(),
            time_s: 0.5,
            verified,
            error: None,
        }
    }

    fn result(status: SearchStatus, best: Option<f64>) -> SearchResult {
        SearchResult {
            status,
            best_objective: best,
            best_assignment: best.map(|_| vec![0.0]),
            root_bound: Some(-4.0),
            best_bound: -4.0,
            nodes_explored: 3,
            nodes_pruned: 1,
            nodes_branched: 1,
            nodes_infeasible: 0,
            max_depth: 1,
            incumbent_updates: 1,
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_summary_counts() {
        let records = vec![
            record("Optimal", 4, Some(true)),
            record("Optimal", 16, Some(false)),
            record("Infeasible", 1, None),
            record("TimeLimit", 100, None),
            record("Error", 0, None),
        ];
        let summary = compute_summary(&records);

        assert_eq!(summary.total, 5);
        assert_eq!(summary.optimal, 2);
        assert_eq!(summary.infeasible, 1);
        assert_eq!(summary.time_limit, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.verified, 2);
        assert_eq!(summary.mismatches, 1);
        assert_eq!(summary.total_nodes, 121);
        assert!((summary.total_time_s - 2.5).abs() < 1e-12);
        // Geometric mean of 4, 16 and 1
        assert!((summary.geom_mean_nodes - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_agreement() {
        assert!(agrees_with(&result(SearchStatus::Optimal, Some(-3.0)), Some(-3.0), 1e-6));
        assert!(!agrees_with(&result(SearchStatus::Optimal, Some(-2.0)), Some(-3.0), 1e-6));
        assert!(!agrees_with(&result(SearchStatus::Optimal, Some(-3.0)), None, 1e-6));
        assert!(agrees_with(&result(SearchStatus::Infeasible, None), None, 1e-6));
        assert!(!agrees_with(&result(SearchStatus::Infeasible, None), Some(-1.0), 1e-6));
        assert!(agrees_with(&result(SearchStatus::TimeLimit, Some(-2.0)), Some(-3.0), 1e-6));
        assert!(!agrees_with(&result(SearchStatus::NodeLimit, Some(-4.0)), Some(-3.0), 1e-6));
    }

    #[test]
    fn test_record_from_unsolved_result() {
        let config = crate::generate::GeneratorConfig::default();
        let model = crate::generate::generate(&config, 1).unwrap();
        let mut res = result(SearchStatus::TimeLimit, None);
        res.root_bound = None;
        res.best_bound = f64::NEG_INFINITY;

        let rec = BenchRecord::from_result(&model, &res);
        assert_eq!(rec.status, "TimeLimit");
        assert_eq!(rec.gap_percent, "inf");
        assert!(rec.best_bound.is_none());
        assert!(rec.lp_relaxation.is_none());
        assert_eq!(rec.nodes_infeasible, 0);
        assert_eq!(rec.max_depth, 1);
    }
}
