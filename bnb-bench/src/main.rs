//! Benchmarking CLI for the bnb-search engine.

mod brute_force;
mod generate;
mod lp_oracle;
mod model;
mod report;
mod runner;
mod search_choice;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bnb_search::SearchSettings;
use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Env};

use generate::{generate, GeneratorConfig, InstanceKind};
use model::LinearModel;
use report::{print_results_table, print_summary, BenchReport};
use runner::{record_result, run_instance, solve_model};
use search_choice::{BranchingChoice, NodeSelectionChoice};

#[derive(Debug, Parser)]
#[command(name = "bnb-bench", version, about = "Branch-and-bound benchmark harness")]
struct Cli {
    /// Log search progress and new incumbents
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a model stored as JSON
    Solve(SolveArgs),
    /// Generate and solve seeded random instances
    Random(RandomArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Node selection policy
    #[arg(long, value_enum, default_value_t = NodeSelectionChoice::BestBound)]
    node_selection: NodeSelectionChoice,

    /// Branching variable rule
    #[arg(long, value_enum, default_value_t = BranchingChoice::MostFractional)]
    branching: BranchingChoice,

    /// Time limit in seconds
    #[arg(short, long)]
    time_limit: Option<f64>,

    /// Maximum number of nodes to explore
    #[arg(long)]
    max_nodes: Option<u64>,

    /// Integrality and improvement tolerance
    #[arg(long, default_value = "1e-6")]
    tol: f64,

    /// Write a JSON report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl SearchArgs {
    fn settings(&self, verbose: bool) -> SearchSettings {
        let mut settings = SearchSettings::default()
            .with_node_selection(self.node_selection.into())
            .with_branching_rule(self.branching.into())
            .with_tolerance(self.tol);
        if let Some(seconds) = self.time_limit {
            settings = settings.with_time_limit(seconds);
        }
        if let Some(nodes) = self.max_nodes {
            settings = settings.with_max_nodes(nodes);
        }
        settings.verbose = verbose;
        settings
    }

    fn write_report(&self, records: Vec<report::BenchRecord>) -> Result<()> {
        let report = BenchReport::new(
            format!("{:?}", self.node_selection),
            format!("{:?}", self.branching),
            records,
        );
        print_results_table(&report.records);
        print_summary(&report.summary);

        if let Some(path) = &self.output {
            report.save_json(path)?;
            log::info!("Report written to {}", path.display());
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
struct SolveArgs {
    /// Model file (JSON)
    file: PathBuf,

    /// Check the result by exhaustive enumeration
    #[arg(long)]
    verify: bool,

    /// Print the best assignment
    #[arg(long)]
    print_solution: bool,

    #[command(flatten)]
    search: SearchArgs,
}

impl SolveArgs {
    fn execute(&self, verbose: bool) -> Result<()> {
        let model = LinearModel::load_json(&self.file)?;
        log::info!(
            "Loaded {} ({} vars, {} constraints, {} nonzeros)",
            model.name,
            model.variables.len(),
            model.num_constraints(),
            model.rows.nnz()
        );

        let settings = self.search.settings(verbose);

        let result = solve_model(&model, &settings)?;
        println!("{}", result);
        if self.print_solution {
            if let Some(x) = &result.best_assignment {
                for (j, (spec, v)) in model.variables.iter().zip(x).enumerate() {
                    match &spec.name {
                        Some(name) => println!("  {:<12} {}", name, v),
                        None => println!("  x{:<11} {}", j, v),
                    }
                }
            }
        }

        let record = record_result(&model, &result, &settings, self.verify);
        self.search.write_report(vec![record])
    }
}

#[derive(Debug, Args)]
struct RandomArgs {
    /// Instance family
    #[arg(long, value_enum, default_value_t = InstanceKind::Packing)]
    kind: InstanceKind,

    /// Number of instances
    #[arg(short = 'n', long, default_value = "10")]
    count: usize,

    /// Variables per instance
    #[arg(long, default_value = "12")]
    vars: usize,

    /// Constraints per instance
    #[arg(long, default_value = "3")]
    constraints: usize,

    /// Probability that a coefficient is nonzero
    #[arg(long, default_value = "0.6")]
    density: f64,

    /// Variable upper bound (1 = binary)
    #[arg(long, default_value = "1")]
    max_value: i64,

    /// Right-hand side as a fraction of the largest row activity
    #[arg(long, default_value = "0.5")]
    tightness: f64,

    /// Seed of the first instance; instance i uses seed + i (wrapping)
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Check every result by exhaustive enumeration
    #[arg(long)]
    verify: bool,

    /// Also save each generated model to this directory
    #[arg(long)]
    save_dir: Option<PathBuf>,

    #[command(flatten)]
    search: SearchArgs,
}

impl RandomArgs {
    fn execute(&self, verbose: bool) -> Result<()> {
        let config = GeneratorConfig {
            kind: self.kind,
            num_vars: self.vars,
            num_constraints: self.constraints,
            density: self.density,
            max_value: self.max_value,
            tightness: self.tightness,
        };
        let settings = self.search.settings(verbose);

        if let Some(dir) = &self.save_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let mut records = Vec::with_capacity(self.count);
        for i in 0..self.count {
            let model = generate(&config, instance_seed(self.seed, i))?;
            if let Some(dir) = &self.save_dir {
                model.save_json(dir.join(format!("{}.json", model.name)))?;
            }

            let record = run_instance(&model, &settings, self.verify);
            log::info!(
                "[{}/{}] {} {} nodes={} gap={}%",
                i + 1,
                self.count,
                record.name,
                record.status,
                record.nodes_explored,
                record.gap_percent
            );
            records.push(record);
        }

        self.search.write_report(records)
    }
}

fn instance_seed(first: u64, index: usize) -> u64 {
    first.wrapping_add(index as u64)
}

fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();

    match &cli.command {
        Command::Solve(args) => args.execute(cli.verbose),
        Command::Random(args) => args.execute(cli.verbose),
    }
}
