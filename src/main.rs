//! `evrp` command-line front end.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use evrp_routing::algorithms::AlgorithmKind;
use evrp_routing::config::SolverConfig;
use evrp_routing::solver::{run_rng, EvrpSolver, ResultWriter};
use evrp_routing::tour::TourDisplay;

#[derive(Debug, Parser)]
#[command(
    name = "evrp",
    about = "Electric vehicle routing with random search, GA and NEH heuristics",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run algorithms independently on each instance.
    Solve(SolveArgs),
    /// Run a seeding algorithm, then a GA started from its tours.
    Seeded(SeededArgs),
    /// Print a summary of an instance.
    Inspect(InspectArgs),
}

/// Options shared by the solving subcommands.
#[derive(Debug, Args)]
struct RunArgs {
    /// Instance files.
    #[arg(required = true, value_name = "INSTANCE")]
    instances: Vec<PathBuf>,
    /// Repetitions per algorithm and instance.
    #[arg(long, default_value_t = 1)]
    runs: usize,
    /// Worker threads (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,
    /// CSV file results are appended to.
    #[arg(long, short, default_value = "results.csv")]
    output: PathBuf,
    /// JSON file with algorithm settings.
    #[arg(long, value_name = "path")]
    config: Option<PathBuf>,
    /// Base seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct SolveArgs {
    /// Algorithms to run; all of them when omitted.
    #[arg(long = "algorithm", short, value_enum)]
    algorithms: Vec<AlgorithmKind>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Debug, Args)]
struct SeededArgs {
    /// Algorithm whose tours seed the GA.
    #[arg(long, value_enum, default_value_t = AlgorithmKind::Neh)]
    seed_algorithm: AlgorithmKind,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Debug, Args)]
struct InspectArgs {
    instance: PathBuf,
    /// Print the instance data as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("evrp_routing=info,evrp=info")),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Solve(args) => solve(args),
        Command::Seeded(args) => seeded(args),
        Command::Inspect(args) => inspect(&args),
    }
}

/// Loaded configuration plus the output file for one solving subcommand.
struct Session {
    config: SolverConfig,
    writer: ResultWriter,
}

impl Session {
    fn open(args: &RunArgs) -> Result<Self> {
        if let Some(threads) = args.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .context("failed to configure worker threads")?;
        }
        let config = match &args.config {
            Some(path) => SolverConfig::load(path)?,
            None => SolverConfig::default(),
        };
        let writer = ResultWriter::open(&args.output)
            .with_context(|| format!("failed to open {}", args.output.display()))?;
        Ok(Self { config, writer })
    }

    /// Loads the instances that parse; the rest are logged and skipped.
    fn load(&self, paths: &[PathBuf]) -> Vec<EvrpSolver> {
        EvrpSolver::load_all(paths)
            .into_iter()
            .map(|solver| solver.with_config(self.config.clone()))
            .collect()
    }
}

fn solve(args: SolveArgs) -> Result<()> {
    let session = Session::open(&args.run)?;
    let kinds = if args.algorithms.is_empty() {
        AlgorithmKind::ALL.to_vec()
    } else {
        args.algorithms
    };

    for (index, solver) in session.load(&args.run.instances).into_iter().enumerate() {
        let seed = args.run.seed.map(|s| s.wrapping_add((index * 1_000_000) as u64));
        for (kind, outcome) in solver.solve_standard(&kinds, args.run.runs, seed) {
            match outcome {
                Ok(result) => session
                    .writer
                    .write(solver.name(), &result)
                    .with_context(|| format!("failed to write {}", session.writer.path().display()))?,
                Err(err) => error!(instance = solver.name(), algorithm = %kind, "run failed: {err}"),
            }
        }
    }
    Ok(())
}

fn seeded(args: SeededArgs) -> Result<()> {
    let session = Session::open(&args.run)?;

    for (index, solver) in session.load(&args.run.instances).into_iter().enumerate() {
        for run in 0..args.run.runs {
            let mut rng = run_rng(args.run.seed, (index * args.run.runs + run) as u64);
            match solver.solve_seeded(args.seed_algorithm, &mut rng) {
                Ok(outcome) => {
                    for result in [&outcome.seed, &outcome.genetic] {
                        session
                            .writer
                            .write(solver.name(), result)
                            .with_context(|| {
                                format!("failed to write {}", session.writer.path().display())
                            })?;
                    }
                    info!(
                        instance = solver.name(),
                        seed_distance = outcome.seed.distance,
                        genetic_distance = outcome.genetic.distance,
                        "{}",
                        TourDisplay(&outcome.genetic.solution_encoded)
                    );
                }
                Err(err) => error!(instance = solver.name(), "seeded run failed: {err}"),
            }
        }
    }
    Ok(())
}

fn inspect(args: &InspectArgs) -> Result<()> {
    let instance = evrp_routing::instance::load(&args.instance)
        .with_context(|| format!("failed to load {}", args.instance.display()))?;
    let problem = &instance.problem;

    if args.json {
        let json = serde_json::to_string_pretty(&problem.data()).context("failed to encode instance")?;
        println!("{json}");
        return Ok(());
    }

    let vehicle = problem.vehicle();
    println!("instance:          {}", instance.name);
    println!("nodes:             {}", problem.num_nodes());
    println!("chargers:          {}", problem.chargers().len());
    println!("customers:         {}", problem.num_customers());
    println!("total demand:      {}", problem.total_demand());
    println!("load capacity:     {}", vehicle.load_capacity());
    println!("battery capacity:  {}", vehicle.battery_capacity());
    println!("consumption rate:  {}", vehicle.battery_consumption_rate());
    println!("min subtours:      {}", problem.minimum_subtours());
    Ok(())
}
