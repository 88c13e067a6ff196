//! Running algorithms on a problem instance.
//!
//! [`EvrpSolver`] owns one instance and turns algorithm runs into
//! [`OptimizationResult`]s: it times the run, checks that the returned tour is
//! a permutation of the customers and decodes it into the driven route.

mod output;

use std::path::Path;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::algorithms::{AlgorithmKind, GeneticAlgorithm, Optimizer};
use crate::config::SolverConfig;
use crate::instance::{self, Instance, InstanceError};
use crate::models::{OptimizationResult, ProblemDefinition};
use crate::simulation::Vehicle;
use crate::tour::{self, TourDisplay, TourError};

pub use output::{format_record, ResultWriter};

/// Errors raised by a solver run.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error(transparent)]
    Instance(#[from] InstanceError),
    /// The algorithm finished without evaluating any tour.
    #[error("{algorithm} produced no solution")]
    NoSolution { algorithm: String },
    /// The algorithm returned something other than a customer permutation.
    #[error("{algorithm} produced an invalid tour: {source}")]
    InvalidTour {
        algorithm: String,
        #[source]
        source: TourError,
    },
}

/// Result of a seeded run: the seeding algorithm's own result and the
/// genetic algorithm started from its tours.
#[derive(Debug, Clone)]
pub struct SeededOutcome {
    pub seed: OptimizationResult,
    pub genetic: OptimizationResult,
}

/// Solves one instance with any of the available algorithms.
#[derive(Debug, Clone)]
pub struct EvrpSolver {
    name: String,
    problem: ProblemDefinition,
    config: SolverConfig,
}

impl EvrpSolver {
    pub fn new(name: impl Into<String>, problem: ProblemDefinition) -> Self {
        Self {
            name: name.into(),
            problem,
            config: SolverConfig::default(),
        }
    }

    /// Loads an instance file; the solver is named after the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SolverError> {
        let Instance { name, problem } = instance::load(path)?;
        Ok(Self::new(name, problem))
    }

    /// Loads every instance in `paths`, in order. Instances that fail to load
    /// are logged and left out.
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Vec<Self> {
        paths
            .iter()
            .filter_map(|path| {
                let path = path.as_ref();
                match Self::load(path) {
                    Ok(solver) => Some(solver),
                    Err(err) => {
                        error!(path = %path.display(), "skipping instance: {err}");
                        None
                    }
                }
            })
            .collect()
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn problem(&self) -> &ProblemDefinition {
        &self.problem
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs one algorithm once.
    pub fn solve(
        &self,
        kind: AlgorithmKind,
        rng: &mut dyn RngCore,
    ) -> Result<OptimizationResult, SolverError> {
        let mut algorithm = kind.build(&self.problem, &self.config);
        self.run(algorithm.as_mut(), rng)
    }

    /// Runs every algorithm in `kinds` `runs` times, in parallel on the rayon
    /// pool. Results come back grouped by algorithm, in `kinds` order.
    ///
    /// With `seed` set, run `i` uses `StdRng::seed_from_u64(seed + i)`, so the
    /// whole batch is reproducible. See [`run_rng`].
    pub fn solve_standard(
        &self,
        kinds: &[AlgorithmKind],
        runs: usize,
        seed: Option<u64>,
    ) -> Vec<(AlgorithmKind, Result<OptimizationResult, SolverError>)> {
        let jobs: Vec<(AlgorithmKind, u64)> = kinds
            .iter()
            .flat_map(|&kind| std::iter::repeat(kind).take(runs))
            .enumerate()
            .map(|(stream, kind)| (kind, stream as u64))
            .collect();

        jobs.into_par_iter()
            .map(|(kind, stream)| {
                let mut rng = run_rng(seed, stream);
                (kind, self.solve(kind, &mut rng))
            })
            .collect()
    }

    /// Runs `seed_kind`, then a genetic algorithm whose initial population is
    /// seeded with every tour the first run collected.
    pub fn solve_seeded(
        &self,
        seed_kind: AlgorithmKind,
        rng: &mut dyn RngCore,
    ) -> Result<SeededOutcome, SolverError> {
        let mut seeder = seed_kind.build(&self.problem, &self.config);
        let seed = self.run(seeder.as_mut(), rng)?;

        let tours = seeder.found_tours().tours();
        info!(instance = %self.name, seeds = tours.len(), "seeding genetic algorithm");
        let mut genetic = GeneticAlgorithm::new(&self.problem, self.config.genetic.clone())
            .with_seed_solutions(tours);
        let genetic = self.run(&mut genetic, rng)?;

        Ok(SeededOutcome { seed, genetic })
    }

    fn run(
        &self,
        algorithm: &mut dyn Optimizer,
        rng: &mut dyn RngCore,
    ) -> Result<OptimizationResult, SolverError> {
        let algorithm_name = algorithm.name().to_string();
        info!(instance = %self.name, algorithm = %algorithm_name, "optimizing");

        let start = Instant::now();
        let best = algorithm.optimize(rng);
        let execution_time = start.elapsed().as_secs_f64();

        if best.is_unset() {
            return Err(SolverError::NoSolution {
                algorithm: algorithm_name,
            });
        }
        if let Err(source) = tour::validate_permutation(&self.problem, &best.tour) {
            return Err(SolverError::InvalidTour {
                algorithm: algorithm_name,
                source,
            });
        }

        let report = Vehicle::new(&self.problem).simulate(&best.tour);
        if !report.feasible {
            warn!(
                instance = %self.name,
                algorithm = %algorithm_name,
                "best tour is infeasible"
            );
        }
        let solution_decoded =
            tour::decode(&self.problem, &report.route).map_err(|source| SolverError::InvalidTour {
                algorithm: algorithm_name.clone(),
                source,
            })?;

        info!(
            instance = %self.name,
            algorithm = %algorithm_name,
            distance = best.distance,
            execution_time,
            subtours = report.subtours,
            time_window_violations = report.time_window_violations,
            "{}",
            TourDisplay(&best.tour)
        );

        Ok(OptimizationResult {
            algorithm_name,
            execution_time,
            distance: best.distance,
            solution_encoded: best.tour,
            solution_decoded,
            hyperparameters: algorithm.hyperparameters(),
        })
    }
}

/// Generator for run number `stream`: derived from `seed` when given,
/// otherwise seeded from the thread-local generator.
pub fn run_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}
