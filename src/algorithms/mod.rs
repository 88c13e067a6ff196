//! Optimisation algorithms over encoded tours.
//!
//! - [`RandomSearch`] — best-of-N random permutations, one survivor per generation
//! - [`GeneticAlgorithm`] — tournament selection, prefix crossover, swap mutation
//! - [`NehNearestNeighbor`] — nearest-neighbour subtours ordered by NEH insertion
//!
//! Every algorithm scores a tour with [`Vehicle::distance`](crate::simulation::Vehicle::distance),
//! so battery and load constraints are handled in one place.

pub mod genetic;
mod neh;
mod random_search;

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::models::{ProblemDefinition, Solution, SolutionSet};

pub use genetic::{GaConfig, GeneticAlgorithm};
pub use neh::NehNearestNeighbor;
pub use random_search::{RandomSearch, RandomSearchConfig};

/// A tour optimiser.
pub trait Optimizer {
    /// Display name used in logs and result files.
    fn name(&self) -> &str;

    /// Settings as `name=value` strings.
    fn hyperparameters(&self) -> Vec<String>;

    /// Runs the algorithm and returns the best solution it found.
    ///
    /// Returns an unset [`Solution`] if the algorithm evaluated nothing.
    fn optimize(&mut self, rng: &mut dyn RngCore) -> Solution;

    /// Good tours collected by the last run, usable as seeds for another
    /// algorithm.
    fn found_tours(&self) -> &SolutionSet;
}

/// The available algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
    /// Genetic algorithm.
    #[value(name = "ga")]
    Genetic,
    /// Random search.
    #[value(name = "random")]
    RandomSearch,
    /// NEH insertion over nearest-neighbour subtours.
    #[value(name = "neh")]
    Neh,
}

impl AlgorithmKind {
    /// Every algorithm, in reporting order.
    pub const ALL: [AlgorithmKind; 3] = [Self::Genetic, Self::RandomSearch, Self::Neh];

    /// Builds the algorithm for `problem` using the matching section of `config`.
    pub fn build<'a>(
        &self,
        problem: &'a ProblemDefinition,
        config: &SolverConfig,
    ) -> Box<dyn Optimizer + Send + 'a> {
        match self {
            Self::Genetic => Box::new(GeneticAlgorithm::new(problem, config.genetic.clone())),
            Self::RandomSearch => {
                Box::new(RandomSearch::new(problem, config.random_search.clone()))
            }
            Self::Neh => Box::new(NehNearestNeighbor::new(problem)),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Genetic => "ga",
            Self::RandomSearch => "random",
            Self::Neh => "neh",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ga" | "genetic" => Ok(Self::Genetic),
            "random" | "random-search" => Ok(Self::RandomSearch),
            "neh" => Ok(Self::Neh),
            other => Err(format!("unknown algorithm: {other}")),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("ga".parse::<AlgorithmKind>(), Ok(AlgorithmKind::Genetic));
        assert_eq!("Random".parse::<AlgorithmKind>(), Ok(AlgorithmKind::RandomSearch));
        assert_eq!("neh".parse::<AlgorithmKind>(), Ok(AlgorithmKind::Neh));
        assert!("aco".parse::<AlgorithmKind>().is_err());
        assert_eq!(AlgorithmKind::Neh.to_string(), "neh");
    }

    #[test]
    fn test_build_every_kind() {
        let problem = test_support::clustered_problem();
        let config = SolverConfig::default()
            .with_genetic(GaConfig::default().with_population_size(10).with_max_generations(5))
            .with_random_search(
                RandomSearchConfig::default()
                    .with_generations(3)
                    .with_samples_per_generation(10),
            );
        let mut rng = StdRng::seed_from_u64(5);
        for kind in AlgorithmKind::ALL {
            let mut alg = kind.build(&problem, &config);
            let best = alg.optimize(&mut rng);
            assert!(!best.is_unset(), "{kind} returned nothing");
            assert_eq!(best.tour.len(), 6);
            assert!(!alg.found_tours().is_empty());
        }
    }
}
