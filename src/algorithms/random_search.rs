//! Random search over customer permutations.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ProblemDefinition, Solution, SolutionSet};
use crate::simulation::Vehicle;

use super::Optimizer;

/// Settings for [`RandomSearch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSearchConfig {
    /// Number of generations. Each one keeps its best sample.
    pub generations: usize,
    /// Random tours evaluated per generation.
    pub samples_per_generation: usize,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            samples_per_generation: 10_000,
        }
    }
}

impl RandomSearchConfig {
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_samples_per_generation(mut self, samples: usize) -> Self {
        self.samples_per_generation = samples;
        self
    }
}

/// Samples random permutations and keeps the shortest of each generation.
///
/// The per-generation winners form [`found_tours`](Optimizer::found_tours),
/// so the set holds a spread of decent tours rather than one lucky sample.
pub struct RandomSearch<'a> {
    problem: &'a ProblemDefinition,
    vehicle: Vehicle<'a>,
    config: RandomSearchConfig,
    found: SolutionSet,
}

impl<'a> RandomSearch<'a> {
    pub fn new(problem: &'a ProblemDefinition, config: RandomSearchConfig) -> Self {
        Self {
            problem,
            vehicle: Vehicle::new(problem),
            config,
            found: SolutionSet::new(),
        }
    }

    pub fn config(&self) -> &RandomSearchConfig {
        &self.config
    }
}

impl Optimizer for RandomSearch<'_> {
    fn name(&self) -> &str {
        "Random Search"
    }

    fn hyperparameters(&self) -> Vec<String> {
        vec![
            format!("generations={}", self.config.generations),
            format!("samples_per_generation={}", self.config.samples_per_generation),
        ]
    }

    fn optimize(&mut self, rng: &mut dyn RngCore) -> Solution {
        self.found = SolutionSet::new();

        for generation in 0..self.config.generations {
            let mut generation_best: Option<Solution> = None;
            for _ in 0..self.config.samples_per_generation {
                let tour = self.problem.random_tour(rng);
                let distance = self.vehicle.distance(&tour);
                if generation_best
                    .as_ref()
                    .map_or(true, |best| distance < best.distance)
                {
                    generation_best = Some(Solution::new(tour, distance));
                }
            }

            if let Some(best) = generation_best {
                debug!(generation, distance = best.distance, "random search generation");
                self.found.insert(best);
            }
        }

        self.found.best().cloned().unwrap_or_default()
    }

    fn found_tours(&self) -> &SolutionSet {
        &self.found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::clustered_problem;
    use crate::tour::validate_permutation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults() {
        let config = RandomSearchConfig::default();
        assert_eq!(config.generations, 100);
        assert_eq!(config.samples_per_generation, 10_000);
    }

    #[test]
    fn test_one_survivor_per_generation() {
        let problem = clustered_problem();
        let config = RandomSearchConfig::default()
            .with_generations(7)
            .with_samples_per_generation(20);
        let mut search = RandomSearch::new(&problem, config);
        let mut rng = StdRng::seed_from_u64(11);

        let best = search.optimize(&mut rng);
        assert_eq!(search.found_tours().len(), 7);
        assert!(validate_permutation(&problem, &best.tour).is_ok());
        assert_eq!(search.found_tours().min_distance(), Some(best.distance));
    }

    #[test]
    fn test_reported_distance_matches_simulation() {
        let problem = clustered_problem();
        let config = RandomSearchConfig::default()
            .with_generations(2)
            .with_samples_per_generation(5);
        let mut search = RandomSearch::new(&problem, config);
        let best = search.optimize(&mut StdRng::seed_from_u64(3));

        let mut vehicle = Vehicle::new(&problem);
        assert!((vehicle.distance(&best.tour) - best.distance).abs() < 1e-9);
    }

    #[test]
    fn test_zero_budget_returns_unset() {
        let problem = clustered_problem();
        let config = RandomSearchConfig::default().with_generations(0);
        let mut search = RandomSearch::new(&problem, config);
        assert!(search.optimize(&mut StdRng::seed_from_u64(1)).is_unset());
        assert!(search.found_tours().is_empty());
    }

    #[test]
    fn test_hyperparameters() {
        let problem = clustered_problem();
        let search = RandomSearch::new(&problem, RandomSearchConfig::default());
        assert_eq!(
            search.hyperparameters(),
            vec!["generations=100", "samples_per_generation=10000"]
        );
    }
}
