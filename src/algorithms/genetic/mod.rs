//! Genetic algorithm over customer permutations.
//!
//! Each generation is rebuilt from scratch: two parents are picked by
//! tournament, combined by [`prefix_crossover`] and occasionally perturbed by
//! [`swap_mutation`]. Fitness is the simulated route length, so infeasible
//! tours carry the impossible-route penalty and die out quickly.
//!
//! The initial population can be seeded with tours found by another
//! algorithm (see [`GeneticAlgorithm::with_seed_solutions`]).

mod operators;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{ProblemDefinition, Solution, SolutionSet};
use crate::simulation::Vehicle;
use crate::tour::validate_permutation;

use super::Optimizer;

pub use operators::{prefix_crossover, prefix_crossover_at, swap_mutation, tournament_select};

/// Settings for [`GeneticAlgorithm`].
///
/// # Examples
///
/// ```
/// use evrp_routing::algorithms::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_max_generations(200)
///     .with_mutation_rate(0.1);
/// assert_eq!(config.tournament_size, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    pub population_size: usize,
    pub max_generations: usize,
    /// Members drawn per tournament. Values below 2 are treated as 2.
    pub tournament_size: usize,
    /// Probability that a child is mutated, in `[0, 1]`.
    pub mutation_rate: f64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            tournament_size: 5,
            mutation_rate: 0.2,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }
}

/// Genetic algorithm with tournament selection, prefix crossover and swap
/// mutation.
pub struct GeneticAlgorithm<'a> {
    problem: &'a ProblemDefinition,
    vehicle: Vehicle<'a>,
    config: GaConfig,
    seeds: Vec<Vec<usize>>,
    /// Seeds that made it into the last initial population.
    placed_seeds: usize,
    found: SolutionSet,
}

impl<'a> GeneticAlgorithm<'a> {
    pub fn new(problem: &'a ProblemDefinition, config: GaConfig) -> Self {
        Self {
            problem,
            vehicle: Vehicle::new(problem),
            config,
            seeds: Vec::new(),
            placed_seeds: 0,
            found: SolutionSet::new(),
        }
    }

    /// Places `tours` in the initial population ahead of random members.
    ///
    /// Tours that are not permutations of the customers are dropped with a
    /// warning. At most `population_size` seeds are used. The
    /// `seed_solutions` hyperparameter reports how many were placed in the
    /// last run.
    pub fn with_seed_solutions(mut self, tours: Vec<Vec<usize>>) -> Self {
        self.seeds = tours;
        self
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    fn evaluate(&mut self, tour: Vec<usize>) -> Solution {
        let distance = self.vehicle.distance(&tour);
        Solution::new(tour, distance)
    }

    fn initial_population(&mut self, rng: &mut dyn RngCore) -> Vec<Solution> {
        let size = self.config.population_size.max(1);
        let seeds = std::mem::take(&mut self.seeds);

        let mut population = Vec::with_capacity(size);
        for tour in &seeds {
            if population.len() == size {
                break;
            }
            match validate_permutation(self.problem, tour) {
                Ok(()) => population.push(self.evaluate(tour.clone())),
                Err(err) => warn!(%err, "dropping invalid seed tour"),
            }
        }
        let seeded = population.len();
        self.placed_seeds = seeded;
        self.seeds = seeds;

        while population.len() < size {
            let tour = self.problem.random_tour(rng);
            population.push(self.evaluate(tour));
        }
        debug!(size, seeded, "initial population");
        population
    }

    fn next_generation(&mut self, population: &[Solution], rng: &mut dyn RngCore) -> Vec<Solution> {
        let rate = self.config.mutation_rate.clamp(0.0, 1.0);
        let tournament = self.config.tournament_size;
        (0..population.len())
            .map(|_| {
                let first = tournament_select(population, tournament, rng);
                let second = tournament_select(population, tournament, rng);
                let mut child = prefix_crossover(&first.tour, &second.tour, rng);
                if rng.random::<f64>() < rate {
                    swap_mutation(&mut child, rng);
                }
                self.evaluate(child)
            })
            .collect()
    }
}

impl Optimizer for GeneticAlgorithm<'_> {
    fn name(&self) -> &str {
        "Genetic Algorithm"
    }

    fn hyperparameters(&self) -> Vec<String> {
        vec![
            format!("population_size={}", self.config.population_size),
            format!("max_generations={}", self.config.max_generations),
            format!("tournament_size={}", self.config.tournament_size.max(2)),
            format!("mutation_rate={}", self.config.mutation_rate),
            format!("seed_solutions={}", self.placed_seeds),
        ]
    }

    fn optimize(&mut self, rng: &mut dyn RngCore) -> Solution {
        let mut population = self.initial_population(rng);
        let mut best = population
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .cloned()
            .unwrap_or_default();

        for generation in 0..self.config.max_generations {
            population = self.next_generation(&population, rng);
            if let Some(leader) = population
                .iter()
                .min_by(|a, b| a.distance.total_cmp(&b.distance))
            {
                if best.is_unset() || leader.distance < best.distance {
                    best = leader.clone();
                    debug!(generation, distance = best.distance, "new best tour");
                }
            }
        }

        // The final population plus the best tour ever seen, which generational
        // replacement may have lost.
        self.found = population.into_iter().collect();
        if !best.is_unset() && self.found.min_distance().map_or(true, |d| best.distance < d) {
            self.found.insert(best.clone());
        }
        best
    }

    fn found_tours(&self) -> &SolutionSet {
        &self.found
    }
}
