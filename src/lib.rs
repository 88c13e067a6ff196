//! # evrp-routing
//!
//! Electric vehicle routing: a single vehicle with limited battery and load
//! serves every customer, recharging at charging stations and restocking at
//! the depot.
//!
//! Solutions are encoded as customer permutations. A [`simulation::Vehicle`]
//! drives an encoded tour, inserting depot and charger stops as needed, and
//! reports the true distance. The optimisers in [`algorithms`] search the
//! permutation space against that distance.
//!
//! ## Modules
//!
//! - [`models`] — Nodes, vehicle parameters, problem definition, solutions, results
//! - [`distance`] — Euclidean distance matrix
//! - [`instance`] — Benchmark instance parser
//! - [`tour`] — Encoded tour helpers and validation
//! - [`simulation`] — Battery and load constrained drive simulation
//! - [`algorithms`] — Random search, genetic algorithm, NEH heuristic
//! - [`solver`] — Timed runs, parallel repetitions, CSV result log
//! - [`config`] — Algorithm settings loadable from JSON

pub mod algorithms;
pub mod config;
pub mod distance;
pub mod instance;
pub mod models;
pub mod simulation;
pub mod solver;
pub mod tour;
