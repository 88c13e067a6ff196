//! Output record of a single optimisation run.

use serde::{Deserialize, Serialize};

use super::Node;

/// What one algorithm run produced.
///
/// `solution_encoded` is the customer permutation the algorithm optimised;
/// `solution_decoded` is the route the vehicle actually drives for it, with
/// depot and charger stops inserted by the simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Display name of the algorithm.
    pub algorithm_name: String,
    /// Wall-clock optimisation time in seconds.
    pub execution_time: f64,
    /// Simulated distance of the best tour.
    pub distance: f64,
    /// Best customer permutation.
    pub solution_encoded: Vec<usize>,
    /// Full driven route, depot first and last.
    pub solution_decoded: Vec<Node>,
    /// Algorithm settings as `name=value` strings.
    pub hyperparameters: Vec<String>,
}

impl OptimizationResult {
    /// Indices of the decoded route.
    pub fn decoded_indices(&self) -> Vec<usize> {
        self.solution_decoded.iter().map(Node::index).collect()
    }

    /// Number of depot-to-depot subtours in the decoded route.
    pub fn num_subtours(&self) -> usize {
        self.solution_decoded
            .iter()
            .skip(1)
            .filter(|n| n.kind() == super::NodeKind::Depot)
            .count()
    }
}
