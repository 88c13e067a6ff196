//! NEH insertion over nearest-neighbour subtours.
//!
//! 1. Build subtours greedily from the depot, always moving to the nearest
//!    unvisited customer, and close a subtour when that customer's demand no
//!    longer fits the remaining load.
//! 2. Order each subtour NEH-style: insert its customers one by one at the
//!    position that gives the shortest simulated drive.
//! 3. Concatenate the ordered subtours into one encoded tour.
//!
//! Deterministic: the random number generator is never used.

use rand::RngCore;
use tracing::debug;

use crate::models::{ProblemDefinition, Solution, SolutionSet};
use crate::simulation::Vehicle;

use super::Optimizer;

/// Nearest-neighbour subtours ordered by NEH insertion.
pub struct NehNearestNeighbor<'a> {
    problem: &'a ProblemDefinition,
    vehicle: Vehicle<'a>,
    found: SolutionSet,
}

impl<'a> NehNearestNeighbor<'a> {
    pub fn new(problem: &'a ProblemDefinition) -> Self {
        Self {
            problem,
            vehicle: Vehicle::new(problem),
            found: SolutionSet::new(),
        }
    }

    /// Splits the customers into capacity-feasible subtours by nearest
    /// neighbour, ignoring the battery.
    ///
    /// A customer whose demand exceeds the whole load capacity gets a subtour
    /// of its own; the simulation reports such tours as infeasible.
    pub fn nearest_neighbor_subtours(&self) -> Vec<Vec<usize>> {
        let depot = self.problem.depot().index();
        let capacity = self.problem.vehicle().load_capacity();
        let distances = self.vehicle.distances();
        let demand = |index: usize| self.problem.node(index).map_or(0, |n| n.demand());

        let mut unvisited: Vec<usize> = self.problem.customers().to_vec();
        let mut subtours = Vec::new();

        while !unvisited.is_empty() {
            let mut subtour = Vec::new();
            let mut current = depot;
            let mut remaining = capacity;

            while let Some(nearest) = distances.nearest_neighbor(current, &unvisited) {
                if demand(nearest) > remaining {
                    if subtour.is_empty() {
                        subtour.push(nearest);
                        unvisited.retain(|&c| c != nearest);
                    }
                    break;
                }
                remaining -= demand(nearest);
                subtour.push(nearest);
                unvisited.retain(|&c| c != nearest);
                current = nearest;
            }
            subtours.push(subtour);
        }
        subtours
    }

    /// Orders `subtour` by NEH insertion, scoring each partial order with a
    /// full drive simulation.
    pub fn neh_order(&mut self, subtour: &[usize]) -> Vec<usize> {
        let Some((&first, rest)) = subtour.split_first() else {
            return Vec::new();
        };

        let mut partial = vec![first];
        for &customer in rest {
            let mut best: Option<(f64, Vec<usize>)> = None;
            for position in 0..=partial.len() {
                let mut candidate = partial.clone();
                candidate.insert(position, customer);
                let distance = self.vehicle.distance(&candidate);
                if best.as_ref().map_or(true, |(d, _)| distance < *d) {
                    best = Some((distance, candidate));
                }
            }
            if let Some((_, order)) = best {
                partial = order;
            }
        }
        partial
    }
}

impl Optimizer for NehNearestNeighbor<'_> {
    fn name(&self) -> &str {
        "NEH with Nearest Neighbor Subtours"
    }

    fn hyperparameters(&self) -> Vec<String> {
        Vec::new()
    }

    fn optimize(&mut self, _rng: &mut dyn RngCore) -> Solution {
        let subtours = self.nearest_neighbor_subtours();
        debug!(subtours = subtours.len(), "nearest neighbour subtours");

        let mut tour = Vec::with_capacity(self.problem.num_customers());
        for subtour in &subtours {
            tour.extend(self.neh_order(subtour));
        }

        let distance = self.vehicle.distance(&tour);
        let solution = Solution::new(tour, distance);
        self.found = SolutionSet::new();
        self.found.insert(solution.clone());
        solution
    }

    fn found_tours(&self) -> &SolutionSet {
        &self.found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::clustered_problem;
    use crate::models::{Node, VehicleParameters};
    use crate::tour::validate_permutation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn line_problem(capacity: i32) -> ProblemDefinition {
        let nodes = vec![
            Node::depot(0, 0.0, 0.0),
            Node::charger(1, 0.0, 0.0),
            Node::customer(2, 3.0, 0.0, 10),
            Node::customer(3, 1.0, 0.0, 10),
            Node::customer(4, 2.0, 0.0, 10),
        ];
        ProblemDefinition::new(nodes, VehicleParameters::new(capacity, 100.0, 1.0)).expect("valid")
    }

    #[test]
    fn test_subtours_follow_nearest_neighbor() {
        let problem = line_problem(100);
        let neh = NehNearestNeighbor::new(&problem);
        assert_eq!(neh.nearest_neighbor_subtours(), vec![vec![3, 4, 2]]);
    }

    #[test]
    fn test_subtours_respect_capacity() {
        let problem = line_problem(20);
        let neh = NehNearestNeighbor::new(&problem);
        assert_eq!(neh.nearest_neighbor_subtours(), vec![vec![3, 4], vec![2]]);
    }

    #[test]
    fn test_oversized_demand_gets_own_subtour() {
        let problem = line_problem(5);
        let neh = NehNearestNeighbor::new(&problem);
        assert_eq!(
            neh.nearest_neighbor_subtours(),
            vec![vec![3], vec![4], vec![2]]
        );
    }

    #[test]
    fn test_neh_order_finds_line_order() {
        let problem = line_problem(100);
        let mut neh = NehNearestNeighbor::new(&problem);
        let order = neh.neh_order(&[2, 3, 4]);
        let mut vehicle = Vehicle::new(&problem);
        assert!((vehicle.distance(&order) - 6.0).abs() < 1e-9);
        assert!(neh.neh_order(&[]).is_empty());
        assert_eq!(neh.neh_order(&[4]), vec![4]);
    }

    #[test]
    fn test_optimize_clustered() {
        let problem = clustered_problem();
        let mut neh = NehNearestNeighbor::new(&problem);
        let best = neh.optimize(&mut StdRng::seed_from_u64(0));

        assert!(validate_permutation(&problem, &best.tour).is_ok());
        assert_eq!(neh.found_tours().len(), 1);
        assert!(neh.hyperparameters().is_empty());
        // Each cluster is one subtour of three customers.
        let first_cluster: Vec<usize> = best.tour[..3].to_vec();
        assert!(first_cluster.iter().all(|&c| c <= 6) || first_cluster.iter().all(|&c| c >= 7));
    }

    #[test]
    fn test_deterministic() {
        let problem = clustered_problem();
        let mut a = NehNearestNeighbor::new(&problem);
        let mut b = NehNearestNeighbor::new(&problem);
        assert_eq!(
            a.optimize(&mut StdRng::seed_from_u64(1)),
            b.optimize(&mut StdRng::seed_from_u64(2))
        );
    }
}
