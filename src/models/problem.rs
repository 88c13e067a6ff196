//! Problem definition: the graph plus the vehicle parameters.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Node, NodeKind, VehicleParameters};

/// Errors raised while assembling a [`ProblemDefinition`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProblemError {
    /// The node list holds no depot.
    #[error("problem has no depot node")]
    MissingDepot,
    /// More than one depot was declared.
    #[error("problem declares {count} depot nodes, expected exactly one")]
    MultipleDepots { count: usize },
    /// The depot must be the first node.
    #[error("depot must have index 0, found index {index}")]
    DepotNotFirst { index: usize },
    /// Node indices must be `0..n` in order.
    #[error("node at position {position} has index {index}")]
    IndexMismatch { position: usize, index: usize },
}

/// Flat view of an instance: every node plus the vehicle limits.
///
/// This is the payload handed to anything that needs the raw instance data
/// without the convenience partitioning of [`ProblemDefinition`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvrpData {
    /// Every node, indexed by position (depot first).
    pub nodes: Vec<Node>,
    /// Battery capacity.
    pub fuel_capacity: f64,
    /// Vehicle inventory capacity.
    pub load_capacity: i32,
    /// Battery drained per unit of distance.
    pub fuel_consumption_rate: f64,
    /// Index of the first customer node, or `nodes.len()` if there is none.
    pub customer_start_index: usize,
}

/// An EVRP instance with its nodes partitioned by role.
///
/// # Examples
///
/// ```
/// use evrp_routing::models::{Node, ProblemDefinition, VehicleParameters};
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::charger(1, 5.0, 0.0),
///     Node::customer(2, 3.0, 4.0, 10),
///     Node::customer(3, 6.0, 8.0, 20),
/// ];
/// let problem = ProblemDefinition::new(nodes, VehicleParameters::new(20, 100.0, 1.0)).unwrap();
/// assert_eq!(problem.customers().len(), 2);
/// assert_eq!(problem.customer_start_index(), 2);
/// assert_eq!(problem.minimum_subtours(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ProblemDefinition {
    nodes: Vec<Node>,
    chargers: Vec<usize>,
    customers: Vec<usize>,
    vehicle: VehicleParameters,
}

impl ProblemDefinition {
    /// Builds a problem from nodes listed in index order, depot first.
    pub fn new(nodes: Vec<Node>, vehicle: VehicleParameters) -> Result<Self, ProblemError> {
        for (position, node) in nodes.iter().enumerate() {
            if node.index() != position {
                return Err(ProblemError::IndexMismatch {
                    position,
                    index: node.index(),
                });
            }
        }

        let depots: Vec<usize> = nodes
            .iter()
            .filter(|n| n.kind() == NodeKind::Depot)
            .map(Node::index)
            .collect();
        match depots.as_slice() {
            [] => return Err(ProblemError::MissingDepot),
            [0] => {}
            [index] => return Err(ProblemError::DepotNotFirst { index: *index }),
            many => return Err(ProblemError::MultipleDepots { count: many.len() }),
        }

        let chargers = nodes
            .iter()
            .filter(|n| n.is_charger())
            .map(Node::index)
            .collect();
        let customers = nodes
            .iter()
            .filter(|n| n.is_customer())
            .map(Node::index)
            .collect();

        Ok(Self {
            nodes,
            chargers,
            customers,
            vehicle,
        })
    }

    /// The depot node (always index 0).
    pub fn depot(&self) -> &Node {
        &self.nodes[0]
    }

    /// All nodes, indexed by position.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the node with the given index, if any.
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Indices of the charging stations.
    pub fn chargers(&self) -> &[usize] {
        &self.chargers
    }

    /// Indices of the customers, in instance order.
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    pub fn vehicle(&self) -> &VehicleParameters {
        &self.vehicle
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_customers(&self) -> usize {
        self.customers.len()
    }

    /// Index of the first customer node. Equal to the node count when the
    /// problem has no customers.
    pub fn customer_start_index(&self) -> usize {
        self.customers.first().copied().unwrap_or(self.nodes.len())
    }

    /// Sum of all customer demands.
    pub fn total_demand(&self) -> i64 {
        self.customers
            .iter()
            .map(|&c| i64::from(self.nodes[c].demand()))
            .sum()
    }

    /// Lower bound on the number of subtours when inventory is the only
    /// constraint: `ceil(total demand / load capacity)`.
    pub fn minimum_subtours(&self) -> usize {
        let capacity = i64::from(self.vehicle.load_capacity());
        if capacity <= 0 {
            return 0;
        }
        let demand = self.total_demand();
        ((demand + capacity - 1) / capacity).max(0) as usize
    }

    /// A uniformly shuffled permutation of the customer indices.
    pub fn random_tour<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut tour = self.customers.clone();
        tour.shuffle(rng);
        tour
    }

    /// Flat view of this problem.
    pub fn data(&self) -> EvrpData {
        EvrpData {
            nodes: self.nodes.clone(),
            fuel_capacity: self.vehicle.battery_capacity(),
            load_capacity: self.vehicle.load_capacity(),
            fuel_consumption_rate: self.vehicle.battery_consumption_rate(),
            customer_start_index: self.customer_start_index(),
        }
    }
}
