//! Tour encoding helpers.
//!
//! A tour is encoded as the customer indices in visiting order. Depot and
//! charger visits never appear in an encoded tour; the simulator inserts them.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::models::{Node, ProblemDefinition};

/// Errors raised when a tour does not describe a valid customer permutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// An index does not name any node.
    #[error("node index {index} does not exist")]
    UnknownNode { index: usize },
    /// An index names the depot or a charger.
    #[error("node {index} is not a customer")]
    NotACustomer { index: usize },
    /// A customer appears more than once.
    #[error("customer {index} is visited {count} times")]
    Duplicate { index: usize, count: usize },
    /// A customer never appears.
    #[error("customer {index} is never visited")]
    Missing { index: usize },
}

/// A random permutation of `count` consecutive customer indices starting at
/// `customer_start`.
///
/// # Examples
///
/// ```
/// use evrp_routing::tour::random_tour;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let mut tour = random_tour(4, 3, &mut rng);
/// tour.sort();
/// assert_eq!(tour, vec![4, 5, 6]);
/// ```
pub fn random_tour<R: Rng + ?Sized>(customer_start: usize, count: usize, rng: &mut R) -> Vec<usize> {
    let mut tour: Vec<usize> = (customer_start..customer_start + count).collect();
    tour.shuffle(rng);
    tour
}

/// Index encoding of a node sequence.
pub fn encode(nodes: &[Node]) -> Vec<usize> {
    nodes.iter().map(Node::index).collect()
}

/// Node decoding of an index sequence.
pub fn decode(problem: &ProblemDefinition, indices: &[usize]) -> Result<Vec<Node>, TourError> {
    indices
        .iter()
        .map(|&index| {
            problem
                .node(index)
                .cloned()
                .ok_or(TourError::UnknownNode { index })
        })
        .collect()
}

/// Checks that `tour` visits every customer of `problem` exactly once and
/// nothing else.
///
/// # Examples
///
/// ```
/// use evrp_routing::models::{Node, ProblemDefinition, VehicleParameters};
/// use evrp_routing::tour::{validate_permutation, TourError};
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::customer(1, 1.0, 0.0, 1),
///     Node::customer(2, 2.0, 0.0, 1),
/// ];
/// let p = ProblemDefinition::new(nodes, VehicleParameters::new(10, 10.0, 1.0)).unwrap();
/// assert!(validate_permutation(&p, &[2, 1]).is_ok());
/// assert_eq!(validate_permutation(&p, &[2]), Err(TourError::Missing { index: 1 }));
/// ```
pub fn validate_permutation(problem: &ProblemDefinition, tour: &[usize]) -> Result<(), TourError> {
    let mut counts = vec![0usize; problem.num_nodes()];
    for &index in tour {
        let node = problem.node(index).ok_or(TourError::UnknownNode { index })?;
        if !node.is_customer() {
            return Err(TourError::NotACustomer { index });
        }
        counts[index] += 1;
    }

    for &customer in problem.customers() {
        match counts[customer] {
            0 => return Err(TourError::Missing { index: customer }),
            1 => {}
            count => {
                return Err(TourError::Duplicate {
                    index: customer,
                    count,
                })
            }
        }
    }
    Ok(())
}

/// Formats an encoded tour as `Tour: 3 1 2`.
pub struct TourDisplay<'a>(pub &'a [usize]);

impl fmt::Display for TourDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tour:")?;
        for index in self.0 {
            write!(f, " {index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleParameters;

    fn problem() -> ProblemDefinition {
        let nodes = vec![
            Node::depot(0, 0.0, 0.0),
            Node::charger(1, 5.0, 5.0),
            Node::customer(2, 1.0, 0.0, 5),
            Node::customer(3, 2.0, 0.0, 5),
            Node::customer(4, 3.0, 0.0, 5),
        ];
        ProblemDefinition::new(nodes, VehicleParameters::new(10, 100.0, 1.0)).expect("valid")
    }

    #[test]
    fn test_encode_decode() {
        let p = problem();
        let nodes = decode(&p, &[4, 0, 1]).expect("known nodes");
        assert_eq!(nodes[0].index(), 4);
        assert!(nodes[2].is_charger());
        assert_eq!(encode(&nodes), vec![4, 0, 1]);
    }

    #[test]
    fn test_decode_unknown() {
        let p = problem();
        assert_eq!(
            decode(&p, &[2, 9]).unwrap_err(),
            TourError::UnknownNode { index: 9 }
        );
    }

    #[test]
    fn test_validate_rejects_non_customers() {
        let p = problem();
        assert_eq!(
            validate_permutation(&p, &[2, 1, 3, 4]),
            Err(TourError::NotACustomer { index: 1 })
        );
        assert_eq!(
            validate_permutation(&p, &[2, 3, 4, 0]),
            Err(TourError::NotACustomer { index: 0 })
        );
    }

    #[test]
    fn test_validate_duplicates() {
        let p = problem();
        assert_eq!(
            validate_permutation(&p, &[2, 3, 3, 4]),
            Err(TourError::Duplicate { index: 3, count: 2 })
        );
    }

    #[test]
    fn test_validate_ok() {
        let p = problem();
        assert!(validate_permutation(&p, &[4, 2, 3]).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(TourDisplay(&[3, 1, 2]).to_string(), "Tour: 3 1 2");
        assert_eq!(TourDisplay(&[]).to_string(), "Tour:");
    }
}
