//! Dense distance matrix over every node of an instance.

use crate::models::Node;

/// A dense n×n Euclidean distance matrix stored in row-major order.
///
/// Rows and columns are node indices, so the depot is row 0 and chargers and
/// customers follow in instance order.
///
/// # Examples
///
/// ```
/// use evrp_routing::models::Node;
/// use evrp_routing::distance::DistanceMatrix;
///
/// let nodes = vec![
///     Node::depot(0, 0.0, 0.0),
///     Node::charger(1, 0.0, 8.0),
///     Node::customer(2, 3.0, 4.0, 10),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// assert!((dm.get(0, 2) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes pairwise Euclidean distances between nodes.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let size = nodes.len();
        let mut data = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let d = nodes[i].distance_to(&nodes[j]);
                data[i * size + j] = d;
                data[j * size + i] = d;
            }
        }
        Self { data, size }
    }

    /// Distance from node `from` to node `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of nodes covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total distance of driving `route` stop by stop.
    pub fn path_length(&self, route: &[usize]) -> f64 {
        route.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }

    /// The candidate closest to `from`. Ties keep the earliest candidate.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by(|&a, &b| self.get(from, a).total_cmp(&self.get(from, b)))
    }
}
