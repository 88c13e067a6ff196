//! Candidate solutions and distance-ordered solution sets.

use rand::Rng;

/// Distance marking a solution that has not been evaluated.
pub const UNSET_DISTANCE: f64 = -1.0;

/// A customer permutation together with its simulated distance.
///
/// # Examples
///
/// ```
/// use evrp_routing::models::Solution;
///
/// let s = Solution::new(vec![3, 1, 2], 42.0);
/// assert_eq!(s.tour, vec![3, 1, 2]);
/// assert!(Solution::default().is_unset());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Customer indices in visiting order.
    pub tour: Vec<usize>,
    /// True driven distance of `tour`.
    pub distance: f64,
}

impl Solution {
    pub fn new(tour: Vec<usize>, distance: f64) -> Self {
        Self { tour, distance }
    }

    /// Returns `true` if this solution has never been evaluated.
    pub fn is_unset(&self) -> bool {
        self.distance == UNSET_DISTANCE
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new(Vec::new(), UNSET_DISTANCE)
    }
}

/// A multiset of solutions kept in ascending distance order.
///
/// Solutions with equal distance are all retained, in insertion order.
///
/// # Examples
///
/// ```
/// use evrp_routing::models::{Solution, SolutionSet};
///
/// let mut set = SolutionSet::new();
/// set.insert(Solution::new(vec![1, 2], 30.0));
/// set.insert(Solution::new(vec![2, 1], 10.0));
/// assert_eq!(set.best().map(|s| s.distance), Some(10.0));
/// assert_eq!(set.average_distance(), Some(20.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolutionSet {
    solutions: Vec<Solution>,
    sum_distances: f64,
}

impl SolutionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a solution, keeping the set sorted by distance.
    pub fn insert(&mut self, solution: Solution) {
        let pos = self
            .solutions
            .partition_point(|s| s.distance <= solution.distance);
        self.sum_distances += solution.distance;
        self.solutions.insert(pos, solution);
    }

    /// The solution with the smallest distance.
    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }

    /// A uniformly chosen member.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Solution> {
        if self.solutions.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.solutions.len());
        self.solutions.get(idx)
    }

    /// Smallest distance in the set.
    pub fn min_distance(&self) -> Option<f64> {
        self.best().map(|s| s.distance)
    }

    /// Mean distance over every inserted solution.
    pub fn average_distance(&self) -> Option<f64> {
        if self.solutions.is_empty() {
            None
        } else {
            Some(self.sum_distances / self.solutions.len() as f64)
        }
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Iterates in ascending distance order.
    pub fn iter(&self) -> impl Iterator<Item = &Solution> {
        self.solutions.iter()
    }

    /// The tours of every member, best first.
    pub fn tours(&self) -> Vec<Vec<usize>> {
        self.solutions.iter().map(|s| s.tour.clone()).collect()
    }
}

impl Extend<Solution> for SolutionSet {
    fn extend<T: IntoIterator<Item = Solution>>(&mut self, iter: T) {
        for s in iter {
            self.insert(s);
        }
    }
}

impl FromIterator<Solution> for SolutionSet {
    fn from_iter<T: IntoIterator<Item = Solution>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
