//! Permutation operators for the genetic algorithm.
//!
//! All operators take encoded tours and keep them permutations: no customer
//! is lost or duplicated.

use std::collections::HashSet;

use rand::Rng;

use crate::models::Solution;

/// Tournament selection: draws `size` random members (with replacement) and
/// returns the shortest.
///
/// `size` is raised to 2 so there is always a contest.
///
/// # Panics
///
/// Panics if `population` is empty.
pub fn tournament_select<'p, R: Rng + ?Sized>(
    population: &'p [Solution],
    size: usize,
    rng: &mut R,
) -> &'p Solution {
    let mut best = &population[rng.random_range(0..population.len())];
    for _ in 1..size.max(2) {
        let contender = &population[rng.random_range(0..population.len())];
        if contender.distance < best.distance {
            best = contender;
        }
    }
    best
}

/// Prefix crossover: copies a random-length prefix of `first`, then appends
/// the customers of `second` not yet placed, in `second`'s order.
///
/// # Examples
///
/// ```
/// use evrp_routing::algorithms::genetic::prefix_crossover_at;
///
/// let child = prefix_crossover_at(&[1, 2, 3, 4, 5], &[5, 4, 3, 2, 1], 2);
/// assert_eq!(child, vec![1, 2, 5, 4, 3]);
/// ```
pub fn prefix_crossover<R: Rng + ?Sized>(first: &[usize], second: &[usize], rng: &mut R) -> Vec<usize> {
    let point = rng.random_range(0..=first.len());
    prefix_crossover_at(first, second, point)
}

/// [`prefix_crossover`] with a fixed crossover point.
pub fn prefix_crossover_at(first: &[usize], second: &[usize], point: usize) -> Vec<usize> {
    let prefix = &first[..point.min(first.len())];
    let placed: HashSet<usize> = prefix.iter().copied().collect();

    let mut child = Vec::with_capacity(first.len());
    child.extend_from_slice(prefix);
    child.extend(second.iter().copied().filter(|c| !placed.contains(c)));
    child
}

/// Swaps two random positions. Tours shorter than two are left alone.
pub fn swap_mutation<R: Rng + ?Sized>(tour: &mut [usize], rng: &mut R) {
    if tour.len() < 2 {
        return;
    }
    let i = rng.random_range(0..tour.len());
    let j = rng.random_range(0..tour.len());
    tour.swap(i, j);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_crossover_extremes() {
        let a = [1, 2, 3, 4];
        let b = [4, 3, 2, 1];
        assert_eq!(prefix_crossover_at(&a, &b, 0), b.to_vec());
        assert_eq!(prefix_crossover_at(&a, &b, 4), a.to_vec());
        assert_eq!(prefix_crossover_at(&a, &b, 99), a.to_vec());
    }

    #[test]
    fn test_tournament_prefers_shorter() {
        let population = vec![
            Solution::new(vec![1, 2], 50.0),
            Solution::new(vec![2, 1], 10.0),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        // A large tournament almost surely samples the shorter tour.
        let winner = tournament_select(&population, 64, &mut rng);
        assert_eq!(winner.distance, 10.0);
    }

    #[test]
    fn test_tournament_single_member() {
        let population = vec![Solution::new(vec![1], 3.0)];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(tournament_select(&population, 0, &mut rng).tour, vec![1]);
    }

    #[test]
    fn test_mutation_short_tours() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut empty: Vec<usize> = vec![];
        swap_mutation(&mut empty, &mut rng);
        let mut one = vec![7];
        swap_mutation(&mut one, &mut rng);
        assert_eq!(one, vec![7]);
    }

    proptest! {
        #[test]
        fn crossover_keeps_permutation(n in 1usize..40, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let base: Vec<usize> = (10..10 + n).collect();
            let mut a = base.clone();
            let mut b = base.clone();
            a.shuffle(&mut rng);
            b.shuffle(&mut rng);

            let child = prefix_crossover(&a, &b, &mut rng);
            prop_assert_eq!(sorted(child), base);
        }

        #[test]
        fn mutation_keeps_permutation(n in 0usize..40, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let base: Vec<usize> = (0..n).collect();
            let mut tour = base.clone();
            tour.shuffle(&mut rng);

            swap_mutation(&mut tour, &mut rng);
            prop_assert_eq!(sorted(tour), base);
        }
    }
}
