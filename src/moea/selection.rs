//! Parent selection strategies.
//!
//! Parent selection picks the individuals that variation operators act on.
//! Survivor selection is separate and always uses the NSGA-II ranker.
//!
//! # References
//!
//! - Deb et al. (2002), crowded-comparison operator
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Individual;
use rand::Rng;
use std::cmp::Ordering;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_moea::moea::ParentSelection;
///
/// // Uniform draw, as in the classic mu+lambda variation step
/// let sel = ParentSelection::Uniform;
///
/// // Binary tournament on (rank, crowding distance)
/// let sel = ParentSelection::Tournament(2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParentSelection {
    /// Every individual is equally likely to be drawn.
    #[default]
    Uniform,

    /// Draw `k` individuals, keep the best under the crowded comparison:
    /// lower rank wins, then larger crowding distance.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),
}

impl ParentSelection {
    /// Selects a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<G, R: Rng>(&self, population: &[Individual<G>], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            ParentSelection::Uniform => rng.random_range(0..population.len()),
            ParentSelection::Tournament(k) => tournament(population, *k, rng),
        }
    }

    /// Selects two parent indices, distinct whenever the population has
    /// at least two members.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select_pair<G, R: Rng>(&self, population: &[Individual<G>], rng: &mut R) -> (usize, usize) {
        let first = self.select(population, rng);
        if population.len() < 2 {
            return (first, first);
        }
        let mut second = self.select(population, rng);
        // a tournament may keep returning the same champion
        let mut attempts = 0;
        while second == first && attempts < 8 {
            second = self.select(population, rng);
            attempts += 1;
        }
        if second == first {
            second = (first + rng.random_range(1..population.len())) % population.len();
        }
        (first, second)
    }
}

/// Crowded comparison: `Less` means `a` is better.
pub(crate) fn crowded_cmp<G>(a: &Individual<G>, b: &Individual<G>) -> Ordering {
    a.rank
        .cmp(&b.rank)
        .then_with(|| b.crowding_distance.total_cmp(&a.crowding_distance))
}

fn tournament<G, R: Rng>(population: &[Individual<G>], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if crowded_cmp(&population[idx], &population[best_idx]) == Ordering::Less {
            best_idx = idx;
        }
    }
    best_idx
}
