//! Dominance ranking (NSGA-II core).
//!
//! Functions here work on **weighted** objective vectors, where every
//! value has already been multiplied by its direction weight so that
//! larger is better (see [`ObjectiveSpec::weighted`]).
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: Crowding distance assignment for diversity preservation
//! - [`select_nsga2`]: Front-wise truncation of a combined pool to `mu` survivors
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use super::types::{Individual, ObjectiveSpec};

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting.
///
/// Assigns a Pareto rank to each solution based on dominance relationships.
/// All objectives are **maximized**: pass weighted values.
///
/// Identical vectors do not dominate each other and share a front.
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_moea::moea::multi_objective::non_dominated_sort;
///
/// let objectives = vec![
///     vec![-1.0, -5.0],  // Solution A
///     vec![-3.0, -3.0],  // Solution B
///     vec![-5.0, -1.0],  // Solution C
///     vec![-4.0, -4.0],  // Solution D, dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
///
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// assert_eq!(result.fronts.len(), 2);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut front_0 = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(&objectives[i], &objectives[j]) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }

        // every j < i has already compared against i
        if domination_count[i] == 0 {
            front_0.push(i);
        }
    }

    let mut fronts = vec![front_0];
    loop {
        let current = fronts.last().expect("fronts is initialized with front_0; never empty");
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compares two weighted vectors for Pareto dominance (maximization).
pub fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va > vb {
            a_better_in_some = true;
        } else if vb > va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Returns `true` if weighted vector `a` dominates `b`.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

/// Crowding distance assignment for diversity preservation.
///
/// Computes the crowding distance for each member of one front. Higher
/// distance means the solution is more isolated (more diverse).
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`.
/// Objectives whose range is zero or not finite contribute nothing.
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_moea::moea::multi_objective::crowding_distance;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ];
///
/// let distances = crowding_distance(&objectives);
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!(distances[1].is_finite());
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];

    #[allow(clippy::needless_range_loop)] // obj_idx is a column index into 2D data
    for obj_idx in 0..m {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| objectives[a][obj_idx].total_cmp(&objectives[b][obj_idx]));

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let min_val = objectives[indices[0]][obj_idx];
        let max_val = objectives[indices[n - 1]][obj_idx];
        let range = max_val - min_val;

        if range > 0.0 && range.is_finite() {
            for i in 1..(n - 1) {
                let prev = objectives[indices[i - 1]][obj_idx];
                let next = objectives[indices[i + 1]][obj_idx];
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}

/// NSGA-II survivor selection.
///
/// Ranks `pool` into fronts, computes crowding distances per front, then
/// keeps whole fronts in order until the next one would overflow `mu`.
/// The overflowing front fills the remaining slots by descending crowding
/// distance. Survivors come back with `rank` and `crowding_distance` set,
/// ordered by front and then by distance within the boundary front.
///
/// Unevaluated individuals are ranked as if they carried
/// [`ObjectiveSpec::worst`].
///
/// Returns `min(mu, pool.len())` individuals.
pub fn select_nsga2<G>(
    pool: Vec<Individual<G>>,
    mu: usize,
    spec: &ObjectiveSpec,
) -> Vec<Individual<G>> {
    if pool.is_empty() || mu == 0 {
        return Vec::new();
    }

    let worst = spec.worst();
    let weighted: Vec<Vec<f64>> = pool
        .iter()
        .map(|ind| spec.weighted(ind.fitness.as_ref().unwrap_or(&worst)))
        .collect();

    let sorted = non_dominated_sort(&weighted);
    let mut distances = vec![0.0f64; pool.len()];
    let mut chosen: Vec<usize> = Vec::with_capacity(mu.min(pool.len()));

    for front in &sorted.fronts {
        if chosen.len() >= mu {
            break;
        }

        let front_objs: Vec<Vec<f64>> = front.iter().map(|&i| weighted[i].clone()).collect();
        for (&i, d) in front.iter().zip(crowding_distance(&front_objs)) {
            distances[i] = d;
        }

        if chosen.len() + front.len() <= mu {
            chosen.extend_from_slice(front);
        } else {
            let mut boundary = front.clone();
            boundary.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));
            let remaining = mu - chosen.len();
            chosen.extend_from_slice(&boundary[..remaining]);
        }
    }

    let mut slots: Vec<Option<Individual<G>>> = pool.into_iter().map(Some).collect();
    chosen
        .into_iter()
        .map(|i| {
            let mut ind = slots[i].take().expect("each index is chosen at most once");
            ind.rank = sorted.ranks[i];
            ind.crowding_distance = distances[i];
            ind
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
