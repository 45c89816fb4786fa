//! Reusable variation helpers.
//!
//! Building blocks for problem-specific crossover and mutation. Every
//! helper takes its inputs by reference and returns fresh values; parents
//! are never modified.
//!
//! # Sequence operators
//!
//! - [`one_point_crossover`]: exchange tails after a random cut point
//! - [`insert_at_random`]: insert one item at a random position
//! - [`remove_at_random`]: remove one item at a random position
//!
//! # Multiset operators
//!
//! - [`swap_counts`]: swap per-key counts with a fixed probability
//! - [`step_count`]: add or subtract one unit of a key, dropping zero counts

use rand::Rng;
use std::collections::BTreeMap;

// ============================================================================
// Sequence operators
// ============================================================================

/// One-point crossover for sequences of possibly different lengths.
///
/// The cut point is drawn from `1..min(len_a, len_b)`; children are
/// `a[..p] + b[p..]` and `b[..p] + a[p..]`. When the shorter parent has
/// fewer than two items the parents are returned unchanged.
///
/// Duplicates are not repaired; validity is checked at evaluation time.
pub fn one_point_crossover<T: Clone, R: Rng>(a: &[T], b: &[T], rng: &mut R) -> (Vec<T>, Vec<T>) {
    let size = a.len().min(b.len());
    if size < 2 {
        return (a.to_vec(), b.to_vec());
    }
    let point = rng.random_range(1..size);

    let child1 = a[..point].iter().chain(&b[point..]).cloned().collect();
    let child2 = b[..point].iter().chain(&a[point..]).cloned().collect();
    (child1, child2)
}

/// Returns a copy of `seq` with `item` inserted at a random position
/// in `0..=len`.
pub fn insert_at_random<T: Clone, R: Rng>(seq: &[T], item: T, rng: &mut R) -> Vec<T> {
    let idx = rng.random_range(0..=seq.len());
    let mut out = Vec::with_capacity(seq.len() + 1);
    out.extend_from_slice(&seq[..idx]);
    out.push(item);
    out.extend_from_slice(&seq[idx..]);
    out
}

/// Returns a copy of `seq` with one random item removed.
/// An empty sequence is returned unchanged.
pub fn remove_at_random<T: Clone, R: Rng>(seq: &[T], rng: &mut R) -> Vec<T> {
    if seq.is_empty() {
        return Vec::new();
    }
    let idx = rng.random_range(0..seq.len());
    let mut out = seq.to_vec();
    out.remove(idx);
    out
}

// ============================================================================
// Multiset operators
// ============================================================================

/// Swaps the count of each key in `keys` between two multisets with
/// probability `prob`.
///
/// Zero counts never appear in the outputs.
pub fn swap_counts<K: Ord + Clone, R: Rng>(
    a: &BTreeMap<K, u32>,
    b: &BTreeMap<K, u32>,
    keys: impl IntoIterator<Item = K>,
    prob: f64,
    rng: &mut R,
) -> (BTreeMap<K, u32>, BTreeMap<K, u32>) {
    let mut child1 = a.clone();
    let mut child2 = b.clone();
    for key in keys {
        if rng.random_bool(prob) {
            let x = child1.remove(&key);
            let y = child2.remove(&key);
            if let Some(y) = y.filter(|&c| c > 0) {
                child1.insert(key.clone(), y);
            }
            if let Some(x) = x.filter(|&c| c > 0) {
                child2.insert(key, x);
            }
        }
    }
    (child1, child2)
}

/// Returns a copy of `counts` with `key` incremented (`up = true`) or
/// decremented. A key whose count reaches zero is removed; decrementing an
/// absent key leaves the multiset unchanged.
pub fn step_count<K: Ord + Clone>(counts: &BTreeMap<K, u32>, key: K, up: bool) -> BTreeMap<K, u32> {
    let mut out = counts.clone();
    if up {
        *out.entry(key).or_insert(0) += 1;
    } else if let Some(c) = out.get_mut(&key) {
        *c = c.saturating_sub(1);
        if *c == 0 {
            out.remove(&key);
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    // ---- One-point crossover ----

    #[test]
    fn test_one_point_swaps_tails() {
        let mut rng = create_rng(42);
        let a = vec![1, 2, 3, 4, 5];
        let b = vec![6, 7, 8, 9];
        for _ in 0..50 {
            let (c1, c2) = one_point_crossover(&a, &b, &mut rng);
            assert_eq!(c1.len(), b.len());
            assert_eq!(c2.len(), a.len());
            assert_eq!(c1[0], 1);
            assert_eq!(c2[0], 6);
            assert_eq!(*c1.last().unwrap(), 9);
            assert_eq!(*c2.last().unwrap(), 5);
        }
    }

    #[test]
    fn test_one_point_short_parent_unchanged() {
        let mut rng = create_rng(42);
        let (c1, c2) = one_point_crossover(&[1], &[2, 3, 4], &mut rng);
        assert_eq!(c1, vec![1]);
        assert_eq!(c2, vec![2, 3, 4]);
    }

    #[test]
    fn test_one_point_leaves_parents_intact() {
        let mut rng = create_rng(3);
        let a = vec![1, 2, 3];
        let b = vec![4, 5, 6];
        let _ = one_point_crossover(&a, &b, &mut rng);
        assert_eq!(a, vec![1, 2, 3]);
        assert_eq!(b, vec![4, 5, 6]);
    }

    // ---- Insert / remove ----

    #[test]
    fn test_insert_adds_exactly_one() {
        let mut rng = create_rng(42);
        let seq = vec![1, 2, 3];
        let mut positions = [false; 4];
        for _ in 0..200 {
            let out = insert_at_random(&seq, 9, &mut rng);
            assert_eq!(out.len(), 4);
            let pos = out.iter().position(|&x| x == 9).unwrap();
            positions[pos] = true;
            let rest: Vec<_> = out.into_iter().filter(|&x| x != 9).collect();
            assert_eq!(rest, seq);
        }
        assert!(positions.iter().all(|&p| p), "every slot should be reachable");
    }

    #[test]
    fn test_remove_drops_exactly_one() {
        let mut rng = create_rng(42);
        let seq = vec![1, 2, 3, 4];
        for _ in 0..50 {
            let out = remove_at_random(&seq, &mut rng);
            assert_eq!(out.len(), 3);
            assert!(out.iter().all(|x| seq.contains(x)));
        }
        assert!(remove_at_random::<u8, _>(&[], &mut rng).is_empty());
    }

    // ---- Multiset ----

    #[test]
    fn test_swap_counts_always() {
        let mut rng = create_rng(42);
        let a = BTreeMap::from([(0, 2), (1, 1)]);
        let b = BTreeMap::from([(1, 3), (2, 4)]);
        let (c1, c2) = swap_counts(&a, &b, 0..3, 1.0, &mut rng);
        assert_eq!(c1, b);
        assert_eq!(c2, a);
    }

    #[test]
    fn test_swap_counts_never() {
        let mut rng = create_rng(42);
        let a = BTreeMap::from([(0, 2)]);
        let b = BTreeMap::from([(1, 3)]);
        let (c1, c2) = swap_counts(&a, &b, 0..3, 0.0, &mut rng);
        assert_eq!(c1, a);
        assert_eq!(c2, b);
    }

    #[test]
    fn test_step_count() {
        let counts = BTreeMap::from([("a", 1u32)]);
        assert_eq!(step_count(&counts, "a", true), BTreeMap::from([("a", 2)]));
        assert!(step_count(&counts, "a", false).is_empty());
        assert_eq!(step_count(&counts, "b", false), counts);
        assert_eq!(
            step_count(&counts, "b", true),
            BTreeMap::from([("a", 1), ("b", 1)])
        );
    }
}
