//! Pareto archive (hall of fame).
//!
//! Keeps every feasible, mutually non-dominated individual seen during a
//! run. Updates are cumulative: the archive never loses coverage even when
//! the active population drifts.

use super::multi_objective::dominates;
use super::types::{Genome, Individual, ObjectiveSpec};

#[derive(Debug, Clone)]
struct Entry<G> {
    individual: Individual<G>,
    weighted: Vec<f64>,
}

/// Archive of non-dominated individuals, deduplicated by genome.
///
/// # Examples
///
/// ```
/// use u_moea::moea::{FitnessVector, Individual, Objective, ObjectiveSpec, ParetoArchive};
///
/// let spec = ObjectiveSpec::new(vec![Objective::minimize("a"), Objective::minimize("b")]);
/// let mut archive = ParetoArchive::new(spec);
///
/// let mut good = Individual::new("good");
/// good.fitness = Some(FitnessVector::new(vec![1.0, 1.0]));
/// good.feasible = true;
/// let mut bad = Individual::new("bad");
/// bad.fitness = Some(FitnessVector::new(vec![2.0, 2.0]));
/// bad.feasible = true;
///
/// archive.update([&bad, &good]);
/// assert_eq!(archive.len(), 1);
/// assert_eq!(archive.iter().next().unwrap().genome, "good");
/// ```
#[derive(Debug, Clone)]
pub struct ParetoArchive<G> {
    spec: ObjectiveSpec,
    entries: Vec<Entry<G>>,
}

impl<G: Genome> ParetoArchive<G> {
    /// Creates an empty archive for the given objectives.
    pub fn new(spec: ObjectiveSpec) -> Self {
        Self {
            spec,
            entries: Vec::new(),
        }
    }

    /// Merges candidates into the archive and returns how many were added.
    ///
    /// A candidate is skipped if it is unevaluated, infeasible, dominated
    /// by a member, or has the same genome as a member. Members dominated
    /// by an accepted candidate are removed.
    pub fn update<'a, I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = &'a Individual<G>>,
        G: 'a,
    {
        let mut added = 0;
        for candidate in candidates {
            let Some(fitness) = candidate.fitness.as_ref() else {
                continue;
            };
            if !candidate.feasible {
                continue;
            }

            let weighted = self.spec.weighted(fitness);
            let rejected = self.entries.iter().any(|e| {
                e.individual.genome == candidate.genome || dominates(&e.weighted, &weighted)
            });
            if rejected {
                continue;
            }

            self.entries.retain(|e| !dominates(&weighted, &e.weighted));
            self.entries.push(Entry {
                individual: candidate.clone(),
                weighted,
            });
            added += 1;
        }
        added
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the archive holds no member.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Individual<G>> {
        self.entries.iter().map(|e| &e.individual)
    }

    /// Returns `true` if a member carries `genome`.
    pub fn contains(&self, genome: &G) -> bool {
        self.entries.iter().any(|e| &e.individual.genome == genome)
    }

    /// The objectives this archive compares on.
    pub fn objectives(&self) -> &ObjectiveSpec {
        &self.spec
    }

    /// Consumes the archive, returning its members.
    pub fn into_members(self) -> Vec<Individual<G>> {
        self.entries.into_iter().map(|e| e.individual).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moea::types::{FitnessVector, Objective};
    use proptest::prelude::*;

    fn spec() -> ObjectiveSpec {
        ObjectiveSpec::new(vec![Objective::minimize("a"), Objective::maximize("b")])
    }

    fn ind(genome: u32, a: f64, b: f64) -> Individual<u32> {
        let mut ind = Individual::new(genome);
        ind.fitness = Some(FitnessVector::new(vec![a, b]));
        ind.feasible = true;
        ind
    }

    #[test]
    fn test_dominated_candidate_rejected() {
        let mut archive = ParetoArchive::new(spec());
        archive.update([&ind(1, 1.0, 5.0)]);
        assert_eq!(archive.update([&ind(2, 2.0, 4.0)]), 0);
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_dominating_candidate_evicts_members() {
        let mut archive = ParetoArchive::new(spec());
        archive.update([&ind(1, 2.0, 4.0), &ind(2, 3.0, 6.0)]);
        assert_eq!(archive.len(), 2);
        archive.update([&ind(3, 1.0, 7.0)]);
        assert_eq!(archive.len(), 1);
        assert!(archive.contains(&3));
    }

    #[test]
    fn test_duplicate_genome_rejected() {
        let mut archive = ParetoArchive::new(spec());
        archive.update([&ind(1, 1.0, 1.0)]);
        assert_eq!(archive.update([&ind(1, 1.0, 1.0)]), 0);
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_equal_fitness_distinct_genomes_kept() {
        let mut archive = ParetoArchive::new(spec());
        archive.update([&ind(1, 1.0, 1.0), &ind(2, 1.0, 1.0)]);
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_infeasible_and_unevaluated_skipped() {
        let mut archive = ParetoArchive::new(spec());
        let mut infeasible = ind(1, 0.0, 100.0);
        infeasible.feasible = false;
        let unevaluated = Individual::new(2u32);
        assert_eq!(archive.update([&infeasible, &unevaluated]), 0);
        assert!(archive.is_empty());
    }

    proptest! {
        #[test]
        fn prop_members_pairwise_non_dominated(
            points in prop::collection::vec((0u32..20, -10.0f64..10.0, -10.0f64..10.0), 1..60)
        ) {
            let mut archive = ParetoArchive::new(spec());
            for (g, a, b) in &points {
                archive.update([&ind(*g, *a, *b)]);
            }
            let members: Vec<_> = archive.iter().collect();
            prop_assert!(!members.is_empty());
            for x in &members {
                for y in &members {
                    let fx = x.fitness.as_ref().unwrap();
                    let fy = y.fitness.as_ref().unwrap();
                    prop_assert!(!archive.objectives().dominates(fx, fy));
                }
            }
            let genomes: std::collections::HashSet<u32> = members.iter().map(|m| m.genome).collect();
            prop_assert_eq!(genomes.len(), members.len());
        }
    }
}
