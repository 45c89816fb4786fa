//! Core type definitions for the multi-objective engine.
//!
//! [`ObjectiveSpec`] declares what is optimized, [`Individual`] carries a
//! genome through a run, and [`MoeaProblem`] is the contract between the
//! generic engine and a domain-specific problem.

use super::runner::GenerationStats;
use crate::error::{EvaluationFailure, MoeaError};
use rand::Rng;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Index;

/// Whether an objective should be made smaller or larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Smaller raw values are better (weight `-1`).
    Minimize,
    /// Larger raw values are better (weight `+1`).
    Maximize,
}

impl Direction {
    /// The weight that turns a raw value into a "larger is better" value.
    pub fn weight(self) -> f64 {
        match self {
            Direction::Minimize => -1.0,
            Direction::Maximize => 1.0,
        }
    }

    /// Parses a `+1` / `-1` weight. Any other value is rejected.
    pub fn from_weight(weight: f64) -> Option<Self> {
        if weight == 1.0 {
            Some(Direction::Maximize)
        } else if weight == -1.0 {
            Some(Direction::Minimize)
        } else {
            None
        }
    }
}

/// A named objective with its optimization direction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    /// Human-readable name, used in logs and statistics.
    pub name: String,
    /// Optimization direction.
    pub direction: Direction,
}

impl Objective {
    /// An objective to minimize.
    pub fn minimize(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Minimize,
        }
    }

    /// An objective to maximize.
    pub fn maximize(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Maximize,
        }
    }
}

/// The ordered list of objectives declared once per run.
///
/// Defines how raw fitness values combine into a dominance comparison:
/// each raw value is multiplied by its direction's weight so that larger
/// weighted values are always better.
///
/// # Examples
///
/// ```
/// use u_moea::moea::{FitnessVector, ObjectiveSpec};
///
/// let spec = ObjectiveSpec::from_weights(&[("cost", -1.0), ("value", 1.0)]).unwrap();
/// let a = FitnessVector::new(vec![1.0, 5.0]);
/// let b = FitnessVector::new(vec![2.0, 5.0]);
/// assert!(spec.dominates(&a, &b));
/// assert!(!spec.dominates(&b, &a));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ObjectiveSpec {
    objectives: Vec<Objective>,
}

impl ObjectiveSpec {
    /// Creates a spec from a list of objectives.
    ///
    /// An empty list is accepted here and rejected by the runner before
    /// the loop starts.
    pub fn new(objectives: Vec<Objective>) -> Self {
        Self { objectives }
    }

    /// Creates a spec from `(name, weight)` pairs with weights in `{-1, +1}`.
    pub fn from_weights(pairs: &[(&str, f64)]) -> Result<Self, MoeaError> {
        let objectives = pairs
            .iter()
            .map(|&(name, weight)| {
                Direction::from_weight(weight)
                    .map(|direction| Objective {
                        name: name.to_string(),
                        direction,
                    })
                    .ok_or_else(|| {
                        MoeaError::Configuration(format!(
                            "objective `{name}` has weight {weight}, expected -1 or +1"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { objectives })
    }

    /// Number of declared objectives.
    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    /// Returns `true` if no objective is declared.
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    /// The declared objectives, in order.
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Per-objective weights (`+1` maximize, `-1` minimize).
    pub fn weights(&self) -> Vec<f64> {
        self.objectives.iter().map(|o| o.direction.weight()).collect()
    }

    /// Applies the weights so that larger is better for every objective.
    pub fn weighted(&self, fitness: &FitnessVector) -> Vec<f64> {
        fitness
            .values()
            .iter()
            .zip(&self.objectives)
            .map(|(v, o)| v * o.direction.weight())
            .collect()
    }

    /// A fitness vector at the unfavorable extreme of every objective.
    ///
    /// `f64::MAX` for minimized objectives, `-f64::MAX` for maximized ones.
    /// Every finite feasible vector dominates it.
    pub fn worst(&self) -> FitnessVector {
        FitnessVector::new(
            self.objectives
                .iter()
                .map(|o| -o.direction.weight() * f64::MAX)
                .collect(),
        )
    }

    /// Returns `true` if `a` Pareto-dominates `b` under this spec.
    pub fn dominates(&self, a: &FitnessVector, b: &FitnessVector) -> bool {
        super::multi_objective::dominates(&self.weighted(a), &self.weighted(b))
    }

    /// Checks that `fitness` has one finite value per objective.
    pub fn check(&self, fitness: &FitnessVector) -> Result<(), EvaluationFailure> {
        if fitness.len() != self.len() {
            return Err(EvaluationFailure::ArityMismatch {
                expected: self.len(),
                actual: fitness.len(),
            });
        }
        if let Some((_, o)) = fitness
            .values()
            .iter()
            .zip(&self.objectives)
            .find(|(v, _)| !v.is_finite())
        {
            return Err(EvaluationFailure::NonFinite(o.name.clone()));
        }
        Ok(())
    }
}

/// Raw objective values of one genome, one entry per declared objective.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FitnessVector(Vec<f64>);

impl FitnessVector {
    /// Wraps raw objective values.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// The raw values.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for FitnessVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl Index<usize> for FitnessVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Marker trait for genome representations.
///
/// Genomes are immutable values: variation operators build new genomes
/// instead of editing parents. Equality is structural and is what the
/// archive deduplicates on.
pub trait Genome: Clone + Eq + Hash + Debug + Send + Sync {}

impl<T> Genome for T where T: Clone + Eq + Hash + Debug + Send + Sync {}

/// A genome with its evaluation and ranking annotations.
///
/// Two individuals with equal genomes are still independent values.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual<G> {
    /// The candidate solution.
    pub genome: G,

    /// Raw objective values; `None` until evaluated.
    pub fitness: Option<FitnessVector>,

    /// `false` if the fitness is the penalty sentinel.
    pub feasible: bool,

    /// Dominance front index (0 = non-dominated). `usize::MAX` until ranked.
    pub rank: usize,

    /// Crowding distance within its front. Larger is more isolated.
    pub crowding_distance: f64,
}

impl<G> Individual<G> {
    /// Wraps a fresh, unevaluated genome.
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            fitness: None,
            feasible: false,
            rank: usize::MAX,
            crowding_distance: 0.0,
        }
    }

    /// Returns `true` once a fitness vector is attached.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }
}

/// Defines a multi-objective optimization problem.
///
/// This is the capability interface the runner is driven by:
///
/// 1. **Initialization**: [`create_genome`](MoeaProblem::create_genome)
/// 2. **Evaluation**: [`evaluate`](MoeaProblem::evaluate), guarded by
///    [`is_feasible`](MoeaProblem::is_feasible) and
///    [`penalty`](MoeaProblem::penalty)
/// 3. **Mating**: [`crossover`](MoeaProblem::crossover)
/// 4. **Mutation**: [`mutate`](MoeaProblem::mutate)
///
/// Survivor selection is the NSGA-II ranker and parent selection is set in
/// [`MoeaConfig`](super::MoeaConfig).
///
/// # Thread Safety
///
/// `MoeaProblem` must be `Send + Sync` because the runner may evaluate
/// offspring in parallel using rayon. `evaluate` must not mutate shared
/// state.
pub trait MoeaProblem: Send + Sync {
    /// The genome representation.
    type Genome: Genome;

    /// The objectives this problem produces values for, in order.
    fn objectives(&self) -> &ObjectiveSpec;

    /// Checks problem data before a run, e.g. catalog size.
    fn validate(&self) -> crate::error::Result<()> {
        Ok(())
    }

    /// Creates a random genome for the initial population.
    fn create_genome<R: Rng>(&self, rng: &mut R) -> Self::Genome;

    /// Computes raw objective values. Must be pure.
    fn evaluate(&self, genome: &Self::Genome) -> Result<FitnessVector, EvaluationFailure>;

    /// Validity predicate. Infeasible genomes receive [`penalty`](Self::penalty)
    /// without calling [`evaluate`](Self::evaluate).
    fn is_feasible(&self, _genome: &Self::Genome) -> bool {
        true
    }

    /// The sentinel fitness for infeasible genomes and failed evaluations.
    fn penalty(&self) -> FitnessVector {
        self.objectives().worst()
    }

    /// Recombines two parents into two children.
    ///
    /// The default implementation returns copies of the parents.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Genome,
        parent2: &Self::Genome,
        _rng: &mut R,
    ) -> (Self::Genome, Self::Genome) {
        (parent1.clone(), parent2.clone())
    }

    /// Returns a perturbed copy of `genome`.
    ///
    /// The default implementation returns an unchanged copy.
    fn mutate<R: Rng>(&self, genome: &Self::Genome, _rng: &mut R) -> Self::Genome {
        genome.clone()
    }

    /// Called after every generation, including the initial population.
    fn on_generation(&self, _stats: &GenerationStats) {}
}
