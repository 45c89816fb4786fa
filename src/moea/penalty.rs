//! Constraint penalty wrapper.
//!
//! [`DeltaPenalty`] decorates an objective evaluator with a validity
//! predicate. Invalid genomes get a fixed sentinel fitness and the real
//! evaluator is never called for them. Evaluation failures are absorbed
//! the same way, so no genome can abort a run.

use super::types::{FitnessVector, MoeaProblem, ObjectiveSpec};
use crate::error::EvaluationFailure;
use log::{trace, warn};

/// Outcome of a penalized evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Raw objective values, or the sentinel.
    pub fitness: FitnessVector,
    /// `false` if `fitness` is the sentinel.
    pub feasible: bool,
}

/// Evaluator decorated with a feasibility predicate and a sentinel fitness.
///
/// # Examples
///
/// ```
/// use u_moea::error::EvaluationFailure;
/// use u_moea::moea::{DeltaPenalty, FitnessVector, Objective, ObjectiveSpec};
///
/// let spec = ObjectiveSpec::new(vec![Objective::minimize("len")]);
/// let penalty = DeltaPenalty::new(
///     spec.clone(),
///     |v: &Vec<u8>| v.len() >= 3,
///     |v: &Vec<u8>| Ok::<_, EvaluationFailure>(FitnessVector::new(vec![v.len() as f64])),
///     spec.worst(),
/// );
///
/// assert!(penalty.evaluate(&vec![1, 2, 3]).feasible);
/// assert_eq!(penalty.evaluate(&vec![1]).fitness, spec.worst());
/// ```
pub struct DeltaPenalty<F, E> {
    spec: ObjectiveSpec,
    feasible: F,
    evaluate: E,
    sentinel: FitnessVector,
}

impl<F, E> DeltaPenalty<F, E> {
    /// Wraps `evaluate` with the predicate `feasible` and the `sentinel`.
    pub fn new(spec: ObjectiveSpec, feasible: F, evaluate: E, sentinel: FitnessVector) -> Self {
        Self {
            spec,
            feasible,
            evaluate,
            sentinel,
        }
    }

    /// The fitness assigned to infeasible genomes.
    pub fn sentinel(&self) -> &FitnessVector {
        &self.sentinel
    }

    /// Evaluates `genome`, substituting the sentinel when it is infeasible
    /// or when the evaluator fails.
    pub fn evaluate<G>(&self, genome: &G) -> Evaluation
    where
        F: Fn(&G) -> bool,
        E: Fn(&G) -> Result<FitnessVector, EvaluationFailure>,
    {
        if !(self.feasible)(genome) {
            trace!("infeasible genome, assigning penalty fitness");
            return self.penalized();
        }

        match (self.evaluate)(genome).and_then(|f| self.spec.check(&f).map(|()| f)) {
            Ok(fitness) => Evaluation {
                fitness,
                feasible: true,
            },
            Err(err) => {
                warn!("evaluation failed, assigning penalty fitness: {err}");
                self.penalized()
            }
        }
    }

    fn penalized(&self) -> Evaluation {
        Evaluation {
            fitness: self.sentinel.clone(),
            feasible: false,
        }
    }
}

/// Builds the penalty wrapper for a problem from its own predicate,
/// evaluator and sentinel.
pub fn penalized<P: MoeaProblem>(
    problem: &P,
) -> DeltaPenalty<
    impl Fn(&P::Genome) -> bool + Sync + '_,
    impl Fn(&P::Genome) -> Result<FitnessVector, EvaluationFailure> + Sync + '_,
> {
    DeltaPenalty::new(
        problem.objectives().clone(),
        move |g: &P::Genome| problem.is_feasible(g),
        move |g: &P::Genome| problem.evaluate(g),
        problem.penalty(),
    )
}
