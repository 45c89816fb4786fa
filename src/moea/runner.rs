//! Mu+lambda evolutionary loop.
//!
//! [`MoeaRunner`] orchestrates the run:
//! initialization → evaluation → archive update → ranking →
//! (variation → evaluation → archive update → ranking) × NGEN.
//!
//! The archive sees every evaluated individual before truncation, so
//! non-dominated genomes crowded out of the population are still kept.

use super::archive::ParetoArchive;
use super::config::MoeaConfig;
use super::multi_objective::select_nsga2;
use super::penalty::{penalized, DeltaPenalty};
use super::types::{FitnessVector, Genome, Individual, MoeaProblem, ObjectiveSpec};
use crate::error::{EvaluationFailure, MoeaError, Result};
use crate::random::rng_from_seed;
use log::{debug, info, trace};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Min/mean/max of one objective over the feasible population.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveStats {
    /// Smallest raw value.
    pub min: f64,
    /// Arithmetic mean of raw values.
    pub mean: f64,
    /// Largest raw value.
    pub max: f64,
}

/// Snapshot of the population after one generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation index; `0` is the initial population.
    pub generation: usize,

    /// Cumulative number of evaluations so far.
    pub evaluations: usize,

    /// Number of population members on the first front.
    pub front_size: usize,

    /// Archive size after this generation's update.
    pub archive_size: usize,

    /// Per-objective statistics over feasible members, in declaration
    /// order. Empty when no member is feasible.
    pub objectives: Vec<ObjectiveStats>,
}

/// Result of a multi-objective run.
#[derive(Debug, Clone)]
pub struct MoeaResult<G> {
    /// Final population of μ individuals, annotated with rank and
    /// crowding distance.
    pub population: Vec<Individual<G>>,

    /// Every non-dominated feasible individual seen during the run.
    pub archive: ParetoArchive<G>,

    /// Number of generations completed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Total number of penalized evaluations performed.
    pub evaluations: usize,

    /// One entry for the initial population plus one per generation.
    pub history: Vec<GenerationStats>,
}

/// Executes the mu+lambda loop with NSGA-II survivor selection.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = MoeaConfig::default().with_seed(42);
/// let result = MoeaRunner::run(&problem, &config)?;
/// for member in result.archive.iter() {
///     println!("{:?} {:?}", member.genome, member.fitness);
/// }
/// ```
pub struct MoeaRunner;

impl MoeaRunner {
    /// Runs the optimization.
    ///
    /// # Errors
    /// Returns [`MoeaError::Configuration`] for invalid parameters, an
    /// empty objective list or a penalty of the wrong arity, and whatever
    /// [`MoeaProblem::validate`] reports.
    pub fn run<P: MoeaProblem>(problem: &P, config: &MoeaConfig) -> Result<MoeaResult<P::Genome>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the optimization with an optional cancellation token.
    ///
    /// The flag is checked at each generation boundary. Once it is set the
    /// run stops and returns the population and archive as they stand.
    pub fn run_with_cancel<P: MoeaProblem>(
        problem: &P,
        config: &MoeaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<MoeaResult<P::Genome>> {
        config.validate()?;
        let spec = problem.objectives();
        check_objectives(spec, &problem.penalty())?;
        problem.validate()?;

        info!(
            "starting run: mu={} lambda={} generations={} cxpb={} mutpb={} objectives={}",
            config.mu,
            config.lambda,
            config.generations,
            config.crossover_prob,
            config.mutation_prob,
            spec.len()
        );

        let mut rng = rng_from_seed(config.seed);
        let penalty = penalized(problem);
        let mut archive = ParetoArchive::new(spec.clone());

        // 1. Initialize and evaluate
        let mut population: Vec<Individual<P::Genome>> = (0..config.mu)
            .map(|_| Individual::new(problem.create_genome(&mut rng)))
            .collect();
        let mut evaluations = evaluate_pending(&penalty, &mut population, config.parallel);

        // 2. Seed the archive and rank
        archive.update(population.iter());
        population = select_nsga2(population, config.mu, spec);

        let mut history = Vec::with_capacity(config.generations + 1);
        let stats = collect_stats(0, evaluations, &population, &archive, spec);
        problem.on_generation(&stats);
        history.push(stats);

        let mut completed = 0;
        let mut cancelled = false;

        // 3. Evolutionary loop
        for gen in 1..=config.generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let mut offspring = vary(problem, &population, config, &mut rng);
            evaluations += evaluate_pending(&penalty, &mut offspring, config.parallel);
            archive.update(offspring.iter());

            population.extend(offspring);
            population = select_nsga2(population, config.mu, spec);

            let stats = collect_stats(gen, evaluations, &population, &archive, spec);
            debug!(
                "generation {}: evaluations={} front={} archive={}",
                gen, stats.evaluations, stats.front_size, stats.archive_size
            );
            problem.on_generation(&stats);
            history.push(stats);
            completed = gen;
        }

        info!(
            "run finished: generations={} evaluations={} archive={} cancelled={}",
            completed,
            evaluations,
            archive.len(),
            cancelled
        );

        Ok(MoeaResult {
            population,
            archive,
            generations: completed,
            cancelled,
            evaluations,
            history,
        })
    }
}

fn check_objectives(spec: &ObjectiveSpec, penalty: &FitnessVector) -> Result<()> {
    if spec.is_empty() {
        return Err(MoeaError::Configuration(
            "at least one objective is required".into(),
        ));
    }
    if penalty.len() != spec.len() {
        return Err(MoeaError::Configuration(format!(
            "penalty has {} values but {} objectives are declared",
            penalty.len(),
            spec.len()
        )));
    }
    Ok(())
}

/// Produces λ offspring. Each one comes from crossover with probability
/// CXPB, otherwise from mutation with probability MUTPB, otherwise it is
/// a clone of a parent that keeps its fitness.
fn vary<P: MoeaProblem, R: Rng>(
    problem: &P,
    population: &[Individual<P::Genome>],
    config: &MoeaConfig,
    rng: &mut R,
) -> Vec<Individual<P::Genome>> {
    let selection = config.parent_selection;
    (0..config.lambda)
        .map(|_| {
            if rng.random_bool(config.crossover_prob) {
                let (i, j) = selection.select_pair(population, rng);
                trace!("offspring by crossover of {i} and {j}");
                let (child, _) =
                    problem.crossover(&population[i].genome, &population[j].genome, rng);
                Individual::new(child)
            } else if rng.random_bool(config.mutation_prob) {
                let i = selection.select(population, rng);
                trace!("offspring by mutation of {i}");
                Individual::new(problem.mutate(&population[i].genome, rng))
            } else {
                let i = selection.select(population, rng);
                trace!("offspring by cloning {i}");
                population[i].clone()
            }
        })
        .collect()
}

fn evaluate_one<G, F, E>(penalty: &DeltaPenalty<F, E>, ind: &mut Individual<G>)
where
    F: Fn(&G) -> bool,
    E: Fn(&G) -> std::result::Result<FitnessVector, EvaluationFailure>,
{
    let evaluation = penalty.evaluate(&ind.genome);
    ind.fitness = Some(evaluation.fitness);
    ind.feasible = evaluation.feasible;
}

fn evaluate_sequential<G, F, E>(penalty: &DeltaPenalty<F, E>, population: &mut [Individual<G>]) -> usize
where
    F: Fn(&G) -> bool,
    E: Fn(&G) -> std::result::Result<FitnessVector, EvaluationFailure>,
{
    let mut count = 0;
    for ind in population.iter_mut().filter(|ind| !ind.is_evaluated()) {
        evaluate_one(penalty, ind);
        count += 1;
    }
    count
}

/// Evaluates every individual lacking a fitness and returns how many were
/// evaluated.
#[cfg(feature = "parallel")]
fn evaluate_pending<G, F, E>(
    penalty: &DeltaPenalty<F, E>,
    population: &mut [Individual<G>],
    parallel: bool,
) -> usize
where
    G: Genome,
    F: Fn(&G) -> bool + Sync,
    E: Fn(&G) -> std::result::Result<FitnessVector, EvaluationFailure> + Sync,
{
    use rayon::prelude::*;

    if !parallel {
        return evaluate_sequential(penalty, population);
    }
    population
        .par_iter_mut()
        .filter(|ind| !ind.is_evaluated())
        .map(|ind| {
            evaluate_one(penalty, ind);
            1usize
        })
        .sum()
}

/// Evaluates every individual lacking a fitness and returns how many were
/// evaluated.
#[cfg(not(feature = "parallel"))]
fn evaluate_pending<G, F, E>(
    penalty: &DeltaPenalty<F, E>,
    population: &mut [Individual<G>],
    _parallel: bool,
) -> usize
where
    G: Genome,
    F: Fn(&G) -> bool + Sync,
    E: Fn(&G) -> std::result::Result<FitnessVector, EvaluationFailure> + Sync,
{
    evaluate_sequential(penalty, population)
}

fn collect_stats<G: Genome>(
    generation: usize,
    evaluations: usize,
    population: &[Individual<G>],
    archive: &ParetoArchive<G>,
    spec: &ObjectiveSpec,
) -> GenerationStats {
    let feasible: Vec<&FitnessVector> = population
        .iter()
        .filter(|ind| ind.feasible)
        .filter_map(|ind| ind.fitness.as_ref())
        .collect();

    let objectives = if feasible.is_empty() {
        Vec::new()
    } else {
        (0..spec.len())
            .map(|m| {
                let (min, max, sum) = feasible.iter().fold(
                    (f64::INFINITY, f64::NEG_INFINITY, 0.0),
                    |(lo, hi, sum), f| (lo.min(f[m]), hi.max(f[m]), sum + f[m]),
                );
                ObjectiveStats {
                    min,
                    mean: sum / feasible.len() as f64,
                    max,
                }
            })
            .collect()
    };

    GenerationStats {
        generation,
        evaluations,
        front_size: population.iter().filter(|ind| ind.rank == 0).count(),
        archive_size: archive.len(),
        objectives,
    }
}
