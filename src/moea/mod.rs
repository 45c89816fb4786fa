//! Multi-objective evolutionary engine.
//!
//! A generic, domain-agnostic mu+lambda engine with NSGA-II survivor
//! selection. Users define their problem by implementing [`MoeaProblem`],
//! which declares the objectives and specifies how to create, evaluate,
//! recombine and mutate genomes.
//!
//! # Core Traits
//!
//! - [`Genome`]: Marker for immutable, hashable genome values
//! - [`MoeaProblem`]: Problem definition: objectives, initialization,
//!   evaluation, feasibility, operators
//!
//! # Key Types
//!
//! - [`ObjectiveSpec`]: Ordered objectives with their directions
//! - [`MoeaConfig`]: Run parameters (μ, λ, NGEN, CXPB, MUTPB, presets)
//! - [`MoeaRunner`]: Executes the evolutionary loop
//! - [`MoeaResult`]: Final population, archive and statistics
//! - [`ParetoArchive`]: Every non-dominated feasible individual seen
//! - [`DeltaPenalty`]: Feasibility predicate plus sentinel fitness
//!
//! # Submodules
//!
//! - [`multi_objective`]: Dominance, non-dominated sorting, crowding
//!   distance and NSGA-II truncation
//! - [`operators`]: Variable-length sequence and multiset variation helpers
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Beyer & Schwefel (2002), *Evolution strategies: A comprehensive introduction*

mod archive;
mod config;
pub mod multi_objective;
pub mod operators;
mod penalty;
mod runner;
mod selection;
mod types;

pub use archive::ParetoArchive;
pub use config::MoeaConfig;
pub use penalty::{penalized, DeltaPenalty, Evaluation};
pub use runner::{GenerationStats, MoeaResult, MoeaRunner, ObjectiveStats};
pub use selection::ParentSelection;
pub use types::{
    Direction, FitnessVector, Genome, Individual, MoeaProblem, Objective, ObjectiveSpec,
};
