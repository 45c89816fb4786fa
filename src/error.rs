//! Error types.
//!
//! Only configuration and catalog problems are fatal. Evaluation failures
//! are reported through [`EvaluationFailure`] and absorbed by the penalty
//! wrapper, so they never abort a run.

use thiserror::Error;

/// Fatal errors raised before the evolutionary loop starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoeaError {
    /// Invalid run parameters or objective declaration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The catalog cannot supply enough distinct items for a genome.
    #[error("catalog has {available} items, at least {required} required")]
    EmptyCatalog {
        /// Number of usable items in the catalog.
        available: usize,
        /// Minimum number of items a genome needs.
        required: usize,
    },

    /// A raw catalog record could not be parsed.
    #[error("invalid record {item}: {reason}")]
    InvalidRecord {
        /// Identifier of the offending record.
        item: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Why an objective evaluator could not produce a fitness vector.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationFailure {
    /// The genome references an item the catalog does not contain.
    #[error("unknown catalog item {0}")]
    UnknownItem(usize),

    /// The genome holds no items to aggregate over.
    #[error("genome is empty")]
    EmptyGenome,

    /// The evaluator returned the wrong number of objective values.
    #[error("expected {expected} objective values, got {actual}")]
    ArityMismatch {
        /// Declared objective count.
        expected: usize,
        /// Values actually produced.
        actual: usize,
    },

    /// An objective value came out as NaN or infinite.
    #[error("objective `{0}` is not finite")]
    NonFinite(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MoeaError>;
