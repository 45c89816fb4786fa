//! Run configuration.
//!
//! [`MoeaConfig`] holds all parameters that control the mu+lambda loop.

use super::selection::ParentSelection;
use crate::error::{MoeaError, Result};

/// Configuration for a mu+lambda multi-objective run.
///
/// # Defaults
///
/// ```
/// use u_moea::moea::MoeaConfig;
///
/// let config = MoeaConfig::default();
/// assert_eq!(config.mu, 100);
/// assert_eq!(config.lambda, 50);
/// assert_eq!(config.generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moea::moea::{MoeaConfig, ParentSelection};
///
/// let config = MoeaConfig::default()
///     .with_mu(200)
///     .with_lambda(40)
///     .with_crossover_prob(0.6)
///     .with_mutation_prob(0.3)
///     .with_parent_selection(ParentSelection::Tournament(2))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MoeaConfig {
    /// Population size kept after each selection (μ).
    pub mu: usize,

    /// Offspring produced per generation (λ).
    ///
    /// Zero is allowed: the population is then only re-ranked.
    pub lambda: usize,

    /// Number of generations to run (NGEN).
    pub generations: usize,

    /// Probability that an offspring is produced by crossover (CXPB).
    pub crossover_prob: f64,

    /// Probability that an offspring not produced by crossover is produced
    /// by mutation (MUTPB). Drawn independently of CXPB; when neither
    /// fires, a parent is cloned.
    pub mutation_prob: f64,

    /// How parents are drawn from the population.
    pub parent_selection: ParentSelection,

    /// Whether to evaluate offspring in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for MoeaConfig {
    fn default() -> Self {
        Self {
            mu: 100,
            lambda: 50,
            generations: 100,
            crossover_prob: 0.5,
            mutation_prob: 0.5,
            parent_selection: ParentSelection::default(),
            parallel: true,
            seed: None,
        }
    }
}

impl MoeaConfig {
    /// Sets the population size (μ).
    pub fn with_mu(mut self, mu: usize) -> Self {
        self.mu = mu;
        self
    }

    /// Sets the offspring count per generation (λ).
    pub fn with_lambda(mut self, lambda: usize) -> Self {
        self.lambda = lambda;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the crossover probability. Not clamped; see [`validate`](Self::validate).
    pub fn with_crossover_prob(mut self, p: f64) -> Self {
        self.crossover_prob = p;
        self
    }

    /// Sets the mutation probability. Not clamped; see [`validate`](Self::validate).
    pub fn with_mutation_prob(mut self, p: f64) -> Self {
        self.mutation_prob = p;
        self
    }

    /// Sets the parent selection strategy.
    pub fn with_parent_selection(mut self, sel: ParentSelection) -> Self {
        self.parent_selection = sel;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for small catalogs and quick runs.
    ///
    /// - μ 50, λ 20, 100 generations, CXPB 0.3, MUTPB 0.3
    pub fn small() -> Self {
        Self {
            mu: 50,
            lambda: 20,
            generations: 100,
            crossover_prob: 0.3,
            mutation_prob: 0.3,
            ..Self::default()
        }
    }

    /// Preset for large catalogs and many objectives.
    ///
    /// - μ 500, λ 50, 5000 generations, CXPB 0.5, MUTPB 0.5
    pub fn large() -> Self {
        Self {
            mu: 500,
            lambda: 50,
            generations: 5000,
            crossover_prob: 0.5,
            mutation_prob: 0.5,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns [`MoeaError::Configuration`] describing the first invalid
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        if self.mu < 1 {
            return Err(MoeaError::Configuration("mu must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.crossover_prob) {
            return Err(MoeaError::Configuration(format!(
                "crossover_prob must be in [0, 1], got {}",
                self.crossover_prob
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(MoeaError::Configuration(format!(
                "mutation_prob must be in [0, 1], got {}",
                self.mutation_prob
            )));
        }
        if self.parent_selection == ParentSelection::Tournament(0) {
            return Err(MoeaError::Configuration(
                "tournament size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MoeaConfig::default();
        assert_eq!(config.mu, 100);
        assert_eq!(config.lambda, 50);
        assert_eq!(config.generations, 100);
        assert!((config.crossover_prob - 0.5).abs() < 1e-10);
        assert!((config.mutation_prob - 0.5).abs() < 1e-10);
        assert_eq!(config.parent_selection, ParentSelection::Uniform);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MoeaConfig::default()
            .with_mu(20)
            .with_lambda(0)
            .with_generations(7)
            .with_crossover_prob(0.1)
            .with_mutation_prob(0.9)
            .with_parent_selection(ParentSelection::Tournament(3))
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.mu, 20);
        assert_eq!(config.lambda, 0);
        assert_eq!(config.generations, 7);
        assert!((config.crossover_prob - 0.1).abs() < 1e-10);
        assert!((config.mutation_prob - 0.9).abs() < 1e-10);
        assert_eq!(config.parent_selection, ParentSelection::Tournament(3));
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_mu_zero() {
        let err = MoeaConfig::default().with_mu(0).validate().unwrap_err();
        assert!(matches!(err, MoeaError::Configuration(_)));
    }

    #[test]
    fn test_validate_probabilities() {
        for p in [-0.1, 1.5, f64::NAN] {
            assert!(MoeaConfig::default().with_crossover_prob(p).validate().is_err());
            assert!(MoeaConfig::default().with_mutation_prob(p).validate().is_err());
        }
        for p in [0.0, 1.0] {
            assert!(MoeaConfig::default().with_crossover_prob(p).validate().is_ok());
            assert!(MoeaConfig::default().with_mutation_prob(p).validate().is_ok());
        }
    }

    #[test]
    fn test_validate_tournament_zero() {
        let config = MoeaConfig::default().with_parent_selection(ParentSelection::Tournament(0));
        assert!(config.validate().is_err());
    }

    // ---- Presets ----

    #[test]
    fn test_preset_small() {
        let config = MoeaConfig::small();
        assert_eq!((config.mu, config.lambda, config.generations), (50, 20, 100));
        assert!((config.crossover_prob - 0.3).abs() < 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_large() {
        let config = MoeaConfig::large();
        assert_eq!((config.mu, config.lambda, config.generations), (500, 50, 5000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_chainable() {
        let config = MoeaConfig::small().with_mu(75).with_seed(42);
        assert_eq!(config.mu, 75);
        assert_eq!(config.lambda, 20);
        assert_eq!(config.seed, Some(42));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial_json() {
        let config: MoeaConfig =
            serde_json::from_str(r#"{"mu": 10, "parent_selection": {"Tournament": 2}}"#).unwrap();
        assert_eq!(config.mu, 10);
        assert_eq!(config.lambda, 50);
        assert_eq!(config.parent_selection, ParentSelection::Tournament(2));
    }
}
