//! BCE-MOEA/D configuration.
//!
//! [`BceConfig`] holds every parameter of a run except the reference
//! directions, which also fix the population size and archive capacity.

use super::archive::InsertionRule;
use super::decomposition::Decomposition;
use super::error::BceError;
use super::operators::{validate_operators, Crossover, Mutation, Sampling};

/// Configuration for BCE-MOEA/D.
///
/// # Defaults
///
/// ```
/// use u_bcemoead::bce::{BceConfig, Decomposition};
///
/// let config = BceConfig::default();
/// assert_eq!(config.n_neighbors, 20);
/// assert_eq!(config.decomposition, Decomposition::ModifiedTchebycheff);
/// assert!((config.prob_neighbor_mating - 0.9).abs() < 1e-12);
/// assert_eq!(config.max_generations, 200);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_bcemoead::bce::{BceConfig, Decomposition, Mutation};
///
/// let config = BceConfig::default()
///     .with_n_neighbors(15)
///     .with_decomposition(Decomposition::Tchebycheff)
///     .with_mutation(Mutation::Polynomial { prob: None, eta: 15.0 })
///     .with_max_generations(500)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BceConfig {
    /// Size of each subproblem's weight-vector neighborhood.
    ///
    /// Clamped to the number of reference directions at run time.
    pub n_neighbors: usize,

    /// Scalarizing function for the NPC population.
    pub decomposition: Decomposition,

    /// Probability of mating within the neighborhood rather than the
    /// whole NPC population (0.0–1.0).
    pub prob_neighbor_mating: f64,

    /// How the initial population is produced.
    pub sampling: Sampling,

    /// Recombination operator.
    pub crossover: Crossover,

    /// Mutation operator.
    pub mutation: Mutation,

    /// How offspring are checked against the PC archive.
    pub insertion_rule: InsertionRule,

    /// Maximum number of generations.
    pub max_generations: usize,

    /// Optional evaluation budget, checked before each generation.
    ///
    /// `None` disables evaluation-based termination (the default).
    pub max_evaluations: Option<usize>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked before each generation, so a run may overshoot by one
    /// generation's worth of work.
    pub time_limit_ms: Option<u64>,

    /// Decision vectors closer than this are duplicates in the
    /// end-of-generation merge.
    pub duplicate_epsilon: f64,

    /// Whether to evaluate the initial population in parallel.
    ///
    /// Only has an effect with the `parallel` feature. Generations are
    /// always sequential.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for BceConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 20,
            decomposition: Decomposition::default(),
            prob_neighbor_mating: 0.9,
            sampling: Sampling::default(),
            crossover: Crossover::default(),
            mutation: Mutation::default(),
            insertion_rule: InsertionRule::default(),
            max_generations: 200,
            max_evaluations: None,
            time_limit_ms: None,
            duplicate_epsilon: 1e-16,
            parallel: false,
            seed: None,
        }
    }
}

impl BceConfig {
    /// Sets the neighborhood size.
    pub fn with_n_neighbors(mut self, n: usize) -> Self {
        self.n_neighbors = n;
        self
    }

    /// Sets the decomposition.
    pub fn with_decomposition(mut self, decomposition: Decomposition) -> Self {
        self.decomposition = decomposition;
        self
    }

    /// Sets the neighborhood mating probability.
    pub fn with_prob_neighbor_mating(mut self, prob: f64) -> Self {
        self.prob_neighbor_mating = prob.clamp(0.0, 1.0);
        self
    }

    /// Sets the sampling strategy.
    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the mutation operator.
    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the archive insertion rule.
    pub fn with_insertion_rule(mut self, rule: InsertionRule) -> Self {
        self.insertion_rule = rule;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the evaluation budget.
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = Some(n);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the duplicate tolerance.
    pub fn with_duplicate_epsilon(mut self, epsilon: f64) -> Self {
        self.duplicate_epsilon = epsilon;
        self
    }

    /// Enables or disables parallel evaluation of the initial population.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Checks that do not depend on the problem or the reference
    /// directions; those are checked when the run starts.
    pub fn validate(&self) -> Result<(), BceError> {
        if self.max_generations == 0 {
            return Err(BceError::InvalidConfig(
                "max_generations must be at least 1".into(),
            ));
        }
        if self.n_neighbors < self.crossover.n_parents() {
            return Err(BceError::InvalidConfig(format!(
                "n_neighbors must be at least {}, got {}",
                self.crossover.n_parents(),
                self.n_neighbors
            )));
        }
        if !(0.0..=1.0).contains(&self.prob_neighbor_mating) {
            return Err(BceError::InvalidConfig(format!(
                "prob_neighbor_mating must be in [0, 1], got {}",
                self.prob_neighbor_mating
            )));
        }
        if !(self.duplicate_epsilon.is_finite() && self.duplicate_epsilon >= 0.0) {
            return Err(BceError::InvalidConfig(
                "duplicate_epsilon must be finite and non-negative".into(),
            ));
        }
        if self.max_evaluations == Some(0) {
            return Err(BceError::InvalidConfig(
                "max_evaluations must be positive or None".into(),
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(BceError::InvalidConfig(
                "time_limit_ms must be positive or None".into(),
            ));
        }
        if let Decomposition::Pbi { theta } = self.decomposition {
            if !(theta.is_finite() && theta >= 0.0) {
                return Err(BceError::InvalidConfig(format!(
                    "PBI theta must be non-negative, got {theta}"
                )));
            }
        }
        validate_operators(&self.crossover, &self.mutation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BceConfig::default();
        assert_eq!(config.n_neighbors, 20);
        assert_eq!(config.decomposition, Decomposition::ModifiedTchebycheff);
        assert!((config.prob_neighbor_mating - 0.9).abs() < 1e-10);
        assert_eq!(config.sampling, Sampling::Random);
        assert_eq!(config.crossover, Crossover::Sbx { prob: 1.0, eta: 20.0 });
        assert_eq!(config.mutation, Mutation::Polynomial { prob: None, eta: 20.0 });
        assert_eq!(config.insertion_rule, InsertionRule::Exhaustive);
        assert_eq!(config.max_generations, 200);
        assert!(config.max_evaluations.is_none());
        assert!(config.time_limit_ms.is_none());
        assert!(!config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = BceConfig::default()
            .with_n_neighbors(10)
            .with_decomposition(Decomposition::Pbi { theta: 5.0 })
            .with_prob_neighbor_mating(0.8)
            .with_crossover(Crossover::Blend { alpha: 0.3 })
            .with_mutation(Mutation::Gaussian { prob: Some(0.2), sigma: 0.1 })
            .with_insertion_rule(InsertionRule::FirstMatch)
            .with_max_generations(50)
            .with_max_evaluations(5000)
            .with_time_limit_ms(1000)
            .with_duplicate_epsilon(1e-9)
            .with_parallel(true)
            .with_seed(7);

        assert_eq!(config.n_neighbors, 10);
        assert_eq!(config.decomposition, Decomposition::Pbi { theta: 5.0 });
        assert!((config.prob_neighbor_mating - 0.8).abs() < 1e-10);
        assert_eq!(config.crossover, Crossover::Blend { alpha: 0.3 });
        assert_eq!(config.insertion_rule, InsertionRule::FirstMatch);
        assert_eq!(config.max_generations, 50);
        assert_eq!(config.max_evaluations, Some(5000));
        assert_eq!(config.time_limit_ms, Some(1000));
        assert!(config.parallel);
        assert_eq!(config.seed, Some(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_ok() {
        assert!(BceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_clamp_probability() {
        let config = BceConfig::default().with_prob_neighbor_mating(1.5);
        assert!((config.prob_neighbor_mating - 1.0).abs() < 1e-10);
        let config = BceConfig::default().with_prob_neighbor_mating(-1.0);
        assert!(config.prob_neighbor_mating.abs() < 1e-10);
    }

    #[test]
    fn test_validate_zero_generations() {
        assert!(BceConfig::default().with_max_generations(0).validate().is_err());
    }

    #[test]
    fn test_validate_too_few_neighbors() {
        let err = BceConfig::default().with_n_neighbors(1).validate().unwrap_err();
        assert!(matches!(err, BceError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_probability_set_directly() {
        let config = BceConfig {
            prob_neighbor_mating: 2.0,
            ..BceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_budgets() {
        assert!(BceConfig::default().with_max_evaluations(0).validate().is_err());
        assert!(BceConfig::default().with_time_limit_ms(0).validate().is_err());
        assert!(BceConfig::default().with_time_limit_ms(1).validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_epsilon() {
        assert!(BceConfig::default().with_duplicate_epsilon(-1.0).validate().is_err());
        assert!(BceConfig::default()
            .with_duplicate_epsilon(f64::NAN)
            .validate()
            .is_err());
        assert!(BceConfig::default().with_duplicate_epsilon(0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_pbi_theta() {
        let config = BceConfig::default().with_decomposition(Decomposition::Pbi { theta: -1.0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_operator_parameters() {
        let config = BceConfig::default().with_crossover(Crossover::Sbx { prob: 1.0, eta: -2.0 });
        assert!(config.validate().is_err());
    }
}
