//! Core data types for BCE-MOEA/D.
//!
//! [`Individual`] is the unit both populations are made of, and
//! [`BceProblem`] is the contract between the generic engine and a
//! concrete multi-objective problem.

use super::error::BceError;

/// An evaluated candidate solution.
///
/// `x` is the decision vector and `f` the objective vector (one entry per
/// objective, all minimized). The objective vector is written once, by
/// evaluation, and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    /// Decision vector.
    pub x: Vec<f64>,
    /// Objective vector.
    pub f: Vec<f64>,
}

impl Individual {
    /// Creates an individual from an already evaluated pair.
    pub fn new(x: Vec<f64>, f: Vec<f64>) -> Self {
        Self { x, f }
    }
}

/// Collects the objective vectors of a population.
pub fn objectives_of(population: &[Individual]) -> Vec<Vec<f64>> {
    population.iter().map(|ind| ind.f.clone()).collect()
}

/// Defines an unconstrained multi-objective minimization problem.
///
/// Users implement this trait to plug their problem into
/// [`BceRunner`](super::BceRunner). Sampling, recombination and mutation
/// are configured on [`BceConfig`](super::BceConfig) and operate within
/// [`bounds`](BceProblem::bounds).
///
/// # Thread Safety
///
/// `BceProblem` must be `Send + Sync` because the initial population may be
/// evaluated in parallel when the `parallel` feature is enabled.
///
/// # Example
///
/// ```
/// use u_bcemoead::bce::BceProblem;
///
/// struct Schaffer;
///
/// impl BceProblem for Schaffer {
///     fn n_objectives(&self) -> usize { 2 }
///     fn bounds(&self) -> Vec<(f64, f64)> { vec![(-10.0, 10.0)] }
///     fn evaluate(&self, x: &[f64]) -> Vec<f64> {
///         vec![x[0] * x[0], (x[0] - 2.0).powi(2)]
///     }
/// }
/// ```
pub trait BceProblem: Send + Sync {
    /// Number of objectives.
    fn n_objectives(&self) -> usize;

    /// Lower and upper bound of each decision variable.
    fn bounds(&self) -> Vec<(f64, f64)>;

    /// Number of constraints. Anything other than zero is rejected at setup.
    fn n_constraints(&self) -> usize {
        0
    }

    /// Evaluates a decision vector. Must be deterministic.
    fn evaluate(&self, x: &[f64]) -> Vec<f64>;

    /// Called after every generation with the published population.
    fn on_generation(&self, _generation: usize, _population: &[Individual]) {}
}

/// Evaluates `x` and wraps it into an [`Individual`], checking the
/// objective count.
pub(crate) fn evaluate_individual<P: BceProblem>(
    problem: &P,
    x: Vec<f64>,
) -> Result<Individual, BceError> {
    let f = problem.evaluate(&x);
    let expected = problem.n_objectives();
    if f.len() != expected {
        return Err(BceError::ObjectiveDimension {
            expected,
            found: f.len(),
        });
    }
    Ok(Individual { x, f })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair;

    impl BceProblem for Pair {
        fn n_objectives(&self) -> usize {
            2
        }
        fn bounds(&self) -> Vec<(f64, f64)> {
            vec![(0.0, 1.0)]
        }
        fn evaluate(&self, x: &[f64]) -> Vec<f64> {
            vec![x[0], 1.0 - x[0]]
        }
    }

    struct Broken;

    impl BceProblem for Broken {
        fn n_objectives(&self) -> usize {
            2
        }
        fn bounds(&self) -> Vec<(f64, f64)> {
            vec![(0.0, 1.0)]
        }
        fn evaluate(&self, x: &[f64]) -> Vec<f64> {
            vec![x[0]]
        }
    }

    #[test]
    fn test_evaluate_individual() {
        let ind = evaluate_individual(&Pair, vec![0.25]).unwrap();
        assert_eq!(ind.x, vec![0.25]);
        assert_eq!(ind.f, vec![0.25, 0.75]);
    }

    #[test]
    fn test_evaluate_wrong_objective_count() {
        let err = evaluate_individual(&Broken, vec![0.25]).unwrap_err();
        assert_eq!(
            err,
            BceError::ObjectiveDimension {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_default_constraints_is_zero() {
        assert_eq!(Pair.n_constraints(), 0);
    }

    #[test]
    fn test_objectives_of() {
        let pop = vec![
            Individual::new(vec![0.0], vec![1.0, 2.0]),
            Individual::new(vec![1.0], vec![3.0, 4.0]),
        ];
        assert_eq!(objectives_of(&pop), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }
}
