//! Real-valued variation operators.
//!
//! Sampling, crossover and mutation for bounded continuous decision
//! vectors. The engine treats them as black boxes: it asks for an initial
//! population, for children of two parents (and uses the first one), and
//! for a perturbed copy of a child.
//!
//! # Sampling
//!
//! - [`Sampling::Random`]: uniform within the bounds
//! - [`Sampling::Fixed`]: caller-supplied decision vectors
//!
//! # Crossover
//!
//! - [`Crossover::Sbx`]: Simulated binary crossover (Deb & Agrawal, 1995)
//! - [`Crossover::Blend`]: BLX-α (Eshelman & Schaffer, 1993)
//!
//! # Mutation
//!
//! - [`Mutation::Polynomial`]: Polynomial mutation (Deb & Goyal, 1996)
//! - [`Mutation::Gaussian`]: Gaussian perturbation scaled to the variable range
//!
//! All operators clamp their results into the bounds.

use super::error::BceError;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Differences below this are treated as identical parent genes.
const GENE_EPS: f64 = 1e-14;

/// How the initial population is created.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sampling {
    /// Uniform random vectors within the bounds.
    #[default]
    Random,
    /// Exactly these decision vectors, one per reference direction.
    Fixed(Vec<Vec<f64>>),
}

impl Sampling {
    /// Produces `n` decision vectors for a problem with the given bounds.
    ///
    /// # Errors
    /// [`BceError::SamplingShape`] if a fixed population does not contain
    /// exactly `n` vectors of the right length, and
    /// [`BceError::SampleOutOfBounds`] if one of them leaves the bounds.
    pub fn sample<R: Rng>(
        &self,
        bounds: &[(f64, f64)],
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<f64>>, BceError> {
        match self {
            Sampling::Random => Ok((0..n)
                .map(|_| {
                    bounds
                        .iter()
                        .map(|&(lo, hi)| if hi > lo { rng.random_range(lo..hi) } else { lo })
                        .collect()
                })
                .collect()),
            Sampling::Fixed(vectors) => {
                let well_formed = vectors.len() == n && vectors.iter().all(|x| x.len() == bounds.len());
                if !well_formed {
                    return Err(BceError::SamplingShape {
                        expected: n,
                        found: vectors.len(),
                        n_var: bounds.len(),
                    });
                }
                check_within_bounds(vectors, bounds)?;
                Ok(vectors.clone())
            }
        }
    }
}

/// Rejects the first decision vector with a variable outside its bounds.
pub(crate) fn check_within_bounds<'a, I>(vectors: I, bounds: &[(f64, f64)]) -> Result<(), BceError>
where
    I: IntoIterator<Item = &'a Vec<f64>>,
{
    for (index, x) in vectors.into_iter().enumerate() {
        let outside = x
            .iter()
            .zip(bounds)
            .position(|(&v, &(lo, hi))| !(lo..=hi).contains(&v));
        if let Some(variable) = outside {
            return Err(BceError::SampleOutOfBounds {
                index,
                variable,
                value: x[variable],
            });
        }
    }
    Ok(())
}

/// Recombination of two parents.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Simulated binary crossover.
    ///
    /// With probability `prob` the pair is recombined; each variable is
    /// then crossed with probability 0.5. Larger `eta` keeps children
    /// closer to their parents.
    Sbx { prob: f64, eta: f64 },

    /// Blend crossover: each child gene is drawn uniformly from the parent
    /// interval extended by `alpha` times its width on both sides.
    Blend { alpha: f64 },
}

impl Default for Crossover {
    fn default() -> Self {
        Crossover::Sbx {
            prob: 1.0,
            eta: 20.0,
        }
    }
}

impl Crossover {
    /// Number of parents consumed per mating.
    pub fn n_parents(&self) -> usize {
        2
    }

    /// Produces one or two children from two parents.
    pub fn crossover<R: Rng>(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        bounds: &[(f64, f64)],
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        match *self {
            Crossover::Sbx { prob, eta } => {
                let mut child1 = parent1.to_vec();
                let mut child2 = parent2.to_vec();
                if rng.random_range(0.0..1.0) >= prob {
                    return vec![child1, child2];
                }
                for (i, &(lo, hi)) in bounds.iter().enumerate() {
                    if rng.random_range(0.0..1.0) >= 0.5 || (parent1[i] - parent2[i]).abs() < GENE_EPS {
                        continue;
                    }
                    let (c1, c2) = sbx_pair(parent1[i], parent2[i], lo, hi, eta, rng);
                    child1[i] = c1;
                    child2[i] = c2;
                }
                vec![child1, child2]
            }
            Crossover::Blend { alpha } => {
                let child = parent1
                    .iter()
                    .zip(parent2)
                    .zip(bounds)
                    .map(|((&a, &b), &(lo, hi))| {
                        let low = a.min(b);
                        let high = a.max(b);
                        let range = high - low;
                        if range < GENE_EPS {
                            low
                        } else {
                            rng.random_range((low - alpha * range)..(high + alpha * range))
                                .clamp(lo, hi)
                        }
                    })
                    .collect();
                vec![child]
            }
        }
    }

    fn validate(&self) -> Result<(), BceError> {
        match *self {
            Crossover::Sbx { prob, eta } => {
                check_probability("crossover prob", prob)?;
                check_non_negative("crossover eta", eta)
            }
            Crossover::Blend { alpha } => check_non_negative("blend alpha", alpha),
        }
    }
}

/// Bounded SBX for a single variable.
fn sbx_pair<R: Rng>(p1: f64, p2: f64, lo: f64, hi: f64, eta: f64, rng: &mut R) -> (f64, f64) {
    let (y1, y2) = if p1 < p2 { (p1, p2) } else { (p2, p1) };
    let delta = y2 - y1;
    let u: f64 = rng.random_range(0.0..1.0);
    let exponent = 1.0 / (eta + 1.0);

    let spread = |beta: f64| {
        let alpha = 2.0 - beta.powf(-(eta + 1.0));
        if u <= 1.0 / alpha {
            (u * alpha).powf(exponent)
        } else {
            (1.0 / (2.0 - u * alpha)).powf(exponent)
        }
    };

    let c1 = 0.5 * ((y1 + y2) - spread(1.0 + 2.0 * (y1 - lo) / delta) * delta);
    let c2 = 0.5 * ((y1 + y2) + spread(1.0 + 2.0 * (hi - y2) / delta) * delta);
    let (c1, c2) = (c1.clamp(lo, hi), c2.clamp(lo, hi));

    if rng.random_range(0.0..1.0) < 0.5 {
        (c2, c1)
    } else {
        (c1, c2)
    }
}

/// Perturbation of a single child.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// Polynomial mutation.
    ///
    /// Each variable mutates with probability `prob`, or `1 / n_var` when
    /// `prob` is `None`.
    Polynomial { prob: Option<f64>, eta: f64 },

    /// Adds `N(0, (sigma · (high − low))²)` noise to each selected variable.
    ///
    /// Each variable mutates with probability `prob`, or `1 / n_var` when
    /// `prob` is `None`.
    Gaussian { prob: Option<f64>, sigma: f64 },
}

impl Default for Mutation {
    fn default() -> Self {
        Mutation::Polynomial {
            prob: None,
            eta: 20.0,
        }
    }
}

impl Mutation {
    /// Mutates `x` in place.
    pub fn mutate<R: Rng>(&self, x: &mut [f64], bounds: &[(f64, f64)], rng: &mut R) {
        let n = x.len();
        if n == 0 {
            return;
        }
        let per_var = |prob: Option<f64>| prob.unwrap_or(1.0 / n as f64);

        match *self {
            Mutation::Polynomial { prob, eta } => {
                let p = per_var(prob);
                for (v, &(lo, hi)) in x.iter_mut().zip(bounds) {
                    if rng.random_range(0.0..1.0) < p {
                        *v = polynomial_mutation(*v, lo, hi, eta, rng);
                    }
                }
            }
            Mutation::Gaussian { prob, sigma } => {
                let p = per_var(prob);
                for (v, &(lo, hi)) in x.iter_mut().zip(bounds) {
                    if rng.random_range(0.0..1.0) >= p {
                        continue;
                    }
                    let scale = sigma * (hi - lo);
                    if let Ok(normal) = Normal::new(0.0, scale) {
                        *v = (*v + normal.sample(rng)).clamp(lo, hi);
                    }
                }
            }
        }
    }

    fn validate(&self) -> Result<(), BceError> {
        match *self {
            Mutation::Polynomial { prob, eta } => {
                if let Some(p) = prob {
                    check_probability("mutation prob", p)?;
                }
                check_non_negative("mutation eta", eta)
            }
            Mutation::Gaussian { prob, sigma } => {
                if let Some(p) = prob {
                    check_probability("mutation prob", p)?;
                }
                if !(sigma.is_finite() && sigma > 0.0) {
                    return Err(BceError::InvalidConfig(format!(
                        "gaussian sigma must be positive, got {sigma}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Polynomial mutation for a single bounded value.
fn polynomial_mutation<R: Rng>(x: f64, lo: f64, hi: f64, eta: f64, rng: &mut R) -> f64 {
    let range = hi - lo;
    if range <= 0.0 {
        return x;
    }
    let u: f64 = rng.random_range(0.0..1.0);
    let delta1 = (x - lo) / range;
    let delta2 = (hi - x) / range;
    let exponent = 1.0 / (eta + 1.0);

    let delta_q = if u < 0.5 {
        let xy = 1.0 - delta1;
        let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(eta + 1.0);
        val.powf(exponent) - 1.0
    } else {
        let xy = 1.0 - delta2;
        let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(eta + 1.0);
        1.0 - val.powf(exponent)
    };

    (x + delta_q * range).clamp(lo, hi)
}

/// Validates crossover and mutation parameters together.
pub(crate) fn validate_operators(crossover: &Crossover, mutation: &Mutation) -> Result<(), BceError> {
    crossover.validate()?;
    mutation.validate()
}

fn check_probability(name: &str, p: f64) -> Result<(), BceError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(BceError::InvalidConfig(format!("{name} must be in [0, 1], got {p}")))
    }
}

fn check_non_negative(name: &str, v: f64) -> Result<(), BceError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(BceError::InvalidConfig(format!("{name} must be non-negative, got {v}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_bounds(n: usize) -> Vec<(f64, f64)> {
        vec![(0.0, 1.0); n]
    }

    fn in_bounds(x: &[f64], bounds: &[(f64, f64)]) -> bool {
        x.iter().zip(bounds).all(|(&v, &(lo, hi))| v >= lo && v <= hi)
    }

    // ---- Sampling ----

    #[test]
    fn test_random_sampling_within_bounds() {
        let bounds = vec![(-2.0, 3.0), (10.0, 11.0), (5.0, 5.0)];
        let mut rng = StdRng::seed_from_u64(42);
        let pop = Sampling::Random.sample(&bounds, 20, &mut rng).unwrap();
        assert_eq!(pop.len(), 20);
        for x in &pop {
            assert_eq!(x.len(), 3);
            assert!(in_bounds(x, &bounds));
            assert_eq!(x[2], 5.0);
        }
    }

    #[test]
    fn test_fixed_sampling() {
        let vectors = vec![vec![0.1], vec![0.2]];
        let mut rng = StdRng::seed_from_u64(42);
        let pop = Sampling::Fixed(vectors.clone())
            .sample(&unit_bounds(1), 2, &mut rng)
            .unwrap();
        assert_eq!(pop, vectors);
    }

    #[test]
    fn test_fixed_sampling_wrong_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = Sampling::Fixed(vec![vec![0.1]])
            .sample(&unit_bounds(1), 2, &mut rng)
            .unwrap_err();
        assert!(matches!(err, BceError::SamplingShape { expected: 2, found: 1, .. }));

        let err = Sampling::Fixed(vec![vec![0.1, 0.2], vec![0.3]])
            .sample(&unit_bounds(1), 2, &mut rng)
            .unwrap_err();
        assert!(matches!(err, BceError::SamplingShape { .. }));
    }

    #[test]
    fn test_fixed_sampling_out_of_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let bounds = vec![(0.0, 1.0), (-1.0, 1.0)];
        let err = Sampling::Fixed(vec![vec![0.5, 0.0], vec![0.5, -1.5]])
            .sample(&bounds, 2, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            BceError::SampleOutOfBounds {
                index: 1,
                variable: 1,
                value: -1.5
            }
        );

        // Values on the bounds are accepted
        let pop = Sampling::Fixed(vec![vec![0.0, -1.0], vec![1.0, 1.0]])
            .sample(&bounds, 2, &mut rng)
            .unwrap();
        assert_eq!(pop.len(), 2);
    }

    #[test]
    fn test_fixed_sampling_nan_rejected() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = Sampling::Fixed(vec![vec![f64::NAN]])
            .sample(&unit_bounds(1), 1, &mut rng)
            .unwrap_err();
        assert!(matches!(err, BceError::SampleOutOfBounds { index: 0, variable: 0, .. }));
    }

    // ---- Crossover ----

    #[test]
    fn test_sbx_children_within_bounds() {
        let bounds = unit_bounds(10);
        let mut rng = StdRng::seed_from_u64(42);
        let p1: Vec<f64> = (0..10).map(|i| i as f64 / 10.0).collect();
        let p2: Vec<f64> = (0..10).map(|i| 1.0 - i as f64 / 10.0).collect();
        for _ in 0..100 {
            let children = Crossover::default().crossover(&p1, &p2, &bounds, &mut rng);
            assert_eq!(children.len(), 2);
            for c in &children {
                assert_eq!(c.len(), 10);
                assert!(in_bounds(c, &bounds));
            }
        }
    }

    #[test]
    fn test_sbx_identical_parents() {
        let bounds = unit_bounds(3);
        let mut rng = StdRng::seed_from_u64(7);
        let p = vec![0.3, 0.6, 0.9];
        let children = Crossover::default().crossover(&p, &p, &bounds, &mut rng);
        assert_eq!(children, vec![p.clone(), p]);
    }

    #[test]
    fn test_sbx_zero_probability_copies_parents() {
        let bounds = unit_bounds(2);
        let mut rng = StdRng::seed_from_u64(7);
        let cx = Crossover::Sbx { prob: 0.0, eta: 20.0 };
        let children = cx.crossover(&[0.1, 0.2], &[0.8, 0.9], &bounds, &mut rng);
        assert_eq!(children, vec![vec![0.1, 0.2], vec![0.8, 0.9]]);
    }

    #[test]
    fn test_sbx_changes_something() {
        let bounds = unit_bounds(20);
        let mut rng = StdRng::seed_from_u64(11);
        let p1 = vec![0.2; 20];
        let p2 = vec![0.8; 20];
        let children = Crossover::default().crossover(&p1, &p2, &bounds, &mut rng);
        assert!(children[0].iter().any(|&v| v != 0.2 && v != 0.8));
    }

    #[test]
    fn test_blend_single_child_within_bounds() {
        let bounds = unit_bounds(4);
        let mut rng = StdRng::seed_from_u64(3);
        let cx = Crossover::Blend { alpha: 0.5 };
        for _ in 0..50 {
            let children = cx.crossover(&[0.0, 0.2, 0.5, 1.0], &[0.1, 0.9, 0.5, 0.7], &bounds, &mut rng);
            assert_eq!(children.len(), 1);
            assert!(in_bounds(&children[0], &bounds));
            assert_eq!(children[0][2], 0.5);
        }
    }

    // ---- Mutation ----

    #[test]
    fn test_polynomial_mutation_within_bounds() {
        let bounds = unit_bounds(5);
        let mut rng = StdRng::seed_from_u64(42);
        let m = Mutation::Polynomial { prob: Some(1.0), eta: 20.0 };
        for _ in 0..100 {
            let mut x = vec![0.0, 0.25, 0.5, 0.75, 1.0];
            m.mutate(&mut x, &bounds, &mut rng);
            assert!(in_bounds(&x, &bounds));
        }
    }

    #[test]
    fn test_polynomial_mutation_zero_probability() {
        let bounds = unit_bounds(3);
        let mut rng = StdRng::seed_from_u64(42);
        let m = Mutation::Polynomial { prob: Some(0.0), eta: 20.0 };
        let mut x = vec![0.1, 0.2, 0.3];
        m.mutate(&mut x, &bounds, &mut rng);
        assert_eq!(x, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_gaussian_mutation_within_bounds() {
        let bounds = vec![(-1.0, 1.0); 4];
        let mut rng = StdRng::seed_from_u64(5);
        let m = Mutation::Gaussian { prob: Some(1.0), sigma: 0.5 };
        let mut moved = false;
        for _ in 0..50 {
            let mut x = vec![0.0; 4];
            m.mutate(&mut x, &bounds, &mut rng);
            assert!(in_bounds(&x, &bounds));
            moved |= x.iter().any(|&v| v != 0.0);
        }
        assert!(moved);
    }

    #[test]
    fn test_mutation_empty_vector() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut x: Vec<f64> = Vec::new();
        Mutation::default().mutate(&mut x, &[], &mut rng);
        assert!(x.is_empty());
    }

    // ---- Validation ----

    #[test]
    fn test_validate_operators() {
        assert!(validate_operators(&Crossover::default(), &Mutation::default()).is_ok());
        assert!(validate_operators(
            &Crossover::Sbx { prob: 1.5, eta: 20.0 },
            &Mutation::default()
        )
        .is_err());
        assert!(validate_operators(
            &Crossover::default(),
            &Mutation::Gaussian { prob: None, sigma: 0.0 }
        )
        .is_err());
        assert!(validate_operators(
            &Crossover::Blend { alpha: -0.1 },
            &Mutation::default()
        )
        .is_err());
    }
}
