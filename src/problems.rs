//! Standard multi-objective benchmark problems.
//!
//! Unconstrained, box-bounded test functions with known Pareto fronts,
//! ready to pass to [`BceRunner`](crate::bce::BceRunner).
//!
//! # References
//!
//! - Zitzler, Deb & Thiele (2000), "Comparison of Multiobjective
//!   Evolutionary Algorithms: Empirical Results"
//! - Deb, Thiele, Laumanns & Zitzler (2005), "Scalable Test Problems for
//!   Evolutionary Multiobjective Optimization"

use crate::bce::BceProblem;
use std::f64::consts::FRAC_PI_2;

/// ZDT `g` function: `1 + 9 · mean(x[1..])`.
fn zdt_g(x: &[f64]) -> f64 {
    let tail = &x[1..];
    if tail.is_empty() {
        return 1.0;
    }
    1.0 + 9.0 * tail.iter().sum::<f64>() / tail.len() as f64
}

/// ZDT1: convex front `f2 = 1 − √f1`, `x ∈ [0, 1]^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zdt1 {
    n_var: usize,
}

impl Zdt1 {
    /// Creates the problem with `n_var` decision variables (at least 1).
    pub fn new(n_var: usize) -> Self {
        Self {
            n_var: n_var.max(1),
        }
    }
}

impl BceProblem for Zdt1 {
    fn n_objectives(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, 1.0); self.n_var]
    }

    fn evaluate(&self, x: &[f64]) -> Vec<f64> {
        let f1 = x[0];
        let g = zdt_g(x);
        vec![f1, g * (1.0 - (f1 / g).sqrt())]
    }
}

/// ZDT2: concave front `f2 = 1 − f1²`, `x ∈ [0, 1]^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zdt2 {
    n_var: usize,
}

impl Zdt2 {
    /// Creates the problem with `n_var` decision variables (at least 1).
    pub fn new(n_var: usize) -> Self {
        Self {
            n_var: n_var.max(1),
        }
    }
}

impl BceProblem for Zdt2 {
    fn n_objectives(&self) -> usize {
        2
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, 1.0); self.n_var]
    }

    fn evaluate(&self, x: &[f64]) -> Vec<f64> {
        let f1 = x[0];
        let g = zdt_g(x);
        vec![f1, g * (1.0 - (f1 / g).powi(2))]
    }
}

/// DTLZ2: spherical front `Σ fᵢ² = 1` in any number of objectives.
///
/// The first `n_obj − 1` variables position a point on the sphere; the
/// remaining ones enter `g = Σ (xᵢ − 0.5)²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dtlz2 {
    n_obj: usize,
    n_var: usize,
}

impl Dtlz2 {
    /// Creates the problem. `n_obj` is at least 2 and `n_var` at least
    /// `n_obj`.
    pub fn new(n_obj: usize, n_var: usize) -> Self {
        let n_obj = n_obj.max(2);
        Self {
            n_obj,
            n_var: n_var.max(n_obj),
        }
    }

    /// Conventional size: `n_obj + 9` variables.
    pub fn standard(n_obj: usize) -> Self {
        Self::new(n_obj, n_obj + 9)
    }
}

impl BceProblem for Dtlz2 {
    fn n_objectives(&self) -> usize {
        self.n_obj
    }

    fn bounds(&self) -> Vec<(f64, f64)> {
        vec![(0.0, 1.0); self.n_var]
    }

    fn evaluate(&self, x: &[f64]) -> Vec<f64> {
        let m = self.n_obj;
        let (position, distance) = x.split_at(m - 1);
        let g: f64 = distance.iter().map(|v| (v - 0.5).powi(2)).sum();

        (0..m)
            .map(|i| {
                let cosines: f64 = position[..m - 1 - i]
                    .iter()
                    .map(|v| (v * FRAC_PI_2).cos())
                    .product();
                let sine = if i == 0 {
                    1.0
                } else {
                    (position[m - 1 - i] * FRAC_PI_2).sin()
                };
                (1.0 + g) * cosines * sine
            })
            .collect()
    }
}
