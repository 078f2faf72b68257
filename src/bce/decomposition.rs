//! Decomposition (scalarization) and the NPC update rules built on it.
//!
//! A [`Decomposition`] turns an objective vector into a single number for
//! one subproblem, given that subproblem's weight vector and the shared
//! ideal point. Smaller is better.
//!
//! Two update rules consume it:
//!
//! - [`global_update`]: compares an offspring against every subproblem and
//!   overwrites at most one randomly chosen NPC slot it improves.
//! - [`replace_in_neighborhood`]: MOEA/D replacement restricted to one
//!   subproblem's neighbors, capped at [`max_replacements`] slots.
//!
//! # References
//!
//! - Zhang & Li (2007), "MOEA/D: A Multiobjective Evolutionary Algorithm
//!   Based on Decomposition"
//! - Li & Zhang (2009), "Multiobjective Optimization Problems With
//!   Complicated Pareto Sets, MOEA/D and NSGA-II"

use super::types::Individual;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Smallest weight used by [`Decomposition::ModifiedTchebycheff`].
const MIN_WEIGHT: f64 = 1e-6;

/// Scalarizing function used to compare solutions on one subproblem.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decomposition {
    /// `max(wᵢ · |fᵢ − zᵢ|)`.
    Tchebycheff,

    /// `max(|fᵢ − zᵢ| / wᵢ)`, with zero weights lifted to `1e-6`.
    ///
    /// Solutions optimal for this form lie on the ray of their weight
    /// vector, which spreads the NPC population more evenly than the
    /// plain form.
    #[default]
    ModifiedTchebycheff,

    /// `Σ(wᵢ · fᵢ)`. Only reaches convex parts of the front.
    WeightedSum,

    /// Penalty-based boundary intersection: `d₁ + θ · d₂`.
    Pbi {
        /// Penalty on the distance from the weight ray.
        theta: f64,
    },
}

impl Decomposition {
    /// Scalar value of `f` on the subproblem defined by `weights`.
    ///
    /// # Example
    ///
    /// ```
    /// use u_bcemoead::bce::Decomposition;
    ///
    /// let v = Decomposition::Tchebycheff.aggregate(&[3.0, 1.0], &[0.5, 0.5], &[1.0, 0.0]);
    /// assert!((v - 1.0).abs() < 1e-12);
    /// ```
    pub fn aggregate(&self, f: &[f64], weights: &[f64], ideal: &[f64]) -> f64 {
        match self {
            Decomposition::Tchebycheff => f
                .iter()
                .zip(weights)
                .zip(ideal)
                .map(|((fi, wi), zi)| wi * (fi - zi).abs())
                .fold(f64::NEG_INFINITY, f64::max),
            Decomposition::ModifiedTchebycheff => f
                .iter()
                .zip(weights)
                .zip(ideal)
                .map(|((fi, wi), zi)| (fi - zi).abs() / wi.max(MIN_WEIGHT))
                .fold(f64::NEG_INFINITY, f64::max),
            Decomposition::WeightedSum => f.iter().zip(weights).map(|(fi, wi)| wi * fi).sum(),
            Decomposition::Pbi { theta } => {
                let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
                if norm == 0.0 {
                    return f64::INFINITY;
                }
                let d1 = f
                    .iter()
                    .zip(weights)
                    .zip(ideal)
                    .map(|((fi, wi), zi)| (fi - zi) * wi)
                    .sum::<f64>()
                    .abs()
                    / norm;
                let d2 = f
                    .iter()
                    .zip(weights)
                    .zip(ideal)
                    .map(|((fi, wi), zi)| {
                        let diff = fi - zi - d1 * wi / norm;
                        diff * diff
                    })
                    .sum::<f64>()
                    .sqrt();
                d1 + theta * d2
            }
        }
    }
}

/// Maximum number of NPC slots one offspring may take over in a
/// neighborhood replacement: `ceil(C / 100)`.
pub fn max_replacements(n_subproblems: usize) -> usize {
    n_subproblems.div_ceil(100)
}

/// Injects an offspring into the NPC population.
///
/// The offspring is scored against every subproblem's weight vector and
/// compared with the slot's current holder. If it is strictly better on
/// at least one subproblem, one of those slots, drawn uniformly, is
/// overwritten. Returns the overwritten index.
///
/// Mutates `npc` only.
pub fn global_update<R: Rng>(
    npc: &mut [Individual],
    ref_dirs: &[Vec<f64>],
    offspring: &Individual,
    ideal: &[f64],
    decomposition: Decomposition,
    rng: &mut R,
) -> Option<usize> {
    let improved: Vec<usize> = npc
        .iter()
        .zip(ref_dirs)
        .enumerate()
        .filter(|(_, (member, w))| {
            decomposition.aggregate(&offspring.f, w, ideal)
                < decomposition.aggregate(&member.f, w, ideal)
        })
        .map(|(i, _)| i)
        .collect();

    let &slot = improved.choose(rng)?;
    npc[slot] = offspring.clone();
    log::trace!("global NPC update: slot {slot} of {} candidates", improved.len());
    Some(slot)
}

/// MOEA/D replacement within one neighborhood.
///
/// Every neighbor slot where the offspring is strictly better on that
/// neighbor's own subproblem is a candidate; the first `max_replacements`
/// candidates in neighbor order are overwritten with the offspring.
/// Returns the overwritten indices.
///
/// Mutates `npc` only, and only at indices listed in `neighbors`.
pub fn replace_in_neighborhood(
    npc: &mut [Individual],
    neighbors: &[usize],
    ref_dirs: &[Vec<f64>],
    offspring: &Individual,
    ideal: &[f64],
    decomposition: Decomposition,
    max_replacements: usize,
) -> Vec<usize> {
    let replaced: Vec<usize> = neighbors
        .iter()
        .copied()
        .filter(|&j| {
            decomposition.aggregate(&offspring.f, &ref_dirs[j], ideal)
                < decomposition.aggregate(&npc[j].f, &ref_dirs[j], ideal)
        })
        .take(max_replacements)
        .collect();

    for &j in &replaced {
        npc[j] = offspring.clone();
    }
    replaced
}
