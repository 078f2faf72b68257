//! Pareto-criterion (PC) archive maintenance.
//!
//! The PC population is an archive of mutually non-dominated solutions
//! capped at `C` members. It grows one offspring at a time through
//! [`insert`] and is cut back to capacity by [`truncate`], which removes
//! the most crowded member repeatedly.
//!
//! # Crowding degree
//!
//! With `d(i, j)` the distance between members in normalized objective
//! space and `R` the niche radius,
//!
//! ```text
//! crowding(i) = 1 − Π_j min(d(i, j) / R, 1)
//! ```
//!
//! A member with no other member inside `R` has crowding 0; a member with
//! many close neighbors approaches 1.
//!
//! # References
//!
//! - Li, Yang & Liu (2016), "Pareto or Non-Pareto: Bi-Criterion Evolution in
//!   Multiobjective Optimization", *IEEE TEVC* 20(5), 645–665

use super::geometry::{distance_matrix, niche_radius, normalize, NICHE_NEIGHBORS};
use super::multi_objective::{dominance, Dominance};
use super::types::{objectives_of, Individual};
use rand::Rng;

/// How a new solution is checked against the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InsertionRule {
    /// Compare against every member: reject if any member dominates the
    /// candidate, otherwise drop every member the candidate dominates.
    ///
    /// Keeps the archive mutually non-dominated after every insertion.
    #[default]
    Exhaustive,

    /// Stop at the first member in archive order. Only that member can be
    /// removed, and a non-dominated first member lets the candidate in
    /// without looking further.
    ///
    /// Cheaper, but the archive may temporarily hold dominated members
    /// until the end-of-generation merge filters them out.
    FirstMatch,
}

/// Outcome of [`insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// An archive member dominates the candidate; the archive is unchanged.
    Rejected,
    /// The candidate was appended after removing `removed` dominated members.
    Accepted { removed: usize },
}

/// Offers `candidate` to the archive.
///
/// Accepted candidates are appended at the end. Mutates `pc` only.
///
/// # Example
///
/// ```
/// use u_bcemoead::bce::archive::{insert, InsertOutcome, InsertionRule};
/// use u_bcemoead::bce::Individual;
///
/// let mut pc = vec![
///     Individual::new(vec![0.0], vec![1.0, 3.0]),
///     Individual::new(vec![1.0], vec![3.0, 1.0]),
/// ];
/// let outcome = insert(&mut pc, Individual::new(vec![0.5], vec![0.0, 0.0]), InsertionRule::Exhaustive);
/// assert_eq!(outcome, InsertOutcome::Accepted { removed: 2 });
/// assert_eq!(pc.len(), 1);
/// ```
pub fn insert(pc: &mut Vec<Individual>, candidate: Individual, rule: InsertionRule) -> InsertOutcome {
    match rule {
        InsertionRule::Exhaustive => {
            if pc
                .iter()
                .any(|m| dominance(&candidate.f, &m.f) == Dominance::DominatedBy)
            {
                return InsertOutcome::Rejected;
            }
            let before = pc.len();
            pc.retain(|m| dominance(&candidate.f, &m.f) != Dominance::Dominates);
            let removed = before - pc.len();
            pc.push(candidate);
            InsertOutcome::Accepted { removed }
        }
        InsertionRule::FirstMatch => {
            let relation = pc.first().map(|m| dominance(&candidate.f, &m.f));
            match relation {
                Some(Dominance::DominatedBy) => InsertOutcome::Rejected,
                Some(Dominance::Dominates) => {
                    pc.remove(0);
                    pc.push(candidate);
                    InsertOutcome::Accepted { removed: 1 }
                }
                Some(Dominance::NonDominated) | None => {
                    pc.push(candidate);
                    InsertOutcome::Accepted { removed: 0 }
                }
            }
        }
    }
}

/// Crowding degree of each listed member.
///
/// `distances` is the full distance matrix (zero entries already set to
/// infinity, see [`distance_matrix`]); `members` selects the rows and
/// columns still in play. A radius of 0 yields 0 for everyone.
pub fn crowding_degrees(distances: &[Vec<f64>], members: &[usize], radius: f64) -> Vec<f64> {
    members
        .iter()
        .map(|&i| {
            let product: f64 = members
                .iter()
                .map(|&j| {
                    let d = distances[i][j];
                    if d < radius {
                        d / radius
                    } else {
                        1.0
                    }
                })
                .product();
            1.0 - product
        })
        .collect()
}

/// Cuts the archive down to `capacity` members.
///
/// Objectives are normalized on a copy and the niche radius is estimated
/// once. Then, while the archive is too large, the member with the highest
/// crowding degree (first one on ties) is removed and the degrees are
/// recomputed. When every crowding degree is 0 the excess is removed in
/// one batch, chosen uniformly at random.
///
/// Returns the surviving members in their original order. An archive
/// already within capacity is returned unchanged.
pub fn truncate<R: Rng>(pc: Vec<Individual>, capacity: usize, rng: &mut R) -> Vec<Individual> {
    if pc.len() <= capacity {
        return pc;
    }

    let mut objs = objectives_of(&pc);
    normalize(&mut objs);
    let distances = distance_matrix(&objs);
    let radius = niche_radius(&distances, NICHE_NEIGHBORS);

    let mut alive: Vec<usize> = (0..pc.len()).collect();
    while alive.len() > capacity {
        let crowding = crowding_degrees(&distances, &alive, radius);
        let (worst, max_crowding) = crowding
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (pos, c)| {
                if c > best.1 {
                    (pos, c)
                } else {
                    best
                }
            });

        if max_crowding <= 0.0 {
            let excess = alive.len() - capacity;
            let mut drop = vec![false; alive.len()];
            for pos in rand::seq::index::sample(rng, alive.len(), excess) {
                drop[pos] = true;
            }
            log::trace!("truncate: dispersed archive, dropping {excess} at random");
            let mut pos = 0;
            alive.retain(|_| {
                let keep = !drop[pos];
                pos += 1;
                keep
            });
            break;
        }

        log::trace!(
            "truncate: removing member {} with crowding {max_crowding:.4}",
            alive[worst]
        );
        alive.remove(worst);
    }

    let mut keep = vec![false; pc.len()];
    for &i in &alive {
        keep[i] = true;
    }
    pc.into_iter()
        .zip(keep)
        .filter_map(|(ind, k)| k.then_some(ind))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
