//! Mating selection for the NPC evolution step.
//!
//! Parents for subproblem `i` are usually drawn from its neighborhood so
//! that recombination happens between solutions of similar subproblems.
//! With a small probability they come from the whole population instead,
//! which keeps an overly narrow neighborhood from stalling the search.
//!
//! # References
//!
//! - Li & Zhang (2009), "Multiobjective Optimization Problems With
//!   Complicated Pareto Sets, MOEA/D and NSGA-II"

use super::neighborhood::Neighborhood;
use rand::seq::index::sample;
use rand::Rng;

/// Neighborhood-or-global parent selection.
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_bcemoead::bce::{das_dennis, Neighborhood, NeighborhoodSelection};
///
/// let dirs = das_dennis(2, 9);
/// let hood = Neighborhood::new(&dirs, 3);
/// let selection = NeighborhoodSelection::new(1.0);
/// let mut rng = StdRng::seed_from_u64(42);
///
/// let parents = selection.select(5, &hood, 2, &mut rng);
/// assert_eq!(parents.len(), 2);
/// assert!(parents.iter().all(|p| hood.of(5).contains(p)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborhoodSelection {
    /// Probability of drawing parents from the neighborhood (0.0–1.0).
    pub prob_neighbor_mating: f64,
}

impl Default for NeighborhoodSelection {
    fn default() -> Self {
        Self::new(0.9)
    }
}

impl NeighborhoodSelection {
    /// Creates a selection with the given neighborhood probability.
    pub fn new(prob_neighbor_mating: f64) -> Self {
        Self {
            prob_neighbor_mating: prob_neighbor_mating.clamp(0.0, 1.0),
        }
    }

    /// Draws `n_parents` distinct population indices for subproblem `i`.
    ///
    /// With probability `prob_neighbor_mating` the indices come from the
    /// neighbors of `i`, otherwise from the whole population (one index per
    /// subproblem in `neighborhood`). Fewer indices are returned if the
    /// pool is smaller than `n_parents`.
    pub fn select<R: Rng>(
        &self,
        i: usize,
        neighborhood: &Neighborhood,
        n_parents: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        if rng.random_range(0.0..1.0) < self.prob_neighbor_mating {
            let pool = neighborhood.of(i);
            sample(rng, pool.len(), n_parents.min(pool.len()))
                .into_iter()
                .map(|p| pool[p])
                .collect()
        } else {
            let n = neighborhood.len();
            sample(rng, n, n_parents.min(n)).into_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bce::reference::das_dennis;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_always_neighborhood() {
        let hood = Neighborhood::new(&das_dennis(2, 19), 4);
        let selection = NeighborhoodSelection::new(1.0);
        let mut rng = StdRng::seed_from_u64(42);

        for i in 0..hood.len() {
            let parents = selection.select(i, &hood, 2, &mut rng);
            assert_eq!(parents.len(), 2);
            assert_ne!(parents[0], parents[1]);
            assert!(parents.iter().all(|p| hood.of(i).contains(p)));
        }
    }

    #[test]
    fn test_never_neighborhood_reaches_whole_population() {
        let hood = Neighborhood::new(&das_dennis(2, 19), 3);
        let selection = NeighborhoodSelection::new(0.0);
        let mut rng = StdRng::seed_from_u64(42);

        let mut outside = false;
        for _ in 0..200 {
            let parents = selection.select(0, &hood, 2, &mut rng);
            assert_eq!(parents.len(), 2);
            assert_ne!(parents[0], parents[1]);
            assert!(parents.iter().all(|&p| p < hood.len()));
            outside |= parents.iter().any(|p| !hood.of(0).contains(p));
        }
        assert!(outside, "global mating should leave the neighborhood");
    }

    #[test]
    fn test_small_pool_is_clamped() {
        let hood = Neighborhood::new(&das_dennis(2, 1), 2);
        let selection = NeighborhoodSelection::new(1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let parents = selection.select(0, &hood, 3, &mut rng);
        assert_eq!(parents.len(), 2);
    }

    #[test]
    fn test_probability_clamped() {
        assert_eq!(NeighborhoodSelection::new(1.5).prob_neighbor_mating, 1.0);
        assert_eq!(NeighborhoodSelection::new(-0.5).prob_neighbor_mating, 0.0);
        assert_eq!(NeighborhoodSelection::default().prob_neighbor_mating, 0.9);
    }
}
