//! Exploration of promising PC individuals.
//!
//! A PC member is *promising* when the NPC population barely covers its
//! region of the front: at most one NPC member lies within the exploration
//! radius around it (normalized objective space). Each promising member is
//! recombined with a random PC mate and the offspring is offered to both
//! populations.
//!
//! The exploration radius is the PC niche radius scaled by how full the
//! archive is, `|PC| / C · R`, so a sparse archive explores with a smaller
//! neighborhood.

use super::archive::{self, InsertOutcome};
use super::config::BceConfig;
use super::decomposition::global_update;
use super::error::BceError;
use super::geometry::{cross_distances, distance_matrix, niche_radius, normalize_joint, NICHE_NEIGHBORS};
use super::runner::BceState;
use super::types::{objectives_of, BceProblem};
use rand::Rng;

/// Counters for one exploration phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplorationReport {
    /// Number of promising PC members found.
    pub promising: usize,
    /// Offspring accepted into PC.
    pub archived: usize,
    /// Offspring injected into NPC.
    pub npc_updates: usize,
}

/// Exploration radius for a normalized PC: `|PC| / capacity · R`.
///
/// A PC of a single member has radius 0.
pub fn exploration_radius(pc_normalized: &[Vec<f64>], capacity: usize) -> f64 {
    let size = pc_normalized.len();
    if size <= 1 || capacity == 0 {
        return 0.0;
    }
    let radius = niche_radius(&distance_matrix(pc_normalized), NICHE_NEIGHBORS);
    size as f64 / capacity as f64 * radius
}

/// Indices of PC members with at most one NPC member within `radius`.
///
/// Both inputs must already live in the same normalized space.
///
/// # Example
///
/// ```
/// use u_bcemoead::bce::exploration::find_promising;
///
/// let pc = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
/// let npc = vec![vec![0.05, 0.95], vec![0.0, 0.9], vec![0.9, 0.1]];
/// assert_eq!(find_promising(&pc, &npc, 0.2), vec![1]);
/// ```
pub fn find_promising(pc_normalized: &[Vec<f64>], npc_normalized: &[Vec<f64>], radius: f64) -> Vec<usize> {
    cross_distances(pc_normalized, npc_normalized)
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().filter(|&&d| d <= radius).count() <= 1)
        .map(|(i, _)| i)
        .collect()
}

/// Runs the exploration phase of one generation.
///
/// The radius and the promising set are computed once, from PC and NPC as
/// they are on entry; parents are taken from that same entry snapshot of
/// PC even while PC changes. Every offspring is evaluated, offered to PC,
/// folded into the ideal point and offered to NPC through
/// [`global_update`].
///
/// Mutates `state.pc`, `state.npc`, `state.ideal` and the evaluation count.
pub fn explore<P: BceProblem, R: Rng>(
    state: &mut BceState,
    problem: &P,
    config: &BceConfig,
    rng: &mut R,
) -> Result<ExplorationReport, BceError> {
    let mut pc_normalized = objectives_of(&state.pc);
    let mut npc_normalized = objectives_of(&state.npc);
    normalize_joint(&mut pc_normalized, &mut npc_normalized);

    let radius = exploration_radius(&pc_normalized, state.capacity());
    let promising = find_promising(&pc_normalized, &npc_normalized, radius);

    let mut report = ExplorationReport {
        promising: promising.len(),
        ..ExplorationReport::default()
    };
    if promising.is_empty() {
        return Ok(report);
    }

    let parents = state.pc.clone();
    for &p in &promising {
        let mut x = if parents.len() > 1 {
            let mate = other_index(p, parents.len(), rng);
            config
                .crossover
                .crossover(&parents[p].x, &parents[mate].x, &state.bounds, rng)
                .into_iter()
                .next()
                .unwrap_or_else(|| parents[p].x.clone())
        } else {
            parents[p].x.clone()
        };
        config.mutation.mutate(&mut x, &state.bounds, rng);

        let offspring = state.evaluate(problem, x)?;
        if let InsertOutcome::Accepted { .. } =
            archive::insert(&mut state.pc, offspring.clone(), config.insertion_rule)
        {
            report.archived += 1;
        }
        state.update_ideal(&offspring.f);

        if global_update(
            &mut state.npc,
            &state.ref_dirs,
            &offspring,
            &state.ideal,
            config.decomposition,
            rng,
        )
        .is_some()
        {
            report.npc_updates += 1;
        }
    }

    Ok(report)
}

/// Uniform index in `0..n` other than `skip`. Requires `n >= 2`.
fn other_index<R: Rng>(skip: usize, n: usize, rng: &mut R) -> usize {
    let j = rng.random_range(0..n - 1);
    if j >= skip {
        j + 1
    } else {
        j
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bce::geometry::normalize;
    use crate::bce::reference::das_dennis;
    use crate::bce::types::Individual;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Two-objective problem whose front is `f2 = 1 - f1` on `x ∈ [0, 1]`.
    struct Linear;

    impl BceProblem for Linear {
        fn n_objectives(&self) -> usize {
            2
        }
        fn bounds(&self) -> Vec<(f64, f64)> {
            vec![(0.0, 1.0), (0.0, 1.0)]
        }
        fn evaluate(&self, x: &[f64]) -> Vec<f64> {
            let g = 1.0 + x[1];
            vec![x[0] * g, (1.0 - x[0]) * g]
        }
    }

    fn state_from(points: &[[f64; 2]]) -> BceState {
        let dirs = das_dennis(2, points.len() - 1);
        let pop = points
            .iter()
            .map(|x| Individual::new(x.to_vec(), Linear.evaluate(x)))
            .collect();
        BceState::from_population(&Linear, &dirs, &BceConfig::default().with_n_neighbors(3), pop)
            .expect("valid state")
    }

    #[test]
    fn test_radius_single_member_is_zero() {
        assert_eq!(exploration_radius(&[vec![0.3, 0.7]], 5), 0.0);
    }

    #[test]
    fn test_radius_scales_with_fill() {
        let mut pc = vec![
            vec![1.0, 5.0],
            vec![2.0, 4.0],
            vec![3.0, 3.0],
            vec![4.0, 2.0],
            vec![5.0, 1.0],
        ];
        normalize(&mut pc);
        let full = exploration_radius(&pc, 5);
        let half = exploration_radius(&pc, 10);
        assert!(full > 0.0);
        assert!((full - 2.0 * half).abs() < 1e-12);
    }

    #[test]
    fn test_find_promising_counts_inclusive_radius() {
        let pc = vec![vec![0.0, 0.0]];
        // Two NPC members exactly on the radius
        let npc = vec![vec![0.5, 0.0], vec![0.0, 0.5]];
        assert!(find_promising(&pc, &npc, 0.5).is_empty());
        assert_eq!(find_promising(&pc, &npc, 0.49), vec![0]);
    }

    #[test]
    fn test_find_promising_zero_radius() {
        let pc = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let npc = vec![vec![0.0, 1.0], vec![0.0, 1.0], vec![0.5, 0.5]];
        assert_eq!(find_promising(&pc, &npc, 0.0), vec![1]);
    }

    #[test]
    fn test_other_index_never_returns_skip() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut hits = [0usize; 4];
        for _ in 0..400 {
            let j = other_index(2, 4, &mut rng);
            assert_ne!(j, 2);
            hits[j] += 1;
        }
        assert!(hits[0] > 0 && hits[1] > 0 && hits[3] > 0);
    }

    #[test]
    fn test_explore_no_promising_is_noop() {
        // Both NPC members sit on the only PC member
        let mut state = state_from(&[[0.0, 0.0], [1.0, 0.0]]);
        let pc = state.pc().to_vec();
        state.npc = vec![pc[0].clone(), pc[0].clone()];
        state.pc = vec![pc[0].clone()];
        let before_evals = state.evaluations();

        let mut rng = StdRng::seed_from_u64(1);
        let report = explore(&mut state, &Linear, &BceConfig::default(), &mut rng).unwrap();
        assert_eq!(report.promising, 0);
        assert_eq!(state.evaluations(), before_evals);
    }

    #[test]
    fn test_explore_evaluates_one_offspring_per_promising_member() {
        let mut state = state_from(&[[0.0, 0.5], [0.25, 0.5], [0.5, 0.5], [0.75, 0.5], [1.0, 0.5]]);
        // NPC far away from the front leaves every PC member uncovered
        state.npc = vec![Individual::new(vec![1.0, 1.0], vec![10.0, 10.0]); 5];
        let before_evals = state.evaluations();
        let ideal_before = state.ideal().to_vec();

        let mut rng = StdRng::seed_from_u64(42);
        let report = explore(&mut state, &Linear, &BceConfig::default(), &mut rng).unwrap();

        assert_eq!(report.promising, 5);
        assert_eq!(state.evaluations() - before_evals, 5);
        assert_eq!(state.npc().len(), 5);
        assert!(report.npc_updates >= 1 && report.npc_updates <= 5);
        for (now, before) in state.ideal().iter().zip(&ideal_before) {
            assert!(now <= before);
        }
    }

    #[test]
    fn test_explore_single_member_pc() {
        let mut state = state_from(&[[0.5, 0.0], [0.5, 1.0], [0.5, 0.5]]);
        assert_eq!(state.pc().len(), 1);

        let mut rng = StdRng::seed_from_u64(3);
        let report = explore(&mut state, &Linear, &BceConfig::default(), &mut rng).unwrap();
        assert_eq!(report.promising, 1);
        assert_eq!(state.npc().len(), 3);
    }
}
