//! Pareto dominance, non-dominated sorting and duplicate elimination.
//!
//! All objectives are **minimized**.
//!
//! # Algorithms
//!
//! - [`dominance`]: Pareto relation between two objective vectors
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//! - [`eliminate_duplicates`]: Drops decision-vector duplicates, first occurrence wins
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use super::types::Individual;

/// Pareto relation between two objective vectors `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// `a` dominates `b`.
    Dominates,
    /// `b` dominates `a`.
    DominatedBy,
    /// Neither dominates the other (this includes equal vectors).
    NonDominated,
}

/// Compares two objective vectors for Pareto dominance (minimization).
///
/// `a` dominates `b` when it is no worse in every objective and strictly
/// better in at least one.
///
/// # Example
///
/// ```
/// use u_bcemoead::bce::multi_objective::{dominance, Dominance};
///
/// assert_eq!(dominance(&[1.0, 1.0], &[2.0, 1.0]), Dominance::Dominates);
/// assert_eq!(dominance(&[1.0, 3.0], &[2.0, 1.0]), Dominance::NonDominated);
/// assert_eq!(dominance(&[2.0, 2.0], &[2.0, 2.0]), Dominance::NonDominated);
/// ```
pub fn dominance(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Dominates,
        (false, true) => Dominance::DominatedBy,
        _ => Dominance::NonDominated,
    }
}

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, Default)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

impl NondominatedSortResult {
    /// Indices of the globally non-dominated solutions, in input order.
    pub fn first_front(&self) -> Vec<usize> {
        let mut front = self.fronts.first().cloned().unwrap_or_default();
        front.sort_unstable();
        front
    }
}

/// Fast non-dominated sorting.
///
/// Assigns a Pareto rank to each solution based on dominance relationships.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each pair of solutions, determine dominance
/// 2. Solutions dominated by no other belong to front 0 (rank 0)
/// 3. Remove front 0, repeat to find subsequent fronts
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// An empty input yields an empty result.
///
/// # Example
///
/// ```
/// use u_bcemoead::bce::multi_objective::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // Solution A
///     vec![3.0, 3.0],  // Solution B
///     vec![5.0, 1.0],  // Solution C
///     vec![4.0, 4.0],  // Solution D — dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
///
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// assert_eq!(result.first_front(), vec![0, 1, 2]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult::default();
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut front_0 = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance(&objectives[i], &objectives[j]) {
                Dominance::Dominates => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::DominatedBy => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::NonDominated => {}
            }
        }

        // All j < i have already been compared against i at this point.
        if domination_count[i] == 0 {
            front_0.push(i);
        }
    }

    let mut fronts = vec![front_0];
    loop {
        let mut next_front = Vec::new();
        if let Some(current) = fronts.last() {
            for &i in current {
                for &j in &dominated_by[i] {
                    domination_count[j] -= 1;
                    if domination_count[j] == 0 {
                        ranks[j] = fronts.len();
                        next_front.push(j);
                    }
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

/// Removes individuals whose decision vector lies within `epsilon`
/// (Euclidean distance) of an earlier member.
///
/// The first occurrence is kept and relative order is preserved.
pub fn eliminate_duplicates(population: Vec<Individual>, epsilon: f64) -> Vec<Individual> {
    let mut kept: Vec<Individual> = Vec::with_capacity(population.len());
    for ind in population {
        let duplicate = kept
            .iter()
            .any(|other| decision_distance(&other.x, &ind.x) <= epsilon);
        if !duplicate {
            kept.push(ind);
        }
    }
    kept
}

fn decision_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

// ============================================================================
// Tests
// ============================================================================
