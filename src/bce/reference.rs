//! Reference direction generation.
//!
//! BCE-MOEA/D takes its weight vectors as input; [`das_dennis`] is the
//! usual way to produce them.

/// Generates Das-Dennis (simplex-lattice) reference directions.
///
/// Returns `C(H + M - 1, M - 1)` uniformly spaced points on the
/// `M`-dimensional unit simplex, where `M = n_objectives` and
/// `H = divisions`. Returns an empty set when either argument is zero.
///
/// # Example
///
/// ```
/// use u_bcemoead::bce::das_dennis;
///
/// let dirs = das_dennis(2, 4);
/// assert_eq!(dirs.len(), 5);
/// assert_eq!(dirs[0], vec![0.0, 1.0]);
/// assert_eq!(dirs[4], vec![1.0, 0.0]);
/// ```
///
/// # References
///
/// Das & Dennis (1998), "Normal-Boundary Intersection: A New Method for
/// Generating the Pareto Surface in Nonlinear Multicriteria Optimization Problems"
pub fn das_dennis(n_objectives: usize, divisions: usize) -> Vec<Vec<f64>> {
    if n_objectives == 0 || divisions == 0 {
        return Vec::new();
    }
    let mut points = Vec::new();
    let mut point = vec![0.0_f64; n_objectives];
    das_dennis_recursive(n_objectives, divisions, 0, divisions, &mut point, &mut points);
    points
}

fn das_dennis_recursive(
    n_objectives: usize,
    divisions: usize,
    depth: usize,
    remaining: usize,
    current: &mut Vec<f64>,
    result: &mut Vec<Vec<f64>>,
) {
    if depth == n_objectives - 1 {
        current[depth] = remaining as f64 / divisions as f64;
        result.push(current.clone());
        return;
    }

    for i in 0..=remaining {
        current[depth] = i as f64 / divisions as f64;
        das_dennis_recursive(n_objectives, divisions, depth + 1, remaining - i, current, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_matches_binomial() {
        // C(12 + 3 - 1, 2) = 91
        assert_eq!(das_dennis(3, 12).len(), 91);
        // C(99 + 2 - 1, 1) = 100
        assert_eq!(das_dennis(2, 99).len(), 100);
    }

    #[test]
    fn test_points_on_simplex() {
        for w in das_dennis(3, 6) {
            let sum: f64 = w.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
            assert!(w.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_degenerate_arguments() {
        assert!(das_dennis(0, 4).is_empty());
        assert!(das_dennis(3, 0).is_empty());
        assert_eq!(das_dennis(1, 3), vec![vec![1.0]]);
    }
}
