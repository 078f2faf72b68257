//! Weight-vector neighborhoods.
//!
//! Each subproblem `i` owns the `K` weight vectors closest to its own
//! (itself included), ranked by Euclidean distance. The graph is built
//! once per run and never changes.

use super::geometry::euclidean;

/// Precomputed `K`-nearest-neighbor graph over the reference directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighborhood {
    neighbors: Vec<Vec<usize>>,
}

impl Neighborhood {
    /// Builds the graph for `ref_dirs` with `n_neighbors` entries per row.
    ///
    /// `n_neighbors` is clamped to the number of reference directions.
    /// Ties in distance keep the lower index first.
    ///
    /// # Example
    ///
    /// ```
    /// use u_bcemoead::bce::Neighborhood;
    ///
    /// let dirs = vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]];
    /// let hood = Neighborhood::new(&dirs, 2);
    /// assert_eq!(hood.of(0), &[0, 1]);
    /// assert_eq!(hood.of(2), &[2, 1]);
    /// ```
    pub fn new(ref_dirs: &[Vec<f64>], n_neighbors: usize) -> Self {
        let k = n_neighbors.min(ref_dirs.len());
        let neighbors = ref_dirs
            .iter()
            .map(|w| {
                let mut order: Vec<(usize, f64)> = ref_dirs
                    .iter()
                    .enumerate()
                    .map(|(j, other)| (j, euclidean(w, other)))
                    .collect();
                order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
                order.into_iter().take(k).map(|(j, _)| j).collect()
            })
            .collect();
        Self { neighbors }
    }

    /// Neighbor indices of subproblem `i`, nearest first.
    pub fn of(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    /// Number of subproblems.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the graph has no subproblems.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors per subproblem.
    pub fn size(&self) -> usize {
        self.neighbors.first().map_or(0, Vec::len)
    }
}
