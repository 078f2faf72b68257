//! Objective-space geometry: normalization, distances and niche radius.
//!
//! Everything here works on plain objective matrices (`&[Vec<f64>]`, one
//! row per individual) so the archive and exploration code can run on
//! normalized copies while the populations keep their raw values.

/// Number of nearest neighbors used to estimate the niche radius.
pub const NICHE_NEIGHBORS: usize = 3;

/// Per-column minimum and maximum of an objective matrix.
fn column_bounds(objectives: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let m = objectives.first().map_or(0, Vec::len);
    let mut fmin = vec![f64::INFINITY; m];
    let mut fmax = vec![f64::NEG_INFINITY; m];
    for row in objectives {
        for (j, &v) in row.iter().enumerate().take(m) {
            fmin[j] = fmin[j].min(v);
            fmax[j] = fmax[j].max(v);
        }
    }
    (fmin, fmax)
}

/// Rescales every objective column to `[0, 1]` using its own min and max.
///
/// A column whose max equals its min is set to 0 for every row.
///
/// # Example
///
/// ```
/// use u_bcemoead::bce::geometry::normalize;
///
/// let mut objs = vec![vec![1.0, 7.0], vec![3.0, 7.0], vec![2.0, 7.0]];
/// normalize(&mut objs);
/// assert_eq!(objs, vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.5, 0.0]]);
/// ```
pub fn normalize(objectives: &mut [Vec<f64>]) {
    let (fmin, fmax) = column_bounds(objectives);
    for row in objectives.iter_mut() {
        for (j, v) in row.iter_mut().enumerate().take(fmin.len()) {
            let range = fmax[j] - fmin[j];
            *v = if range == 0.0 { 0.0 } else { (*v - fmin[j]) / range };
        }
    }
}

/// Normalizes PC and NPC objectives with the column bounds of PC alone.
///
/// NPC values are not clamped and may fall outside `[0, 1]`. For a column
/// that is constant across PC, the PC column becomes 0 and the NPC column
/// is only shifted by the PC minimum.
pub fn normalize_joint(pc: &mut [Vec<f64>], npc: &mut [Vec<f64>]) {
    let (fmin, fmax) = column_bounds(pc);
    for j in 0..fmin.len() {
        let range = fmax[j] - fmin[j];
        if range == 0.0 {
            for row in pc.iter_mut() {
                row[j] = 0.0;
            }
            for row in npc.iter_mut() {
                row[j] -= fmin[j];
            }
        } else {
            for row in pc.iter_mut() {
                row[j] = (row[j] - fmin[j]) / range;
            }
            for row in npc.iter_mut() {
                row[j] = (row[j] - fmin[j]) / range;
            }
        }
    }
}

/// Euclidean distance between two points.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Pairwise distances between the rows of `a` and the rows of `b`.
pub fn cross_distances(a: &[Vec<f64>], b: &[Vec<f64>]) -> Vec<Vec<f64>> {
    a.iter()
        .map(|p| b.iter().map(|q| euclidean(p, q)).collect())
        .collect()
}

/// Square distance matrix of a point set with zero entries set to infinity.
///
/// This removes self-matches on the diagonal and also makes exact
/// duplicates invisible to each other.
pub fn distance_matrix(objectives: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut d = cross_distances(objectives, objectives);
    for row in d.iter_mut() {
        for v in row.iter_mut() {
            if *v == 0.0 {
                *v = f64::INFINITY;
            }
        }
    }
    d
}

/// Estimates the niche radius from a distance matrix.
///
/// For every row the `k` smallest distances are taken (fewer if the
/// population is smaller than `k`), and each rank position is averaged
/// over all rows. The result is the average at the largest rank whose
/// value is finite. If no rank is finite, the radius is 0.
///
/// # Example
///
/// ```
/// use u_bcemoead::bce::geometry::{distance_matrix, niche_radius};
///
/// let points = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
/// let d = distance_matrix(&points);
/// // Only one neighbor each; the second rank is infinite and skipped
/// assert!((niche_radius(&d, 3) - 2f64.sqrt()).abs() < 1e-12);
/// ```
pub fn niche_radius(distances: &[Vec<f64>], k: usize) -> f64 {
    let n = distances.len();
    let size = k.min(n);
    if size == 0 {
        return 0.0;
    }

    let mut sums = vec![0.0f64; size];
    for row in distances {
        let mut sorted = row.clone();
        sorted.sort_by(f64::total_cmp);
        for (j, sum) in sums.iter_mut().enumerate() {
            *sum += sorted.get(j).copied().unwrap_or(f64::INFINITY);
        }
    }

    sums.iter()
        .rev()
        .map(|s| s / n as f64)
        .find(|avg| avg.is_finite())
        .unwrap_or(0.0)
}
