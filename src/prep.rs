//! Removal mask, matrix compaction, and the derived distance/log-gamma
//! matrices consumed by the rest of the pipeline.

use ndarray::Array2;
use statrs::function::gamma::ln_gamma;

/// Everything the pipeline needs after rows/columns with a near-zero
/// diagonal have been removed from every replicate.
pub struct Prepared {
    /// Compacted `n x n` replicates.
    pub obs: Vec<Array2<f64>>,
    /// Compacted `n x n` log-distance-to-diagonal matrix.
    pub dist: Array2<f64>,
    /// Compacted `n x n` per-replicate `log(Gamma(obs + 1))` matrices.
    pub lgamma: Vec<Array2<f64>>,
    /// `true` at original index `i` iff row/column `i` was removed.
    pub removed: Vec<bool>,
    /// Number of kept indices (the compacted dimension).
    pub n: usize,
}

/// Build the full `N x N` log-distance-to-diagonal matrix, `D[i,j] =
/// log(|i-j|)`. The main diagonal is `-inf` and is never consulted because
/// diagonal cells are excluded from every block.
fn full_distance_matrix(size: usize) -> Array2<f64> {
    Array2::from_shape_fn((size, size), |(i, j)| {
        let d = (i as isize - j as isize).unsigned_abs();
        if d == 0 {
            f64::NEG_INFINITY
        } else {
            (d as f64).ln()
        }
    })
}

/// Remove rows/columns whose diagonal entry is `< 1.0` in any replicate,
/// and precompute the distance and log-gamma matrices over the compacted
/// indices.
pub fn prepare(obs: &[Array2<f64>]) -> Prepared {
    let size = obs[0].nrows();
    let mut removed = vec![false; size];
    for i in 0..size {
        for replicate in obs {
            if replicate[[i, i]] < 1.0 {
                removed[i] = true;
                break;
            }
        }
    }

    let kept: Vec<usize> = (0..size).filter(|&i| !removed[i]).collect();
    let n = kept.len();

    let full_dist = full_distance_matrix(size);
    let dist = Array2::from_shape_fn((n, n), |(r, c)| full_dist[[kept[r], kept[c]]]);

    let mut compacted_obs = Vec::with_capacity(obs.len());
    let mut lgamma = Vec::with_capacity(obs.len());
    for replicate in obs {
        let compacted = Array2::from_shape_fn((n, n), |(r, c)| replicate[[kept[r], kept[c]]]);
        let lg = compacted.mapv(|v| ln_gamma(v + 1.0));
        compacted_obs.push(compacted);
        lgamma.push(lg);
    }

    Prepared {
        obs: compacted_obs,
        dist,
        lgamma,
        removed,
        n,
    }
}
