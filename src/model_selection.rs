//! Information-criterion break-count selector.

use ndarray::Array1;

/// AIC-style selection of the optimal number of breakpoints.
///
/// Scores each candidate break count and tracks the running best, stopping
/// as soon as the score stops improving.
pub struct ModelSelection;

impl ModelSelection {
    /// Penalty term for `k` breaks across `m` replicates: `k + m*(8 + 6k)`.
    fn penalty(k: usize, m: usize) -> f64 {
        k as f64 + m as f64 * (8.0 + 6.0 * k as f64)
    }

    /// Scan `k = 1, 2, ...` while `k < n/4`, tracking the running maximum
    /// of `mllik[k] - penalty(k)`. Stops as soon as the score fails to
    /// improve (a `NaN` score never triggers a stop, since ordered
    /// comparisons against `NaN` are always `false` — this matches the
    /// reference algorithm's direct translation rather than adding an
    /// explicit `NaN` guard it doesn't have).
    ///
    /// Returns the largest `k` at which the score was still
    /// non-decreasing.
    pub fn select_break_count(mllik: &Array1<f64>, maxbreaks: usize, m: usize) -> usize {
        let mut best_score = f64::NEG_INFINITY;
        let mut k = 1usize;
        while k < maxbreaks {
            let score = mllik[k] - Self::penalty(k, m);
            if best_score > score {
                break;
            }
            best_score = score;
            k += 1;
        }
        k - 1
    }
}
