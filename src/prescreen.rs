//! Directionality-index heuristic pre-screen.
//!
//! Marks `(i, j)` slice endpoints unlikely to be TAD boundaries so the
//! matrix filler can skip them. Pure function of `(obs, speed)`; the
//! filler consumes its output read-only.

use ndarray::Array2;

const DI_LENGTH: usize = 10;

/// Value at position `floor((n-1)*quantile)` of the descending-sorted copy
/// of `data`. Intentionally *not* statrs's (interpolated) quantile: the
/// original heuristic uses this exact nearest-rank definition and the
/// pre-screen's cutoff depends on reproducing it precisely.
fn descending_quantile(data: &[f64], quantile: f64) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let q = quantile.clamp(0.0, 1.0);
    let mut copy = data.to_vec();
    // `partial_cmp` is `None` only for NaN operands; treat those as equal
    // rather than unwrapping, matching the C comparator's `(*da < *db) -
    // (*da > *db)`, which yields 0 (equal) for NaN on either side instead of
    // trapping.
    copy.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((copy.len() - 1) as f64 * q) as usize;
    copy[idx]
}

/// Compute the differentiated directionality index used by the pre-screen.
fn directionality_index(obs: &[Array2<f64>], n: usize) -> Vec<f64> {
    let mut di = vec![0.0; n];
    if n <= 2 * DI_LENGTH {
        return di;
    }

    for i in DI_LENGTH..n - DI_LENGTH {
        let mut acc = 0.0;
        for replicate in obs {
            for j in 1..=DI_LENGTH {
                let up = (replicate[[i, i]] * replicate[[i - j, i - j]]).sqrt();
                let down = (replicate[[i, i]] * replicate[[i + j, i + j]]).sqrt();
                acc += replicate[[i - j, i]] / up;
                acc -= replicate[[i, i + j]] / down;
            }
        }
        di[i] = acc;
    }

    // Differentiate in place with a cyclic boundary.
    let first = di[DI_LENGTH];
    for i in DI_LENGTH..n - DI_LENGTH - 1 {
        di[i] = di[i + 1] - di[i];
    }
    di[n - DI_LENGTH - 1] = first - di[n - DI_LENGTH - 1];

    di
}

/// Number of diagonal offsets `(i, j)` with `j - i` a speed-prohibited span.
fn span_too_large_for_speed(speed: u8, i: usize, j: usize, n: usize) -> bool {
    let span = j - i;
    match speed {
        3 => span > n / 2,
        4 => span > n / 4,
        5 => span > n / 8,
        _ => false,
    }
}

/// Compute the `n x n` skip mask. `speed == 0` disables the heuristic
/// entirely (every candidate cell is computed); `speed >= 1` activates the
/// directionality-index heuristic; `speed` in `{3, 4, 5}` additionally caps
/// the allowed span.
///
/// Only cells with `i < j - 2` are ever candidates; all others are `true`
/// (skip) regardless of `speed`, matching the "all cells initially skipped"
/// default before the candidate set is carved out.
pub fn skip_mask(obs: &[Array2<f64>], speed: u8) -> Array2<bool> {
    let n = obs[0].nrows();
    let mut skip = Array2::from_elem((n, n), true);

    if n < 4 {
        return skip;
    }

    for i in 0..n.saturating_sub(3) {
        for j in i + 3..n {
            skip[[i, j]] = false;
        }
    }

    if speed == 0 {
        return skip;
    }

    let di = directionality_index(obs, n);

    // `n <= 2*DI_LENGTH` leaves no interior index for a MAD estimate (and is
    // exactly the regime where `directionality_index` returns all zeros);
    // fall back to the 200-bin quantile alone, mirroring the C's behavior
    // when its MAD-accumulation loop range is empty.
    let cutoff = if n > 2 * DI_LENGTH {
        let interior = &di[DI_LENGTH..n - DI_LENGTH];
        let abs_di: Vec<f64> = interior.iter().map(|v| v.abs()).collect();
        let mad = 1.4826 * descending_quantile(&abs_di, 0.5);
        let cut200 = descending_quantile(&di, 200.0 / n as f64);
        cut200.min(1.95 * mad)
    } else {
        descending_quantile(&di, 200.0 / n as f64)
    };

    for i in 0..n.saturating_sub(3) {
        for j in i + 3..n {
            if skip[[i, j]] {
                continue;
            }
            if span_too_large_for_speed(speed, i, j, n) {
                skip[[i, j]] = true;
                continue;
            }
            let ii = i < DI_LENGTH + 1 || i > n - DI_LENGTH - 2 || di[i - 1] > cutoff;
            let jj = j < DI_LENGTH + 1 || j > n - DI_LENGTH - 2 || di[j] > cutoff;
            skip[[i, j]] = !(ii && jj);
        }
    }

    skip
}
