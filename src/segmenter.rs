//! Dynamic-programming segmentation over the slice log-likelihood matrix.
//!
//! For each number of breaks `0..maxbreaks`, find the placement of
//! breakpoints that maximises the total log-likelihood, carrying forward
//! the best segmentation's breakpoint set as the DP advances.

use ndarray::{Array1, Array2};

/// Run the DP recurrence and return `(mllik, bkpts)`.
///
/// `mllik[k]` is the maximum total log-likelihood with exactly `k` breaks;
/// `bkpts[[j, k]]` is `1` iff index `j` is a breakpoint in that optimum.
///
/// `mllik[0]` is left `NaN`: the recurrence below only ever assigns
/// `mllik[nbreaks]` for `nbreaks >= 1` (the zero-break case is never
/// revisited once the single-segment initialisation seeds `old_llik`), and
/// the model selector likewise only ever reads `mllik[k]` for `k >= 1`. This
/// mirrors the reference algorithm's own behaviour rather than an
/// oversight: "zero breaks" is represented implicitly by the
/// initialisation, not by a materialised `mllik` entry.
pub fn segment(llikmat: &Array2<f64>, maxbreaks: usize) -> (Array1<f64>, Array2<u8>) {
    let n = llikmat.nrows();
    let mut bkpts = Array2::<u8>::zeros((n, maxbreaks));
    if maxbreaks == 0 {
        return (Array1::from_elem(0, f64::NAN), bkpts);
    }

    let mut mllik = Array1::from_elem(maxbreaks, f64::NAN);

    let mut old_llik: Vec<f64> = (0..n).map(|i| llikmat[[0, i]]).collect();
    let mut new_llik = vec![f64::NEG_INFINITY; n];

    let mut old_bkpt_list = Array2::<u8>::zeros((n, n));
    let mut new_bkpt_list = Array2::<u8>::zeros((n, n));

    for nbreaks in 1..maxbreaks {
        old_bkpt_list.assign(&new_bkpt_list);

        for j in (3 * nbreaks + 2)..n {
            new_llik[j] = f64::NEG_INFINITY;
            let mut new_bkpt: Option<usize> = None;

            for i in (3 * nbreaks)..(j - 3) {
                // NaN in either operand makes this comparison false, so
                // undefined candidates are silently rejected.
                let t = old_llik[i - 1] + llikmat[[i, j]];
                if t > new_llik[j] {
                    new_llik[j] = t;
                    new_bkpt = Some(i - 1);
                }
            }

            if let Some(nb) = new_bkpt {
                for flag in 0..n {
                    new_bkpt_list[[flag, j]] = old_bkpt_list[[flag, nb]];
                }
                new_bkpt_list[[nb, j]] = 1;
            }
        }

        mllik[nbreaks] = new_llik[n - 1];
        old_llik.copy_from_slice(&new_llik);
        for flag in 0..n {
            bkpts[[flag, nbreaks]] = new_bkpt_list[[flag, n - 1]];
        }
    }

    (mllik, bkpts)
}
