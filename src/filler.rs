//! Worker-pool driver that fills the upper-triangular slice
//! log-likelihood matrix `L[i,j]`.
//!
//! A single shared task index walks `0..n*n` (encoded `q = i + j*n`,
//! matching the original column-major task encoding); a mutex protects
//! its read-modify-write and the skip-scan advance. Each worker fits its
//! assigned cells entirely from thread-local [`Slice`] storage and returns
//! its `(i, j, value)` results rather than writing into a shared matrix —
//! distinct workers never touch the same cell, so no lock is needed around
//! `L` itself, and collecting results after the join barrier keeps the
//! whole fill phase free of unsafe code.

use crate::error::TadbitError;
use crate::slice_::{assemble_slice, score_slice, Slice};
use ndarray::Array2;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

struct FillerContext {
    queue: Mutex<usize>,
    processed: AtomicUsize,
    to_process: usize,
}

impl FillerContext {
    /// Pop the next non-skipped job index, or `None` if the queue is
    /// drained.
    fn next_job(&self, n: usize, skip: &Array2<bool>) -> Result<Option<usize>, TadbitError> {
        let mut q = self
            .queue
            .lock()
            .map_err(|e| TadbitError::MutexInit(e.to_string()))?;
        while *q < n * n && skip[[*q % n, *q / n]] {
            *q += 1;
        }
        if *q >= n * n {
            return Ok(None);
        }
        let job = *q;
        *q += 1;
        Ok(Some(job))
    }
}

#[allow(clippy::too_many_arguments)]
fn worker_loop(
    ctx: &FillerContext,
    n: usize,
    obs: &[Array2<f64>],
    dist: &Array2<f64>,
    lgamma: &[Array2<f64>],
    skip: &Array2<bool>,
    censor_diagonal: bool,
    verbose: bool,
) -> Result<Vec<(usize, usize, f64)>, TadbitError> {
    let mut slice = Slice::with_capacity(n);
    let mut results = Vec::new();

    while let Some(job) = ctx.next_job(n, skip)? {
        let i = job % n;
        let j = job / n;

        let mut value = 0.0;
        for k in 0..obs.len() {
            assemble_slice(&obs[k], dist, &lgamma[k], i, j, censor_diagonal, &mut slice);
            value += score_slice(&slice);
        }
        results.push((i, j, value));

        let done = ctx.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if verbose {
            let pct = 99 * done / ctx.to_process.max(1);
            eprint!("computing likelihood ({pct}% done)\r");
        }
    }

    Ok(results)
}

/// Fill `L[i,j]` for every candidate cell (`skip[i,j] == false`) with the
/// summed slice log-likelihood across all replicates; every other cell is
/// `NaN`. `n_threads == 0` resolves to [`std::thread::available_parallelism`].
#[allow(clippy::too_many_arguments)]
pub fn fill_loglik_matrix(
    obs: &[Array2<f64>],
    dist: &Array2<f64>,
    lgamma: &[Array2<f64>],
    skip: &Array2<bool>,
    n_threads: usize,
    censor_diagonal: bool,
    verbose: bool,
) -> Result<Array2<f64>, TadbitError> {
    let n = dist.nrows();
    let mut llikmat = Array2::from_elem((n, n), f64::NAN);

    let to_process = skip.iter().filter(|&&s| !s).count();
    if to_process == 0 {
        return Ok(llikmat);
    }

    let workers = if n_threads == 0 {
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    } else {
        n_threads
    };

    let ctx = FillerContext {
        queue: Mutex::new(0),
        processed: AtomicUsize::new(0),
        to_process,
    };

    let all_results: Result<Vec<Vec<(usize, usize, f64)>>, TadbitError> =
        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for _ in 0..workers {
                let handle = std::thread::Builder::new()
                    .spawn_scoped(scope, || {
                        worker_loop(&ctx, n, obs, dist, lgamma, skip, censor_diagonal, verbose)
                    })
                    .map_err(TadbitError::ThreadSpawn)?;
                handles.push(handle);
            }

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|_| Ok(Vec::new())))
                .collect()
        });

    for results in all_results? {
        for (i, j, value) in results {
            llikmat[[i, j]] = value;
        }
    }

    if verbose {
        eprintln!("computing likelihood (100% done)");
    }

    Ok(llikmat)
}
