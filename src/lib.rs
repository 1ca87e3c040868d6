//! TAD calling for Hi-C contact matrices.
//!
//! Segments a symmetric `N x N` matrix of interaction counts into
//! contiguous diagonal blocks ("Topologically Associating Domains") whose
//! within-block counts are well explained by a Poisson regression model.
//! Given one or more replicate matrices, [`tadbit`] picks both the
//! positions and the number of breakpoints maximising a penalised
//! log-likelihood.
//!
//! The pipeline: a removal mask + compaction pass ([`prep`]), an optional
//! directionality-index pre-screen ([`prescreen`]) that marks unpromising
//! slice endpoints, a parallel worker pool ([`filler`]) that fits each
//! remaining candidate slice via Poisson regression ([`fitter`], via
//! [`slice_`]), and a dynamic-programming segmenter ([`segmenter`]) whose
//! per-break-count optima are scored by an information criterion
//! ([`model_selection`]).

pub mod block;
pub mod error;
pub mod filler;
pub mod fitter;
pub mod model_selection;
pub mod prep;
pub mod prescreen;
pub mod segmenter;
pub mod slice_;

pub use error::TadbitError;
pub use model_selection::ModelSelection;

use ndarray::{Array1, Array2};

/// Caller-facing speed knob.
///
/// `Off` disables the heuristic pre-screen entirely (every candidate slice
/// is computed). `Fast`/`Faster`/`Fastest` additionally cap the allowed
/// breakpoint span to `n/2`, `n/4`, `n/8` respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    /// No pre-screen, no diagonal censor: every candidate slice is
    /// computed in full.
    Off,
    /// Directionality-index pre-screen active; no span cap.
    Default,
    /// Pre-screen active; the slice assembler also censors observations
    /// more than 200 bins from the diagonal.
    Censored,
    /// `Censored`, plus breakpoint spans larger than `n/2` are skipped.
    Fast,
    /// `Censored`, plus spans larger than `n/4` are skipped.
    Faster,
    /// `Censored`, plus spans larger than `n/8` are skipped.
    Fastest,
}

impl Speed {
    fn level(self) -> u8 {
        match self {
            Speed::Off => 0,
            Speed::Default => 1,
            Speed::Censored => 2,
            Speed::Fast => 3,
            Speed::Faster => 4,
            Speed::Fastest => 5,
        }
    }

    fn censors_diagonal(self) -> bool {
        self.level() > 1
    }
}

/// Caller-facing configuration for [`tadbit`].
#[derive(Debug, Clone, Copy)]
pub struct TadbitConfig {
    /// Worker thread count; `0` resolves to
    /// [`std::thread::available_parallelism`].
    pub n_threads: usize,
    /// Emit `"computing likelihood (P% done)"` progress to `stderr`.
    pub verbose: bool,
    /// Pre-screen / censoring aggressiveness.
    pub speed: Speed,
}

impl Default for TadbitConfig {
    fn default() -> Self {
        TadbitConfig {
            n_threads: 0,
            verbose: false,
            speed: Speed::Default,
        }
    }
}

/// Result of a [`tadbit`] call, in original (uncompacted) coordinates.
#[derive(Debug)]
pub struct TadbitOutput {
    /// `n / 4` on the compacted dimension.
    pub maxbreaks: usize,
    /// Optimal break count per the AIC-style model selector.
    pub nbreaks_opt: usize,
    /// `N x N` matrix of slice log-likelihoods; rows/columns of removed
    /// indices are `NaN`.
    pub llikmat: Array2<f64>,
    /// Length-`maxbreaks` vector of per-break-count log-likelihoods.
    pub mllik: Array1<f64>,
    /// `N x maxbreaks` matrix of 0/1 breakpoint flags; rows of removed
    /// indices are all zero.
    pub bkpts: Array2<u8>,
}

/// Identify TADs in `obs`, `m` replicate `N x N` contact matrices.
///
/// Returns `Err` only if the worker pool could not be started (mutex
/// construction or thread-spawn failure); non-convergent block fits and
/// degenerate inputs are represented in the output rather than as errors
/// (see `error.rs`).
pub fn tadbit(obs: &[Array2<f64>], config: TadbitConfig) -> Result<TadbitOutput, TadbitError> {
    let big_n = obs[0].nrows();
    let m = obs.len();

    let prepared = prep::prepare(obs);
    let n = prepared.n;

    if n < 4 {
        return Ok(TadbitOutput {
            maxbreaks: 0,
            nbreaks_opt: 0,
            llikmat: Array2::from_elem((big_n, big_n), f64::NAN),
            mllik: Array1::from_elem(0, f64::NAN),
            bkpts: Array2::<u8>::zeros((big_n, 0)),
        });
    }

    let skip = prescreen::skip_mask(&prepared.obs, config.speed.level());

    let llikmat_compact = filler::fill_loglik_matrix(
        &prepared.obs,
        &prepared.dist,
        &prepared.lgamma,
        &skip,
        config.n_threads,
        config.speed.censors_diagonal(),
        config.verbose,
    )?;

    let maxbreaks = n / 4;
    let (mllik, bkpts_compact) = segmenter::segment(&llikmat_compact, maxbreaks);
    let nbreaks_opt = ModelSelection::select_break_count(&mllik, maxbreaks, m);

    let kept: Vec<usize> = (0..big_n).filter(|&i| !prepared.removed[i]).collect();

    let mut llikmat = Array2::from_elem((big_n, big_n), f64::NAN);
    for (r, &i) in kept.iter().enumerate() {
        for (c, &j) in kept.iter().enumerate() {
            llikmat[[i, j]] = llikmat_compact[[r, c]];
        }
    }

    let mut bkpts = Array2::<u8>::zeros((big_n, maxbreaks));
    for (r, &i) in kept.iter().enumerate() {
        for k in 0..maxbreaks {
            bkpts[[i, k]] = bkpts_compact[[r, k]];
        }
    }

    Ok(TadbitOutput {
        maxbreaks,
        nbreaks_opt,
        llikmat,
        mllik,
        bkpts,
    })
}
