use thiserror::Error;

/// Error surface for the `tadbit` entry point.
///
/// Non-convergence of the block fitter and under-determined blocks are
/// *not* represented here: per the algorithm's design they surface as
/// `NaN` values that the segmenter silently discards (ordered comparisons
/// against `NaN` are `false`). Only failures that prevent the worker pool
/// from running at all are modeled as errors.
#[derive(Error, Debug)]
pub enum TadbitError {
    /// The shared task-queue mutex could not be constructed at setup time.
    #[error("error initializing task queue mutex: {0}")]
    MutexInit(String),

    /// `std::thread::Builder::spawn` failed for one of the workers.
    #[error("error creating worker thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),
}
