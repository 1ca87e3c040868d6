//! Slice extraction and scoring.
//!
//! A slice is the triple of blocks (top, middle, bottom) defining a
//! candidate TAD `[start, end]`: the middle block is the candidate
//! interior, top and bottom are the off-diagonal regions immediately
//! above and below it.

use crate::block::Block;
use crate::fitter::poisson_regression;
use ndarray::Array2;

/// The three blocks of a slice, in (top, middle, bottom) order.
pub struct Slice {
    pub top: Block,
    pub mid: Block,
    pub bot: Block,
}

impl Slice {
    /// Allocate a slice's blocks to the worst-case capacity for an `n x n`
    /// compacted matrix: top/bottom `(n+1)^2/4`, middle `(n+1)^2/2`.
    pub fn with_capacity(n: usize) -> Self {
        let quarter = (n + 1) * (n + 1) / 4;
        let half = (n + 1) * (n + 1) / 2;
        Slice {
            top: Block::with_capacity(quarter),
            mid: Block::with_capacity(half),
            bot: Block::with_capacity(quarter),
        }
    }

    fn reset(&mut self) {
        self.top.reset();
        self.mid.reset();
        self.bot.reset();
    }
}

/// Extract, from one replicate, the three blocks of the slice delimited by
/// `[start, end]` (`0 <= start < end < n`), into `out`.
///
/// Cells with a missing (`NaN`) observation are skipped. In censored
/// ("speedy") mode, cells whose off-diagonal offset exceeds 200 are also
/// skipped. Main-diagonal cells (`row == col`) never belong to any block.
pub fn assemble_slice(
    obs: &Array2<f64>,
    dist: &Array2<f64>,
    lgamma: &Array2<f64>,
    start: usize,
    end: usize,
    censor_diagonal: bool,
    out: &mut Slice,
) {
    out.reset();
    let n = obs.nrows();

    for col in start..=end {
        for row in 0..n {
            let o = obs[[row, col]];
            if o.is_nan() {
                continue;
            }
            if censor_diagonal && (col as isize - row as isize).unsigned_abs() > 200 {
                continue;
            }

            let blk = if row < start {
                &mut out.top
            } else if row < col {
                &mut out.mid
            } else if row > end {
                &mut out.bot
            } else {
                continue;
            };

            let weight = (obs[[row, row]] * obs[[col, col]]).sqrt();
            blk.push(o, dist[[row, col]], weight, lgamma[[row, col]]);
        }
    }
}

/// Combine the three block log-likelihoods of a slice into one score.
///
/// Top and bottom are halved because, under matrix symmetry, each mirrors
/// off-diagonal data that the middle block does not duplicate.
pub fn score_slice(slice: &Slice) -> f64 {
    let top = poisson_regression(&slice.top);
    let mid = poisson_regression(&slice.mid);
    let bot = poisson_regression(&slice.bot);
    top / 2.0 + mid + bot / 2.0
}
