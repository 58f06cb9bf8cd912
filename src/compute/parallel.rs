//! Rayon engine - data-parallel rows with a fork-join per generation.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;

use super::{Board, GenerationObserver, RowRange, compute_row};
use crate::error::LifeError;

/// Advance the board by one generation on the current rayon pool.
///
/// The fork-join of `par_iter` stands in for the two barrier passes: every
/// row is written before `swap`, and the swap completes before the next call.
pub fn rayon_step(board: &Board) -> u64 {
    let writer = board.row_writer(RowRange::new(0, board.rows()));
    let cells: usize = (0..board.rows())
        .into_par_iter()
        .map(|row| compute_row(board, &writer, row))
        .sum();
    board.swap();
    cells as u64
}

/// Run `generations` updates on a dedicated pool of `threads` threads.
///
/// A panic in a row task or in the observer is reported as
/// [`LifeError::PoolPanicked`] instead of unwinding into the caller.
pub fn rayon_run(
    board: &Board,
    generations: u64,
    threads: usize,
    observer: Option<&dyn GenerationObserver>,
) -> Result<u64, LifeError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("life-rayon-{i}"))
        .build()?;

    let run = || {
        let mut cells = 0u64;
        for _ in 0..generations {
            cells += rayon_step(board);
            if let Some(observer) = observer {
                observer.on_generation(board.generation(), board);
            }
        }
        cells
    };

    // `install` resumes a panic from the pool on this thread.
    panic::catch_unwind(AssertUnwindSafe(|| pool.install(run))).map_err(|_| {
        log::error!("rayon engine panicked at generation {}", board.generation());
        LifeError::PoolPanicked {
            generation: board.generation(),
        }
    })
}
