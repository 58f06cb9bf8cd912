//! Row-band worker - computes its rows of each generation in lockstep with its peers.
//!
//! Each generation runs through four phases:
//!
//! 1. `Compute`: read the current buffer, write owned rows of the next buffer.
//! 2. `FirstBarrier`: wait until every band of the next buffer is complete.
//! 3. `Commit`: the barrier leader swaps the buffers and notifies the observer.
//! 4. `SecondBarrier`: wait until the swap is visible before computing again.

use serde::{Deserialize, Serialize};

use super::{Board, Cell, GenerationBarrier, NEIGHBOR_OFFSETS, RowRange, RowWriter, SyncError};

/// Callback invoked once per generation, after the buffers are swapped.
///
/// Runs on whichever worker thread led the first barrier, while every other
/// worker is parked at the second barrier, so the board is stable.
pub trait GenerationObserver: Sync {
    fn on_generation(&self, generation: u64, board: &Board);
}

impl<F> GenerationObserver for F
where
    F: Fn(u64, &Board) + Sync,
{
    fn on_generation(&self, generation: u64, board: &Board) {
        self(generation, board)
    }
}

/// Conway's B3/S23 rule.
#[inline]
pub fn next_state(cell: Cell, live_neighbors: u8) -> Cell {
    match (cell, live_neighbors) {
        (Cell::Alive, 2) | (Cell::Alive, 3) => Cell::Alive,
        (Cell::Dead, 3) => Cell::Alive,
        _ => Cell::Dead,
    }
}

/// Count live cells among the eight toroidal neighbors of `(row, col)`.
#[inline]
pub fn live_neighbors(board: &Board, row: i64, col: i64) -> u8 {
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|&&(dr, dc)| board.get(row + dr, col + dc).is_alive())
        .count() as u8
}

/// Compute the next state of every cell in `row`. Returns the number of cells written.
pub fn compute_row(board: &Board, writer: &RowWriter<'_>, row: usize) -> usize {
    let row = row as i64;
    let cols = board.cols();
    for col in 0..cols as i64 {
        let cell = board.get(row, col);
        writer.set_next(row, col, next_state(cell, live_neighbors(board, row, col)));
    }
    cols
}

/// Lifecycle phase of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Compute,
    FirstBarrier,
    Commit,
    SecondBarrier,
    Done,
}

/// Per-worker statistics returned when a worker finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub id: usize,
    pub range: RowRange,
    pub generations: u64,
    pub cells_updated: u64,
}

/// A worker bound to one row band of a shared board.
pub struct Worker<'a> {
    id: usize,
    board: &'a Board,
    writer: RowWriter<'a>,
    barrier: &'a GenerationBarrier,
    observer: Option<&'a dyn GenerationObserver>,
    generations: u64,
    phase: WorkerPhase,
}

impl<'a> Worker<'a> {
    pub fn new(
        id: usize,
        range: RowRange,
        board: &'a Board,
        barrier: &'a GenerationBarrier,
        generations: u64,
        observer: Option<&'a dyn GenerationObserver>,
    ) -> Self {
        Self {
            id,
            board,
            writer: board.row_writer(range),
            barrier,
            observer,
            generations,
            phase: WorkerPhase::Compute,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn range(&self) -> RowRange {
        self.writer.range()
    }

    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    fn enter(&mut self, phase: WorkerPhase) {
        log::trace!("worker {}: {:?} -> {:?}", self.id, self.phase, phase);
        self.phase = phase;
    }

    /// Run all generations to completion.
    ///
    /// Fails only if the barrier is cancelled, which happens when a peer
    /// could not be started or panicked.
    pub fn run(mut self) -> Result<WorkerStats, SyncError> {
        let _guard = CancelOnPanic(self.barrier);
        let range = self.range();
        log::debug!(
            "worker {} starting: rows {}..{}, {} generations",
            self.id,
            range.start,
            range.end,
            self.generations
        );

        let mut cells_updated = 0u64;
        for _ in 0..self.generations {
            self.enter(WorkerPhase::Compute);
            for row in range.rows() {
                cells_updated += compute_row(self.board, &self.writer, row) as u64;
            }

            self.enter(WorkerPhase::FirstBarrier);
            let wait = self.barrier.arrive()?;

            self.enter(WorkerPhase::Commit);
            if wait.is_leader() {
                self.board.swap();
                let generation = self.board.generation();
                log::trace!("worker {} committed generation {}", self.id, generation);
                if let Some(observer) = self.observer {
                    observer.on_generation(generation, self.board);
                }
            }

            self.enter(WorkerPhase::SecondBarrier);
            self.barrier.arrive()?;
        }

        self.enter(WorkerPhase::Done);
        log::debug!("worker {} done: {} cells updated", self.id, cells_updated);

        Ok(WorkerStats {
            id: self.id,
            range,
            generations: self.generations,
            cells_updated,
        })
    }
}

/// Cancels the barrier if the owning worker unwinds, so peers are not left waiting.
struct CancelOnPanic<'a>(&'a GenerationBarrier);

impl Drop for CancelOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BoardSpecs, Pattern, Seed};
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn test_rule_table() {
        for n in 0..=8u8 {
            let born = next_state(Cell::Dead, n);
            let survives = next_state(Cell::Alive, n);
            assert_eq!(born.is_alive(), n == 3, "dead cell with {n} neighbors");
            assert_eq!(survives.is_alive(), n == 2 || n == 3, "live cell with {n} neighbors");
        }
    }

    #[test]
    fn test_live_neighbors_wrap_corners() {
        let seed = Seed {
            specs: BoardSpecs::new(4, 4, 0),
            live_cells: vec![(3, 3), (0, 3), (3, 0)],
        };
        let board = Board::from_seed(&seed).unwrap();
        assert_eq!(live_neighbors(&board, 0, 0), 3);
        assert_eq!(live_neighbors(&board, 3, 3), 2);
        assert_eq!(live_neighbors(&board, 1, 1), 0);
    }

    #[test]
    fn test_small_grid_counts_repeated_neighbors() {
        // On a 1x1 torus all eight neighbors are the cell itself.
        let seed = Seed {
            specs: BoardSpecs::new(1, 1, 0),
            live_cells: vec![(0, 0)],
        };
        let board = Board::from_seed(&seed).unwrap();
        assert_eq!(live_neighbors(&board, 0, 0), 8);
    }

    #[test]
    fn test_single_worker_runs_blinker() {
        let specs = BoardSpecs::new(5, 5, 2);
        let seed = Seed::with_patterns(specs, &[(Pattern::Blinker, (2, 1))]);
        let board = Board::from_seed(&seed).unwrap();
        let initial = board.snapshot();
        let barrier = GenerationBarrier::new(1).unwrap();

        let worker = Worker::new(0, RowRange::new(0, 5), &board, &barrier, 2, None);
        assert_eq!(worker.phase(), WorkerPhase::Compute);
        let stats = worker.run().unwrap();

        assert_eq!(stats.cells_updated, 50);
        assert_eq!(board.generation(), 2);
        assert_eq!(board.snapshot(), initial);
        assert_eq!(barrier.epoch(), 4);
    }

    #[test]
    fn test_observer_called_once_per_generation() {
        let specs = BoardSpecs::new(6, 6, 3);
        let board = Board::from_seed(&Seed::with_patterns(specs, &[(Pattern::Block, (1, 1))]))
            .unwrap();
        let barrier = GenerationBarrier::new(2).unwrap();
        let seen = Mutex::new(Vec::new());
        let observer = |generation: u64, board: &Board| {
            seen.lock().unwrap().push((generation, board.live_count()));
        };

        thread::scope(|s| {
            for (id, range) in [RowRange::new(0, 3), RowRange::new(3, 6)].into_iter().enumerate() {
                let worker = Worker::new(id, range, &board, &barrier, 3, Some(&observer));
                s.spawn(move || worker.run().unwrap());
            }
        });

        assert_eq!(seen.into_inner().unwrap(), vec![(1, 4), (2, 4), (3, 4)]);
    }

    #[test]
    fn test_cancelled_barrier_stops_worker() {
        let board = Board::new(&BoardSpecs::new(2, 2, 1)).unwrap();
        let barrier = GenerationBarrier::new(2).unwrap();
        barrier.cancel();

        let worker = Worker::new(0, RowRange::new(0, 1), &board, &barrier, 1, None);
        assert_eq!(worker.run().unwrap_err(), SyncError::Cancelled);
    }
}
