//! Double-buffered board shared by all workers.
//!
//! Cells live in two flat row-major buffers of `AtomicU8`. One buffer is
//! "current" (read during a generation) and the other is "next" (written
//! during a generation). `swap` flips a selector; buffers are never
//! reallocated after construction.
//!
//! All cell accesses use `Relaxed` ordering. Visibility between generations
//! comes from the barrier that separates the compute and swap phases.

use std::sync::atomic::{AtomicU8, AtomicU64, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::{GridGeometry, RowRange};
use crate::error::LifeError;
use crate::schema::{BoardSpecs, Seed};

/// State of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}

impl Cell {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    #[inline]
    fn from_u8(v: u8) -> Self {
        if v == 0 { Cell::Dead } else { Cell::Alive }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }
}

/// Shared Game of Life board with current/next generation buffers.
pub struct Board {
    geometry: GridGeometry,
    buffers: [Vec<AtomicU8>; 2],
    /// Index into `buffers` of the current generation.
    front: AtomicUsize,
    /// Number of completed swaps.
    generation: AtomicU64,
}

impl Board {
    /// Create an all-dead board.
    ///
    /// Fails with [`LifeError::Config`] for invalid dimensions and
    /// [`LifeError::Allocation`] if either buffer cannot be allocated.
    pub fn new(specs: &BoardSpecs) -> Result<Self, LifeError> {
        specs.validate()?;
        let geometry = GridGeometry::new(specs.rows, specs.cols);
        let current = alloc_cells(geometry.cell_count())?;
        let next = alloc_cells(geometry.cell_count())?;

        Ok(Self {
            geometry,
            buffers: [current, next],
            front: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
        })
    }

    /// Create a board with the seed's live cells set in the current buffer.
    pub fn from_seed(seed: &Seed) -> Result<Self, LifeError> {
        let board = Self::new(&seed.specs)?;
        let current = board.current();
        for &(row, col) in &seed.live_cells {
            let idx = board.geometry.index(row as i64, col as i64);
            current[idx].store(Cell::Alive as u8, Ordering::Relaxed);
        }
        Ok(board)
    }

    #[inline]
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.geometry.rows()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.geometry.cols()
    }

    /// Number of generations applied so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    #[inline]
    fn current(&self) -> &[AtomicU8] {
        &self.buffers[self.front.load(Ordering::Relaxed)]
    }

    #[inline]
    fn next(&self) -> &[AtomicU8] {
        &self.buffers[self.front.load(Ordering::Relaxed) ^ 1]
    }

    /// Read a cell of the current generation. Coordinates wrap on both axes.
    #[inline]
    pub fn get(&self, row: i64, col: i64) -> Cell {
        let idx = self.geometry.index(row, col);
        Cell::from_u8(self.current()[idx].load(Ordering::Relaxed))
    }

    /// Exchange the current and next buffers.
    ///
    /// Must run exactly once per generation, after every worker has written
    /// its rows of the next buffer and before any worker reads again.
    pub fn swap(&self) {
        self.front.fetch_xor(1, Ordering::Relaxed);
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Write handle restricted to the rows of `range`.
    pub fn row_writer(&self, range: RowRange) -> RowWriter<'_> {
        assert!(
            range.end <= self.rows(),
            "row range {}..{} exceeds {} rows",
            range.start,
            range.end,
            self.rows()
        );
        RowWriter { board: self, range }
    }

    /// Number of live cells in the current generation.
    pub fn live_count(&self) -> usize {
        self.current()
            .iter()
            .filter(|c| c.load(Ordering::Relaxed) != 0)
            .count()
    }

    /// Copy the current generation out of the board.
    pub fn snapshot(&self) -> Grid {
        Grid {
            rows: self.rows(),
            cols: self.cols(),
            cells: self
                .current()
                .iter()
                .map(|c| Cell::from_u8(c.load(Ordering::Relaxed)))
                .collect(),
        }
    }
}

fn alloc_cells(cells: usize) -> Result<Vec<AtomicU8>, LifeError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(cells)
        .map_err(|_| LifeError::Allocation { cells })?;
    buffer.extend((0..cells).map(|_| AtomicU8::new(0)));
    Ok(buffer)
}

/// Write access to the next-generation rows of one band.
///
/// Writers are created per worker from a partition, so the write sets of
/// concurrent writers are disjoint.
pub struct RowWriter<'a> {
    board: &'a Board,
    range: RowRange,
}

impl RowWriter<'_> {
    #[inline]
    pub fn range(&self) -> RowRange {
        self.range
    }

    /// Write a cell of the next generation. Coordinates wrap on both axes.
    ///
    /// # Panics
    ///
    /// Panics if the wrapped row is outside this writer's range.
    #[inline]
    pub fn set_next(&self, row: i64, col: i64, cell: Cell) {
        let geometry = self.board.geometry;
        let wrapped = geometry.wrap_row(row);
        assert!(
            self.range.contains(wrapped),
            "row {wrapped} is outside the writer's rows {}..{}",
            self.range.start,
            self.range.end
        );
        let idx = wrapped * geometry.cols() + geometry.wrap_col(col);
        self.board.next()[idx].store(cell as u8, Ordering::Relaxed);
    }
}

/// Owned snapshot of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at an in-range `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    /// One row of cells.
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_alive()).count()
    }

    /// Live cells as `(row, col)` in row-major order.
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(|(i, _)| (i / self.cols, i % self.cols))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ConfigError;

    fn seed(rows: usize, cols: usize, live: &[(usize, usize)]) -> Seed {
        Seed {
            specs: BoardSpecs::new(rows, cols, 0),
            live_cells: live.to_vec(),
        }
    }

    #[test]
    fn test_from_seed_sets_current() {
        let board = Board::from_seed(&seed(4, 5, &[(0, 0), (3, 4)])).unwrap();
        assert_eq!(board.get(0, 0), Cell::Alive);
        assert_eq!(board.get(3, 4), Cell::Alive);
        assert_eq!(board.get(1, 1), Cell::Dead);
        assert_eq!(board.live_count(), 2);
        assert_eq!(board.generation(), 0);
    }

    #[test]
    fn test_get_wraps() {
        let board = Board::from_seed(&seed(4, 5, &[(3, 4)])).unwrap();
        assert_eq!(board.get(-1, -1), Cell::Alive);
        assert_eq!(board.get(7, 9), Cell::Alive);
        assert_eq!(board.get(-5, 4), Cell::Alive);
    }

    #[test]
    fn test_writes_are_invisible_until_swap() {
        let board = Board::new(&BoardSpecs::new(3, 3, 0)).unwrap();
        let writer = board.row_writer(RowRange::new(0, 3));

        writer.set_next(1, 1, Cell::Alive);
        assert_eq!(board.get(1, 1), Cell::Dead);

        board.swap();
        assert_eq!(board.get(1, 1), Cell::Alive);
        assert_eq!(board.generation(), 1);

        // The old current buffer is now next and still holds the previous state.
        board.swap();
        assert_eq!(board.get(1, 1), Cell::Dead);
    }

    #[test]
    fn test_writer_wraps_into_owned_rows() {
        let board = Board::new(&BoardSpecs::new(4, 4, 0)).unwrap();
        let writer = board.row_writer(RowRange::new(3, 4));
        writer.set_next(-1, 5, Cell::Alive);
        board.swap();
        assert_eq!(board.get(3, 1), Cell::Alive);
    }

    #[test]
    #[should_panic(expected = "outside the writer's rows")]
    fn test_writer_rejects_foreign_rows() {
        let board = Board::new(&BoardSpecs::new(4, 4, 0)).unwrap();
        let writer = board.row_writer(RowRange::new(0, 2));
        writer.set_next(2, 0, Cell::Alive);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Board::new(&BoardSpecs::new(0, 3, 0)),
            Err(LifeError::Config(ConfigError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_overflowing_dimensions_are_an_error() {
        let seed = Seed::parse("4294967296 4294967296 1 0");
        assert!(seed.is_err());

        let specs = BoardSpecs::new(1 << 32, 1 << 32, 1);
        assert!(matches!(
            Board::new(&specs),
            Err(LifeError::Config(ConfigError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_unallocatable_board_is_an_error() {
        // 2^62 bytes per buffer fits in a usize but no allocator can provide it.
        let specs = BoardSpecs::new(1 << 62, 1, 1);
        assert!(specs.validate().is_ok());
        assert!(matches!(
            Board::new(&specs),
            Err(LifeError::Allocation { cells }) if cells == 1 << 62
        ));
    }

    #[test]
    fn test_snapshot() {
        let board = Board::from_seed(&seed(2, 3, &[(0, 2), (1, 0)])).unwrap();
        let grid = board.snapshot();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.row(0), &[Cell::Dead, Cell::Dead, Cell::Alive]);
        assert_eq!(grid.live_cells(), vec![(0, 2), (1, 0)]);
        assert_eq!(grid.live_count(), 2);
        assert_eq!(grid.get(1, 0), Cell::Alive);
    }
}
