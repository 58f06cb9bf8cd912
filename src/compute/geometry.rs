//! Toroidal grid geometry - maps signed (row, col) coordinates to flat indices.

/// Relative positions of the eight Moore neighbors, as (row, col) offsets.
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Dimensions of a row-major toroidal grid.
///
/// All coordinate arguments are signed so that neighbor lookups like
/// `row - 1` never need special casing at the edges: every integer maps
/// onto the grid by wrapping on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    rows: usize,
    cols: usize,
}

impl GridGeometry {
    /// Create a geometry for a `rows x cols` grid. Both must be non-zero.
    pub fn new(rows: usize, cols: usize) -> Self {
        debug_assert!(rows > 0 && cols > 0, "grid dimensions must be non-zero");
        Self { rows, cols }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells (rows * cols).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Wrap any row onto `[0, rows)`.
    #[inline]
    pub fn wrap_row(&self, row: i64) -> usize {
        row.rem_euclid(self.rows as i64) as usize
    }

    /// Wrap any column onto `[0, cols)`.
    #[inline]
    pub fn wrap_col(&self, col: i64) -> usize {
        col.rem_euclid(self.cols as i64) as usize
    }

    /// Flat row-major index of `(row, col)` after wrapping both axes.
    #[inline]
    pub fn index(&self, row: i64, col: i64) -> usize {
        self.wrap_row(row) * self.cols + self.wrap_col(col)
    }
}
