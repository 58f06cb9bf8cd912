//! Seed types for initializing Game of Life boards.
//!
//! The text format is four whitespace-separated integers `rows cols
//! generations pairs`, followed by `pairs` entries of `col row` marking the
//! initially live cells. Coordinates are 0-indexed.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{BoardSpecs, ConfigError};

/// Complete seed specification: board dimensions plus the live cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    pub specs: BoardSpecs,
    /// Live cells as `(row, col)`, each inside `[0, rows) x [0, cols)`.
    pub live_cells: Vec<(usize, usize)>,
}

/// Small named patterns, placed relative to their top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// 2x2 still life.
    Block,
    /// Horizontal period-2 oscillator.
    Blinker,
    /// Period-4 spaceship moving down and to the right.
    Glider,
}

impl Pattern {
    /// Cell offsets `(row, col)` relative to the pattern origin.
    pub fn offsets(&self) -> &'static [(usize, usize)] {
        match self {
            Pattern::Block => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            Pattern::Blinker => &[(0, 0), (0, 1), (0, 2)],
            Pattern::Glider => &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
        }
    }
}

impl Seed {
    /// Empty board with the given specs.
    pub fn empty(specs: BoardSpecs) -> Self {
        Self {
            specs,
            live_cells: Vec::new(),
        }
    }

    /// Board seeded with named patterns at `(row, col)` origins, wrapping at the edges.
    ///
    /// Specs with invalid dimensions yield a seed with no live cells; building
    /// a board from it then reports the dimension error.
    pub fn with_patterns(specs: BoardSpecs, patterns: &[(Pattern, (usize, usize))]) -> Self {
        let mut live_cells = Vec::new();
        if specs.validate().is_err() {
            return Self { specs, live_cells };
        }
        for &(pattern, (row, col)) in patterns {
            let (row, col) = (row % specs.rows, col % specs.cols);
            for &(dr, dc) in pattern.offsets() {
                live_cells.push(((row + dr) % specs.rows, (col + dc) % specs.cols));
            }
        }
        Self { specs, live_cells }
    }

    /// Pseudo-random soup where each cell is alive with probability `density`.
    pub fn soup(specs: BoardSpecs, density: f32, seed: u64) -> Self {
        // Simple LCG PRNG for deterministic soups
        let mut state = seed;
        let mut lcg_next = || -> f32 {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (state >> 33) as f32 / (1u64 << 31) as f32
        };

        let mut live_cells = Vec::new();
        for row in 0..specs.rows {
            for col in 0..specs.cols {
                if lcg_next() < density {
                    live_cells.push((row, col));
                }
            }
        }
        Self { specs, live_cells }
    }

    /// Parse the text board format.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let mut tokens = text.split_whitespace();

        let rows = next_int(&mut tokens, "rows")?;
        let cols = next_int(&mut tokens, "cols")?;
        let generations = next_int(&mut tokens, "generations")?;
        let pairs = next_int(&mut tokens, "pair count")?;

        if rows <= 0 || cols <= 0 {
            return Err(LoadError::Config(ConfigError::InvalidDimensions {
                rows: rows.max(0) as usize,
                cols: cols.max(0) as usize,
            }));
        }
        if generations < 0 {
            return Err(LoadError::Negative {
                what: "generations",
                value: generations,
            });
        }
        if pairs < 0 {
            return Err(LoadError::Negative {
                what: "pair count",
                value: pairs,
            });
        }

        let specs = BoardSpecs::new(rows as usize, cols as usize, generations as u64);
        specs.validate()?;
        // The pair count is untrusted; let the vector grow with the pairs actually read.
        let mut live_cells = Vec::new();
        for _ in 0..pairs {
            let col = next_int(&mut tokens, "cell column")?;
            let row = next_int(&mut tokens, "cell row")?;
            if row < 0 || col < 0 || row >= rows || col >= cols {
                return Err(LoadError::CellOutOfRange {
                    row,
                    col,
                    rows: specs.rows,
                    cols: specs.cols,
                });
            }
            live_cells.push((row as usize, col as usize));
        }

        if let Some(extra) = tokens.next() {
            log::warn!("Ignoring trailing input after {} cell pairs: {:?}", pairs, extra);
        }

        Ok(Self { specs, live_cells })
    }

    /// Read and parse a board file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let seed = Self::parse(&text)?;
        log::debug!(
            "Loaded {}x{} board with {} live cells from {}",
            seed.specs.rows,
            seed.specs.cols,
            seed.live_cells.len(),
            path.display()
        );
        Ok(seed)
    }

    /// Render back into the text board format.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{} {} {} {}\n",
            self.specs.rows,
            self.specs.cols,
            self.specs.generations,
            self.live_cells.len()
        );
        for &(row, col) in &self.live_cells {
            let _ = writeln!(out, "{} {}", col, row);
        }
        out
    }
}

fn next_int<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<i64, LoadError> {
    let token = tokens.next().ok_or(LoadError::MissingToken { what })?;
    token.parse().map_err(|_| LoadError::InvalidToken {
        what,
        token: token.to_string(),
    })
}

/// Errors produced while loading a board file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read board file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Board file ended early: missing {what}")]
    MissingToken { what: &'static str },
    #[error("Invalid {what} in board file: {token:?}")]
    InvalidToken { what: &'static str, token: String },
    #[error("Negative {what} in board file: {value}")]
    Negative { what: &'static str, value: i64 },
    #[error("Cell (row {row}, col {col}) lies outside the {rows}x{cols} board")]
    CellOutOfRange {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
