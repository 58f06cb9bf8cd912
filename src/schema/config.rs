//! Configuration types for Game of Life runs.

use serde::{Deserialize, Serialize};

/// Default number of worker threads.
pub const DEFAULT_WORKERS: usize = 4;

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

/// Immutable per-run board configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSpecs {
    /// Number of rows (R).
    pub rows: usize,
    /// Number of columns (C).
    pub cols: usize,
    /// Number of generations to simulate (G).
    pub generations: u64,
}

impl BoardSpecs {
    pub fn new(rows: usize, cols: usize, generations: u64) -> Self {
        Self {
            rows,
            cols,
            generations,
        }
    }

    /// Get total grid size (rows * cols).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Validate board dimensions.
    ///
    /// Each dimension must fit in an `i64` (coordinates are signed) and the
    /// cell count must fit in a `usize`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = i64::MAX as usize;
        if self.rows == 0
            || self.cols == 0
            || self.rows > max
            || self.cols > max
            || self.rows.checked_mul(self.cols).is_none()
        {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

/// How generations are scheduled across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// One long-lived thread per row band, synchronized by a two-phase barrier.
    #[default]
    Threads,
    /// Data-parallel rows on a rayon pool, one fork-join per generation.
    Rayon,
}

/// Full configuration for a single simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub specs: BoardSpecs,
    /// Worker thread count (T). Must satisfy `1 <= T <= rows`.
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub engine: EngineKind,
}

impl RunConfig {
    pub fn new(specs: BoardSpecs, workers: usize) -> Self {
        Self {
            specs,
            workers,
            engine: EngineKind::default(),
        }
    }

    pub fn with_engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Validate dimensions and worker count. Every worker needs at least one row.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.specs.validate()?;
        if self.workers == 0 || self.workers > self.specs.rows {
            return Err(ConfigError::InvalidWorkerCount {
                workers: self.workers,
                rows: self.specs.rows,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions must be positive (got {rows}x{cols})")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("Worker count must be between 1 and the row count {rows} (got {workers})")]
    InvalidWorkerCount { workers: usize, rows: usize },
    #[error("Board is {actual_rows}x{actual_cols} but the run expects {rows}x{cols}")]
    BoardMismatch {
        rows: usize,
        cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = RunConfig::new(BoardSpecs::new(8, 8, 10), 4);
        assert!(config.validate().is_ok());
        assert_eq!(config.specs.cell_count(), 64);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let specs = BoardSpecs::new(0, 8, 1);
        assert!(matches!(
            specs.validate(),
            Err(ConfigError::InvalidDimensions { rows: 0, cols: 8 })
        ));
        let config = RunConfig::new(BoardSpecs::new(8, 0, 1), 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_overflowing_dimensions_rejected() {
        let specs = BoardSpecs::new(1 << 32, 1 << 32, 1);
        assert!(matches!(
            specs.validate(),
            Err(ConfigError::InvalidDimensions { .. })
        ));
        assert!(BoardSpecs::new(usize::MAX, 1, 1).validate().is_err());
        assert!(BoardSpecs::new(1 << 31, 1 << 31, 1).validate().is_ok());
    }

    #[test]
    fn test_more_workers_than_rows_rejected() {
        let config = RunConfig::new(BoardSpecs::new(3, 10, 1), 4);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWorkerCount { workers: 4, rows: 3 })
        ));
    }

    #[test]
    fn test_zero_generations_is_valid() {
        let config = RunConfig::new(BoardSpecs::new(3, 3, 0), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_json_defaults() {
        let json = r#"{"specs":{"rows":6,"cols":4,"generations":2}}"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.engine, EngineKind::Threads);

        let json = r#"{"specs":{"rows":6,"cols":4,"generations":2},"workers":2,"engine":"rayon"}"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.engine, EngineKind::Rayon);
    }
}
