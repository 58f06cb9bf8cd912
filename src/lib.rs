//! Life Grid - parallel Conway's Game of Life on a toroidal grid.
//!
//! The board is split into contiguous row bands, one per worker thread.
//! Each generation every worker computes its band of the next buffer, meets
//! its peers at a barrier, lets the barrier leader swap the buffers, and
//! meets them again before reading the new generation.
//!
//! # Architecture
//!
//! - `schema`: Board specs, run configuration and the board file loader
//! - `compute`: Geometry, double-buffered board, partitioner, barrier, workers
//! - `display`: ASCII rendering and run summaries
//!
//! # Example
//!
//! ```rust,no_run
//! use life_grid::{
//!     compute::{Board, Coordinator},
//!     schema::{BoardSpecs, Pattern, RunConfig, Seed},
//! };
//!
//! let specs = BoardSpecs::new(32, 32, 100);
//! let seed = Seed::with_patterns(specs, &[(Pattern::Glider, (0, 0))]);
//! let board = Board::from_seed(&seed)?;
//!
//! let coordinator = Coordinator::new(RunConfig::new(specs, 4))?;
//! let report = coordinator.run(&board, None)?;
//!
//! println!("Live cells after {} generations: {}", specs.generations, report.live_cells);
//! # Ok::<(), life_grid::LifeError>(())
//! ```

pub mod compute;
pub mod display;
pub mod error;
pub mod schema;

// Re-export commonly used types
pub use compute::{Board, Coordinator, RunReport};
pub use error::LifeError;
pub use schema::{BoardSpecs, Pattern, RunConfig, Seed};
