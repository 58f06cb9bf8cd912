//! Top-level error type for loading and running a simulation.

use crate::compute::SyncError;
use crate::schema::{ConfigError, LoadError};

/// Any failure that stops a run. None of these can occur once workers are
/// computing generations, except a worker panic.
#[derive(Debug, thiserror::Error)]
pub enum LifeError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to load board: {0}")]
    Load(#[from] LoadError),
    #[error("Synchronization failure: {0}")]
    Sync(#[from] SyncError),
    #[error("Failed to allocate a board buffer of {cells} cells")]
    Allocation { cells: usize },
    #[error("Failed to start worker thread: {0}")]
    Resource(#[source] std::io::Error),
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Worker {worker} panicked")]
    WorkerPanicked { worker: usize },
    #[error("Rayon engine panicked after {generation} generations")]
    PoolPanicked { generation: u64 },
}
