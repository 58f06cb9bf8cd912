//! Coordinator - partitions the board, runs the workers and reports timings.

use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::{
    Board, GenerationBarrier, GenerationObserver, RowRange, Worker, WorkerStats, partition,
    rayon_run,
};
use crate::error::LifeError;
use crate::schema::{BoardSpecs, ConfigError, EngineKind, RunConfig};

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub specs: BoardSpecs,
    pub engine: EngineKind,
    pub workers: usize,
    /// Per-worker statistics, in row order. Empty for the rayon engine.
    pub worker_stats: Vec<WorkerStats>,
    /// Wall time spent on the generations, in microseconds.
    pub elapsed_micros: u64,
    /// Live cells after the final generation.
    pub live_cells: usize,
}

impl RunReport {
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_micros)
    }
}

/// Drives one simulation run over a board.
#[derive(Debug, Clone)]
pub struct Coordinator {
    config: RunConfig,
    ranges: Vec<RowRange>,
}

impl Coordinator {
    /// Validate the configuration and compute the row partition.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ranges = partition(config.specs.rows, config.workers)?;
        Ok(Self { config, ranges })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Row band of each worker, indexed by worker id.
    pub fn ranges(&self) -> &[RowRange] {
        &self.ranges
    }

    /// Run every configured generation on `board`.
    ///
    /// `observer` is invoked after each generation is committed. The initial
    /// state is never reported, so it is called exactly `generations` times.
    pub fn run(
        &self,
        board: &Board,
        observer: Option<&dyn GenerationObserver>,
    ) -> Result<RunReport, LifeError> {
        let specs = self.config.specs;
        if board.rows() != specs.rows || board.cols() != specs.cols {
            return Err(ConfigError::BoardMismatch {
                rows: specs.rows,
                cols: specs.cols,
                actual_rows: board.rows(),
                actual_cols: board.cols(),
            }
            .into());
        }

        log::info!(
            "Running {} generations of a {}x{} board on {} {:?} workers",
            specs.generations,
            specs.rows,
            specs.cols,
            self.config.workers,
            self.config.engine
        );

        let start = Instant::now();
        let worker_stats = match self.config.engine {
            EngineKind::Threads => self.run_threads(board, observer)?,
            EngineKind::Rayon => {
                rayon_run(board, specs.generations, self.config.workers, observer)?;
                Vec::new()
            }
        };
        let elapsed = start.elapsed();

        let report = RunReport {
            specs,
            engine: self.config.engine,
            workers: self.config.workers,
            worker_stats,
            elapsed_micros: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
            live_cells: board.live_count(),
        };
        log::info!(
            "Finished in {:?} with {} live cells",
            elapsed,
            report.live_cells
        );
        Ok(report)
    }

    fn run_threads(
        &self,
        board: &Board,
        observer: Option<&dyn GenerationObserver>,
    ) -> Result<Vec<WorkerStats>, LifeError> {
        let barrier = GenerationBarrier::new(self.ranges.len())?;
        let generations = self.config.specs.generations;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.ranges.len());
            for (id, &range) in self.ranges.iter().enumerate() {
                let worker = Worker::new(id, range, board, &barrier, generations, observer);
                let spawned = thread::Builder::new()
                    .name(format!("life-worker-{id}"))
                    .spawn_scoped(scope, move || worker.run());
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        // Workers already started would wait for a peer that never comes.
                        barrier.cancel();
                        return Err(LifeError::Resource(err));
                    }
                }
            }

            let mut stats = Vec::with_capacity(handles.len());
            let mut sync_error = None;
            let mut panicked = None;
            for (id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(Ok(worker_stats)) => stats.push(worker_stats),
                    Ok(Err(err)) => {
                        sync_error.get_or_insert(err);
                    }
                    Err(_) => {
                        log::error!("worker {} panicked", id);
                        panicked.get_or_insert(id);
                    }
                }
            }

            if let Some(worker) = panicked {
                return Err(LifeError::WorkerPanicked { worker });
            }
            if let Some(err) = sync_error {
                return Err(err.into());
            }
            Ok(stats)
        })
    }
}
