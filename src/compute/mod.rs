//! Compute module - the parallel Game of Life update engine.

mod barrier;
mod board;
mod coordinator;
mod geometry;
mod parallel;
mod partition;
mod worker;

pub use barrier::*;
pub use board::*;
pub use coordinator::*;
pub use geometry::*;
pub use parallel::*;
pub use partition::*;
pub use worker::*;
