//! Text output for Game of Life runs.
//!
//! Boards render as one line per row with `@` for live and `.` for dead
//! cells. [`TerminalRenderer`] plugs into the coordinator as a generation
//! observer for verbose runs.

mod render;
mod report;

pub use render::{DEAD_GLYPH, LIVE_GLYPH, TerminalRenderer, render_grid};
pub use report::{format_elapsed, range_line, summary_line, worker_lines};
