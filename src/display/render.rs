//! ASCII board rendering.

use std::io::{self, Write};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crate::compute::{Board, GenerationObserver, Grid};

/// Glyph for a live cell, followed by a space.
pub const LIVE_GLYPH: &str = "@ ";
/// Glyph for a dead cell, followed by a space.
pub const DEAD_GLYPH: &str = ". ";

/// ANSI clear-screen and cursor-home sequence.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Write `grid` as one text line per row.
pub fn render_grid<W: Write>(grid: &Grid, out: &mut W) -> io::Result<()> {
    for row in 0..grid.rows() {
        let mut line = String::with_capacity(grid.cols() * 2);
        for cell in grid.row(row) {
            line.push_str(if cell.is_alive() { LIVE_GLYPH } else { DEAD_GLYPH });
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

/// Generation observer that redraws the board on a terminal-like sink.
pub struct TerminalRenderer<W: Write + Send> {
    out: Mutex<W>,
    delay: Duration,
    clear: bool,
}

impl TerminalRenderer<io::Stdout> {
    /// Renderer for stdout that clears the screen before each frame.
    pub fn stdout(delay: Duration) -> Self {
        Self::new(io::stdout(), delay, true)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W, delay: Duration, clear: bool) -> Self {
        Self {
            out: Mutex::new(out),
            delay,
            clear,
        }
    }

    /// Consume the renderer and return the sink.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn draw(&self, generation: u64, grid: &Grid) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if self.clear {
            out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        writeln!(out, "Generation {}:", generation)?;
        render_grid(grid, &mut *out)?;
        out.flush()
    }
}

impl<W: Write + Send> GenerationObserver for TerminalRenderer<W> {
    fn on_generation(&self, generation: u64, board: &Board) {
        if let Err(err) = self.draw(generation, &board.snapshot()) {
            log::warn!("Failed to render generation {}: {}", generation, err);
        }
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}
