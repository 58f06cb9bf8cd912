//! Human-readable run summaries.

use std::time::Duration;

use crate::compute::{RowRange, RunReport};

/// Format a duration as `seconds.micros` with six fractional digits.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{}.{:06}", elapsed.as_secs(), elapsed.subsec_micros())
}

/// Final timing line, e.g. `Total time for 10 iterations of 8x6 world is 0.001234`.
pub fn summary_line(report: &RunReport) -> String {
    format!(
        "Total time for {} iterations of {}x{} world is {}",
        report.specs.generations,
        report.specs.cols,
        report.specs.rows,
        format_elapsed(report.elapsed())
    )
}

/// One line describing a worker's row band, with inclusive bounds.
pub fn range_line(id: usize, range: RowRange) -> String {
    format!(
        "worker {}: rows {}-{} ({} rows)",
        id,
        range.start,
        range.end.saturating_sub(1),
        range.len()
    )
}

/// Per-worker row-band lines for a report, in worker order.
pub fn worker_lines(report: &RunReport) -> Vec<String> {
    report
        .worker_stats
        .iter()
        .map(|stats| range_line(stats.id, stats.range))
        .collect()
}
