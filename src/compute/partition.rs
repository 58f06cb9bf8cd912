//! Static row partitioning - splits the grid into contiguous per-worker bands.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::schema::ConfigError;

/// Half-open band of rows `[start, end)` owned by a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "row range start {start} > end {end}");
        Self { start, end }
    }

    /// Number of rows in the band.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(&self, row: usize) -> bool {
        row >= self.start && row < self.end
    }

    /// Iterator over the owned rows.
    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `rows` into `workers` contiguous bands.
///
/// With `d = rows / workers` and `r = rows % workers`, the first `r` bands
/// get `d + 1` rows and the rest get `d`. The result is deterministic in
/// `(rows, workers)` and covers `[0, rows)` without gaps or overlaps.
pub fn partition(rows: usize, workers: usize) -> Result<Vec<RowRange>, ConfigError> {
    if workers == 0 || workers > rows {
        return Err(ConfigError::InvalidWorkerCount { workers, rows });
    }

    let base = rows / workers;
    let extra = rows % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for id in 0..workers {
        let len = if id < extra { base + 1 } else { base };
        ranges.push(RowRange::new(start, start + len));
        start += len;
    }

    debug_assert_eq!(start, rows);
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_remainder_goes_to_first_workers() {
        let ranges = partition(10, 4).unwrap();
        assert_eq!(
            ranges,
            vec![
                RowRange::new(0, 3),
                RowRange::new(3, 6),
                RowRange::new(6, 8),
                RowRange::new(8, 10),
            ]
        );
    }

    #[test]
    fn test_one_row_per_worker() {
        let ranges = partition(5, 5).unwrap();
        for (id, range) in ranges.iter().enumerate() {
            assert_eq!(*range, RowRange::new(id, id + 1));
        }
    }

    #[test]
    fn test_single_worker_owns_everything() {
        assert_eq!(partition(7, 1).unwrap(), vec![RowRange::new(0, 7)]);
    }

    #[test]
    fn test_invalid_worker_counts() {
        assert!(matches!(
            partition(4, 0),
            Err(ConfigError::InvalidWorkerCount { workers: 0, rows: 4 })
        ));
        assert!(matches!(
            partition(4, 5),
            Err(ConfigError::InvalidWorkerCount { workers: 5, rows: 4 })
        ));
    }

    #[test]
    fn test_row_range_helpers() {
        let range = RowRange::new(2, 5);
        assert_eq!(range.len(), 3);
        assert!(!range.is_empty());
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert_eq!(range.rows().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    proptest! {
        #[test]
        fn prop_partition_covers_rows_exactly(rows in 1usize..500, workers_seed in 1usize..500) {
            let workers = (workers_seed % rows) + 1;
            let ranges = partition(rows, workers).unwrap();

            prop_assert_eq!(ranges.len(), workers);
            prop_assert_eq!(ranges[0].start, 0);
            prop_assert_eq!(ranges[workers - 1].end, rows);
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }

            let min = ranges.iter().map(RowRange::len).min().unwrap();
            let max = ranges.iter().map(RowRange::len).max().unwrap();
            prop_assert!(min >= 1);
            prop_assert!(max - min <= 1);
        }

        #[test]
        fn prop_partition_is_deterministic(rows in 1usize..200, workers_seed in 1usize..200) {
            let workers = (workers_seed % rows) + 1;
            prop_assert_eq!(partition(rows, workers).unwrap(), partition(rows, workers).unwrap());
        }
    }
}
