//! Splitting the output rows into contiguous per-worker ranges.

use std::fmt;
use std::ops::Range;

/// A half-open interval `[start, end)` of row indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Splits `total_rows` into contiguous ranges, one per worker.
///
/// The first `total_rows % n` ranges get one extra row. At most `total_rows`
/// ranges are produced, so surplus workers get no range at all; a worker
/// count of zero is treated as one, and zero rows yield a single empty range.
pub fn partition(total_rows: usize, num_workers: usize) -> Vec<RowRange> {
    let num_ranges = num_workers.min(total_rows).max(1);
    let base = total_rows / num_ranges;
    let remainder = total_rows % num_ranges;

    let mut ranges = Vec::with_capacity(num_ranges);
    let mut start = 0;
    for i in 0..num_ranges {
        let end = start + base + usize::from(i < remainder);
        ranges.push(RowRange::new(start, end));
        start = end;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn bounds(ranges: &[RowRange]) -> Vec<(usize, usize)> {
        ranges.iter().map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn remainder_goes_to_earliest_ranges() {
        assert_eq!(bounds(&partition(10, 3)), vec![(0, 4), (4, 7), (7, 10)]);
    }

    #[test]
    fn even_split() {
        assert_eq!(bounds(&partition(6, 3)), vec![(0, 2), (2, 4), (4, 6)]);
    }

    #[test]
    fn more_workers_than_rows_caps_ranges_at_row_count() {
        assert_eq!(bounds(&partition(3, 4)), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn huge_worker_count_does_not_allocate_per_worker() {
        assert_eq!(bounds(&partition(3, usize::MAX)), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn zero_rows_yield_one_empty_range() {
        let ranges = partition(0, 8);
        assert_eq!(ranges.len(), 1);
        assert!(ranges[0].is_empty());
    }

    #[test]
    fn zero_workers_means_one() {
        assert_eq!(bounds(&partition(5, 0)), vec![(0, 5)]);
    }

    proptest! {
        #[test]
        fn ranges_tile_all_rows(total in 1usize..500, workers in 1usize..64) {
            let ranges = partition(total, workers);

            prop_assert_eq!(ranges.len(), workers.min(total));
            prop_assert!(ranges.iter().all(|r| !r.is_empty()));
            prop_assert_eq!(ranges[0].start, 0);
            prop_assert_eq!(ranges[ranges.len() - 1].end, total);
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }

            let sizes: Vec<usize> = ranges.iter().map(RowRange::len).collect();
            let max = *sizes.iter().max().unwrap();
            let min = *sizes.iter().min().unwrap();
            prop_assert!(max - min <= 1);
            prop_assert_eq!(sizes.iter().sum::<usize>(), total);
        }
    }
}
