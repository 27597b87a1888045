//! Partitioning of a record set across workers.

use std::num::NonZeroUsize;
use std::ops::Range;

/// Splits `len` records into `workers` contiguous, disjoint index ranges covering `[0, len)`.
///
/// With `base = len / workers` and `rem = len % workers`, the first `rem` partitions hold
/// `base + 1` records and the rest hold `base`. Partition `i` precedes partition `i + 1` in index
/// space. When `workers > len` the trailing partitions are empty.
///
/// # Arguments
///
/// * `len`: Number of records
/// * `workers`: Number of partitions to produce
pub fn partition(len: usize, workers: NonZeroUsize) -> Vec<Range<usize>> {
    let workers = workers.get();
    let base = len / workers;
    let rem = len % workers;
    let mut start = 0;
    (0..workers)
        .map(|index| {
            let size = if index < rem { base + 1 } else { base };
            let range = start..start + size;
            start = range.end;
            range
        })
        .collect()
}
