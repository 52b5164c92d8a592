//! Splitting a row interval into contiguous work units for the parallel reducers.

use std::ops::RangeInclusive;

/// Split `rows` into `min(max_chunks, rows.len())` contiguous, disjoint inclusive intervals,
/// in order.
///
/// Every chunk but the last holds `rows / chunks` rows; the last one takes the remainder.
/// An empty `rows` yields no chunks. `max_chunks` of zero is treated as one.
pub fn row_chunks(rows: RangeInclusive<i64>, max_chunks: usize) -> Vec<RangeInclusive<i64>> {
    if rows.is_empty() {
        return Vec::new();
    }

    let first = *rows.start();
    let last = *rows.end();
    let num_rows = (last - first + 1) as u64;
    let num_chunks = (max_chunks.max(1) as u64).min(num_rows);
    let chunk_size = (num_rows / num_chunks) as i64;

    let mut chunks = Vec::with_capacity(num_chunks as usize);
    let mut start = first;
    for c in 0..num_chunks {
        let end = if c + 1 < num_chunks {
            start + chunk_size - 1
        } else {
            last
        };
        chunks.push(start..=end);
        start = end + 1;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_row_is_one_chunk() {
        assert_eq!(row_chunks(5..=5, 128), vec![5..=5]);
    }

    #[test]
    fn fewer_rows_than_cap_gives_one_row_per_chunk() {
        assert_eq!(row_chunks(0..=2, 128), vec![0..=0, 1..=1, 2..=2]);
    }

    #[test]
    fn remainder_goes_to_last_chunk() {
        // 10 rows, 4 chunks: 2 + 2 + 2 + 4.
        assert_eq!(row_chunks(3..=12, 4), vec![3..=4, 5..=6, 7..=8, 9..=12]);
    }

    #[test]
    fn empty_rows_give_no_chunks() {
        #[allow(clippy::reversed_empty_ranges)]
        let rows = 4..=3;
        assert!(row_chunks(rows, 128).is_empty());
    }

    #[test]
    fn zero_cap_behaves_like_one() {
        assert_eq!(row_chunks(0..=9, 0), vec![0..=9]);
    }

    proptest! {
        #[test]
        fn chunks_tile_the_rows_exactly(
            first in -200i64..200,
            len in 1i64..2000,
            cap in 1usize..300,
        ) {
            let last = first + len - 1;
            let chunks = row_chunks(first..=last, cap);

            prop_assert_eq!(chunks.len() as i64, (cap as i64).min(len));
            prop_assert_eq!(*chunks[0].start(), first);
            prop_assert_eq!(*chunks[chunks.len() - 1].end(), last);
            for pair in chunks.windows(2) {
                prop_assert_eq!(*pair[1].start(), pair[0].end() + 1);
            }

            let size = len / chunks.len() as i64;
            for chunk in &chunks[..chunks.len() - 1] {
                prop_assert_eq!(chunk.end() - chunk.start() + 1, size);
            }
            let tail = &chunks[chunks.len() - 1];
            prop_assert!(tail.end() - tail.start() + 1 >= size);
        }
    }
}
