//! Fork-join reducers on the current rayon pool.
//!
//! Work units are contiguous row bands of the overlap. Each task gets the matching band of the
//! target as its own `&mut` slice and returns a private partial sum; partial sums are merged in
//! band order, so a given input always yields the same score.

use std::mem;
use std::ops::RangeInclusive;

use rayon::prelude::*;
use tracing::debug;

use super::{NO_OVERLAP, Pass};
use crate::DiffError;
use crate::argb::ArgbImage;
use crate::chunk::row_chunks;
use crate::pixel::DiffMode;
use crate::range::Offset;

/// Parallel reduction with at most `max_chunks` row bands.
///
/// With `n` overlap rows, `min(max_chunks, n)` bands are dispatched: all but the last hold
/// `n / bands` rows and the last takes the remainder.
pub fn reduce_chunked(
    reference: ArgbImage<'_>,
    target: Option<&mut [u32]>,
    compare: ArgbImage<'_>,
    offset: Offset,
    mode: DiffMode,
    max_chunks: usize,
) -> Result<f64, DiffError> {
    let pass = Pass::new(reference, target.as_deref(), compare, offset, mode)?;
    Ok(chunked(&pass, target, max_chunks))
}

/// Chunked fan-out over an already validated pass.
pub(crate) fn chunked(pass: &Pass<'_>, target: Option<&mut [u32]>, max_chunks: usize) -> f64 {
    if pass.range().is_empty() {
        return NO_OVERLAP;
    }

    let chunks = row_chunks(pass.range().y.clone(), max_chunks);
    debug!(
        rows = pass.range().height(),
        cols = pass.range().width(),
        chunks = chunks.len(),
        mode = %pass.mode(),
        "chunked diff"
    );
    fan_out(pass, target, chunks)
}

/// Parallel reduction with one task per overlap row.
pub fn reduce_rows(
    reference: ArgbImage<'_>,
    target: Option<&mut [u32]>,
    compare: ArgbImage<'_>,
    offset: Offset,
    mode: DiffMode,
) -> Result<f64, DiffError> {
    let pass = Pass::new(reference, target.as_deref(), compare, offset, mode)?;
    if pass.range().is_empty() {
        return Ok(NO_OVERLAP);
    }

    let rows: Vec<RangeInclusive<i64>> = pass.range().y.clone().map(|y| y..=y).collect();
    debug!(
        rows = rows.len(),
        cols = pass.range().width(),
        mode = %mode,
        "per-row diff"
    );
    Ok(fan_out(&pass, target, rows))
}

/// Run one task per band, wait for all of them, and normalize the summed contributions.
fn fan_out(
    pass: &Pass<'_>,
    target: Option<&mut [u32]>,
    bands: Vec<RangeInclusive<i64>>,
) -> f64 {
    let slices = split_bands(pass, target, &bands);

    let partial_sums: Vec<f64> = bands
        .into_par_iter()
        .zip(slices)
        .map(|(rows, band)| pass.diff_rows(rows, band))
        .collect();

    pass.finish(partial_sums.iter().sum())
}

/// Cut the target into one disjoint slice per band, in band order.
///
/// `bands` must be non-empty, contiguous and ascending.
fn split_bands<'t>(
    pass: &Pass<'_>,
    target: Option<&'t mut [u32]>,
    bands: &[RangeInclusive<i64>],
) -> Vec<Option<&'t mut [u32]>> {
    let Some(target) = target else {
        return bands.iter().map(|_| None).collect();
    };

    let skip = pass.band_bounds(&bands[0]).start;
    let mut rest = &mut target[skip..];
    let mut slices = Vec::with_capacity(bands.len());
    for rows in bands {
        let len = pass.band_bounds(rows).len();
        let (band, tail) = mem::take(&mut rest).split_at_mut(len);
        slices.push(Some(band));
        rest = tail;
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argb::pack_argb;
    use crate::reduce::sequential::reduce_sequential;

    fn gradient(width: usize, height: usize, seed: u32) -> Vec<u32> {
        (0..width * height)
            .map(|i| {
                let v = (i as u32).wrapping_mul(2_654_435_761).wrapping_add(seed);
                pack_argb(255, (v >> 3) as u8, (v >> 11) as u8, (v >> 19) as u8)
            })
            .collect()
    }

    #[test]
    fn single_pixel_overlap_uses_one_chunk() {
        let reference = [pack_argb(9, 0, 0, 0)];
        let compare = [pack_argb(255, 0, 0, 48)];
        let mut target = [0u32];

        let score = reduce_chunked(
            ArgbImage::new(&reference, 1, 1).unwrap(),
            Some(&mut target[..]),
            ArgbImage::new(&compare, 1, 1).unwrap(),
            Offset::ZERO,
            DiffMode::SqrDiffRed,
            128,
        )
        .unwrap();

        assert!((score - 2304.0 / 768.0).abs() < 1e-12);
        assert_eq!(target, [pack_argb(9, 255, 252, 252)]);
    }

    #[test]
    fn uneven_chunks_match_sequential_pixels() {
        // 131 overlap rows with a cap of 4 bands: 32 + 32 + 32 + 35.
        let (rw, rh, cw, ch) = (23, 140, 19, 131);
        let reference = gradient(rw, rh, 1);
        let compare = gradient(cw, ch, 77);
        let offset = Offset::new(3, 5);

        let mut expected = vec![0u32; rw * rh];
        let seq = reduce_sequential(
            ArgbImage::new(&reference, rw, rh).unwrap(),
            Some(&mut expected[..]),
            ArgbImage::new(&compare, cw, ch).unwrap(),
            offset,
            DiffMode::SqrDiffRed,
        )
        .unwrap();

        for max_chunks in [1, 4, 128, 1000] {
            let mut actual = vec![0u32; rw * rh];
            let par = reduce_chunked(
                ArgbImage::new(&reference, rw, rh).unwrap(),
                Some(&mut actual[..]),
                ArgbImage::new(&compare, cw, ch).unwrap(),
                offset,
                DiffMode::SqrDiffRed,
                max_chunks,
            )
            .unwrap();
            assert_eq!(actual, expected, "max_chunks = {max_chunks}");
            assert!((par - seq).abs() <= 1e-9 * seq.abs().max(1.0));
        }
    }

    #[test]
    fn rows_reducer_matches_sequential() {
        let (w, h) = (17, 29);
        let reference = gradient(w, h, 3);
        let compare = gradient(w, h, 4);
        let offset = Offset::new(-2, 6);

        for mode in DiffMode::ALL {
            let mut expected = vec![5u32; w * h];
            let mut actual = vec![5u32; w * h];
            let seq = reduce_sequential(
                ArgbImage::new(&reference, w, h).unwrap(),
                Some(&mut expected[..]),
                ArgbImage::new(&compare, w, h).unwrap(),
                offset,
                mode,
            )
            .unwrap();
            let par = reduce_rows(
                ArgbImage::new(&reference, w, h).unwrap(),
                Some(&mut actual[..]),
                ArgbImage::new(&compare, w, h).unwrap(),
                offset,
                mode,
            )
            .unwrap();
            assert_eq!(actual, expected, "{mode}");
            assert!((par - seq).abs() <= 1e-9 * seq.abs().max(1.0));
        }
    }

    #[test]
    fn score_without_target_matches_score_with_target() {
        let (w, h) = (40, 300);
        let reference = gradient(w, h, 10);
        let compare = gradient(w, h, 11);
        let image_ref = ArgbImage::new(&reference, w, h).unwrap();
        let image_cmp = ArgbImage::new(&compare, w, h).unwrap();
        let mut target = vec![0u32; w * h];

        let with = reduce_chunked(
            image_ref,
            Some(&mut target[..]),
            image_cmp,
            Offset::ZERO,
            DiffMode::SqrDiffRed,
            128,
        )
        .unwrap();
        let without = reduce_chunked(
            image_ref,
            None,
            image_cmp,
            Offset::ZERO,
            DiffMode::SqrDiffRed,
            128,
        )
        .unwrap();

        assert_eq!(with, without);
    }

    #[test]
    fn empty_overlap_never_touches_target() {
        let pixels = vec![pack_argb(255, 1, 2, 3); 12];
        let image = ArgbImage::new(&pixels, 4, 3).unwrap();
        let mut target = vec![42u32; 12];

        let score = reduce_chunked(
            image,
            Some(&mut target[..]),
            image,
            Offset::new(-4, 0),
            DiffMode::Overwrite,
            128,
        )
        .unwrap();

        assert_eq!(score, NO_OVERLAP);
        assert!(target.iter().all(|&p| p == 42));
    }
}
