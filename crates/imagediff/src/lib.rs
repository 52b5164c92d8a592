//! Pixel diffs between two packed ARGB images that may be offset against each other.
//!
//! The comparison image is placed at an [`Offset`] inside the reference image's coordinate
//! space. Only the overlapping rectangle is visited. Each pixel pair goes through a
//! [`DiffMode`] operator that produces an output color and a score contribution; the
//! contributions are averaged over the overlap into a normalized score.

use thiserror::Error;

pub mod argb;
pub mod chunk;
pub mod pixel;
pub mod range;
pub mod reduce;

pub use argb::{ArgbBuffer, ArgbImage};
pub use pixel::{DiffMode, diff_pixel};
pub use range::{IndexRange, Offset, overlap};
pub use reduce::{MAX_CHUNKS, NO_OVERLAP, Strategy};

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("pixel buffer holds {actual} pixels, expected {width}x{height} = {expected}")]
    BufferSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("target buffer holds {actual} pixels, reference holds {expected}")]
    TargetSize { expected: usize, actual: usize },

    #[error("unknown diff mode '{0}' (expected overwrite, transparent-white or sqr-diff-red)")]
    UnknownMode(String),

    #[error("unknown strategy '{0}' (expected chunked, rows or sequential)")]
    UnknownStrategy(String),
}

/// Render the diff of `compare` (placed at `offset`) against `reference` into `target`.
///
/// `target` must have the same length as the reference buffer. Only pixels inside the
/// overlap are written; everything else keeps whatever the caller put there, and nothing is
/// written at all when the images do not overlap.
///
/// Returns the normalized score of the pass: `0.0` for the overlay modes, the mean
/// contribution for [`DiffMode::SqrDiffRed`], and [`NO_OVERLAP`] for an empty overlap.
pub fn diff_image(
    reference: ArgbImage<'_>,
    target: &mut [u32],
    compare: ArgbImage<'_>,
    offset: Offset,
    mode: DiffMode,
) -> Result<f64, DiffError> {
    Strategy::default().reduce(reference, Some(target), compare, offset, mode)
}

/// Normalized squared-difference score of `compare` (placed at `offset`) against `reference`.
///
/// `0.0` means identical over the overlap; the per-pixel maximum is just under 255. Returns
/// [`NO_OVERLAP`] when the images share no pixels, which callers must check for before
/// treating the value as a similarity.
pub fn norm_diff(reference: ArgbImage<'_>, compare: ArgbImage<'_>, offset: Offset) -> f64 {
    let pass = reduce::Pass::without_target(reference, compare, offset, DiffMode::SqrDiffRed);
    reduce::parallel::chunked(&pass, None, MAX_CHUNKS)
}
