use tracing::trace;

use super::{NO_OVERLAP, Pass};
use crate::DiffError;
use crate::argb::ArgbImage;
use crate::pixel::DiffMode;
use crate::range::Offset;

/// Single-threaded reduction over the overlap, row by row.
///
/// This is the reference the parallel reducers are tested against.
pub fn reduce_sequential(
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

    let rows = pass.range().y.clone();
    trace!(
        rows = pass.range().height(),
        cols = pass.range().width(),
        mode = %pass.mode(),
        "sequential diff"
    );

    let band = target.map(|t| &mut t[pass.band_bounds(&rows)]);
    let sum = pass.diff_rows(rows, band);
    Ok(pass.finish(sum))
}
