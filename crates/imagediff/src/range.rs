//! Overlap geometry between a reference image and an offset comparison image.

use std::ops::RangeInclusive;

/// Position of the comparison image's origin in reference coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Inclusive column and row intervals in reference coordinates.
///
/// Either interval may be empty (`start > end`), in which case the whole range is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexRange {
    pub x: RangeInclusive<i64>,
    pub y: RangeInclusive<i64>,
}

impl IndexRange {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    pub fn width(&self) -> usize {
        span(&self.x)
    }

    pub fn height(&self) -> usize {
        span(&self.y)
    }

    /// Number of pixels covered; zero for an empty range.
    pub fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }
}

fn span(r: &RangeInclusive<i64>) -> usize {
    if r.is_empty() {
        0
    } else {
        (r.end() - r.start() + 1) as usize
    }
}

/// Rectangle of reference pixels that also lie inside the comparison image shifted by
/// `offset`.
pub fn overlap(
    ref_width: usize,
    ref_height: usize,
    cmp_width: usize,
    cmp_height: usize,
    offset: Offset,
) -> IndexRange {
    let x_min = offset.x.max(0);
    let y_min = offset.y.max(0);
    let x_max = (ref_width as i64)
        .min(offset.x.saturating_add(cmp_width as i64))
        .saturating_sub(1);
    let y_max = (ref_height as i64)
        .min(offset.y.saturating_add(cmp_height as i64))
        .saturating_sub(1);

    IndexRange {
        x: x_min..=x_max,
        y: y_min..=y_max,
    }
}
