//! Reduction strategies: apply a [`DiffMode`] over the overlap and average the contributions.
//!
//! All strategies produce the same pixels. Scores agree up to floating point summation order.

pub mod parallel;
pub mod sequential;

use std::fmt;
use std::ops::{Range, RangeInclusive};
use std::str::FromStr;

use crate::DiffError;
use crate::argb::ArgbImage;
use crate::pixel::{DiffMode, diff_pixel};
use crate::range::{IndexRange, Offset, overlap};

/// Score returned when the two images share no pixels.
pub const NO_OVERLAP: f64 = f64::MAX;

/// Default upper bound on the number of row chunks dispatched by the chunked reducer.
pub const MAX_CHUNKS: usize = 128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Single-threaded row-major walk.
    Sequential,
    /// One parallel task per overlap row.
    Rows,
    /// At most `max_chunks` parallel tasks, each owning a contiguous band of rows.
    Chunked { max_chunks: usize },
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Chunked {
            max_chunks: MAX_CHUNKS,
        }
    }
}

impl Strategy {
    /// Replace the chunk cap. No effect on the other strategies.
    pub fn with_max_chunks(self, max_chunks: usize) -> Self {
        match self {
            Self::Chunked { .. } => Self::Chunked { max_chunks },
            other => other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Rows => "rows",
            Self::Chunked { .. } => "chunked",
        }
    }

    /// Run the diff with this strategy. See [`crate::diff_image`] for the target contract.
    pub fn reduce(
        &self,
        reference: ArgbImage<'_>,
        target: Option<&mut [u32]>,
        compare: ArgbImage<'_>,
        offset: Offset,
        mode: DiffMode,
    ) -> Result<f64, DiffError> {
        match *self {
            Self::Sequential => {
                sequential::reduce_sequential(reference, target, compare, offset, mode)
            }
            Self::Rows => parallel::reduce_rows(reference, target, compare, offset, mode),
            Self::Chunked { max_chunks } => {
                parallel::reduce_chunked(reference, target, compare, offset, mode, max_chunks)
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunked { max_chunks } => write!(f, "chunked({max_chunks})"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Strategy {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "rows" => Ok(Self::Rows),
            "chunked" => Ok(Self::default()),
            _ => Err(DiffError::UnknownStrategy(s.to_string())),
        }
    }
}

/// One validated diff invocation over a fixed overlap range.
pub(crate) struct Pass<'a> {
    reference: ArgbImage<'a>,
    compare: ArgbImage<'a>,
    offset: Offset,
    mode: DiffMode,
    range: IndexRange,
}

impl<'a> Pass<'a> {
    /// Check the target contract and compute the overlap.
    pub(crate) fn new(
        reference: ArgbImage<'a>,
        target: Option<&[u32]>,
        compare: ArgbImage<'a>,
        offset: Offset,
        mode: DiffMode,
    ) -> Result<Self, DiffError> {
        if let Some(target) = target
            && target.len() != reference.len()
        {
            return Err(DiffError::TargetSize {
                expected: reference.len(),
                actual: target.len(),
            });
        }
        Ok(Self::without_target(reference, compare, offset, mode))
    }

    /// A pass that only scores. There is no target, so there is no contract to check.
    pub(crate) fn without_target(
        reference: ArgbImage<'a>,
        compare: ArgbImage<'a>,
        offset: Offset,
        mode: DiffMode,
    ) -> Self {
        let range = overlap(
            reference.width(),
            reference.height(),
            compare.width(),
            compare.height(),
            offset,
        );

        Self {
            reference,
            compare,
            offset,
            mode,
            range,
        }
    }

    pub(crate) fn range(&self) -> &IndexRange {
        &self.range
    }

    pub(crate) fn mode(&self) -> DiffMode {
        self.mode
    }

    /// Target indices covering `rows` at full reference width.
    pub(crate) fn band_bounds(&self, rows: &RangeInclusive<i64>) -> Range<usize> {
        let width = self.reference.width();
        (*rows.start() as usize * width)..((*rows.end() + 1) as usize * width)
    }

    /// Diff the overlap columns of `rows` and return the sum of contributions.
    ///
    /// `band` must be the target slice given by [`Pass::band_bounds`] for the same rows.
    pub(crate) fn diff_rows(
        &self,
        rows: RangeInclusive<i64>,
        mut band: Option<&mut [u32]>,
    ) -> f64 {
        let ref_pixels = self.reference.pixels();
        let cmp_pixels = self.compare.pixels();
        let ref_width = self.reference.width();
        let cmp_width = self.compare.width();
        let first_row = *rows.start();

        let mut sum = 0.0;
        for iy in rows {
            let ref_row = iy as usize * ref_width;
            let cmp_row = (iy - self.offset.y) as usize * cmp_width;
            let band_row = (iy - first_row) as usize * ref_width;
            for ix in self.range.x.clone() {
                let cmp_index = cmp_row + (ix - self.offset.x) as usize;
                let (out, contribution) = diff_pixel(
                    ref_pixels[ref_row + ix as usize],
                    cmp_pixels[cmp_index],
                    self.mode,
                );
                if let Some(band) = band.as_deref_mut() {
                    band[band_row + ix as usize] = out;
                }
                sum += contribution;
            }
        }
        sum
    }

    /// Normalize a contribution sum over the overlap pixel count.
    pub(crate) fn finish(&self, sum: f64) -> f64 {
        sum / self.range.pixel_count() as f64
    }
}
