use anyhow::Result;
use imagediff::{ArgbBuffer, DiffMode, NO_OVERLAP, Offset, Strategy};

pub struct CompareResult {
    pub is_match: bool,
    /// Normalized squared-difference score, [`NO_OVERLAP`] when nothing overlaps.
    pub score: f64,
    /// Heat map over a copy of the reference; `None` for the identical fast path.
    pub diff_image: Option<ArgbBuffer>,
    /// `Some((ref_w, ref_h, cur_w, cur_h))` when images have different dimensions.
    pub dimension_mismatch: Option<(usize, usize, usize, usize)>,
}

impl CompareResult {
    pub fn has_overlap(&self) -> bool {
        self.score != NO_OVERLAP
    }
}

/// Two-phase comparison:
/// 1. Pixel-identical check at zero offset
/// 2. Squared-difference heat map with score
///
/// Runs the parallel strategies on the caller's rayon pool.
pub fn compare(
    reference: &ArgbBuffer,
    current: &ArgbBuffer,
    offset: Offset,
    strategy: Strategy,
) -> Result<CompareResult> {
    // Phase 1: identical
    if offset == Offset::ZERO && reference == current {
        return Ok(CompareResult {
            is_match: true,
            score: 0.0,
            diff_image: None,
            dimension_mismatch: None,
        });
    }

    let (ref_w, ref_h) = (reference.width, reference.height);
    let (cur_w, cur_h) = (current.width, current.height);
    let dimension_mismatch = if (ref_w, ref_h) != (cur_w, cur_h) {
        Some((ref_w, ref_h, cur_w, cur_h))
    } else {
        None
    };

    // Phase 2: heat map over the reference. Pixels outside the overlap keep the reference.
    let mut diff_image = reference.clone();
    let score = strategy.reduce(
        reference.view(),
        Some(diff_image.pixels.as_mut_slice()),
        current.view(),
        offset,
        DiffMode::SqrDiffRed,
    )?;

    Ok(CompareResult {
        is_match: score == 0.0,
        score,
        diff_image: Some(diff_image),
        dimension_mismatch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagediff::argb::pack_argb;

    const GREY: u32 = 0xFFC8_C8C8;

    fn with_red_pixels(image: &ArgbBuffer, n: usize) -> ArgbBuffer {
        let mut out = image.clone();
        let len = out.pixels.len();
        for i in 0..n {
            out.pixels[(i * 7919) % len] = pack_argb(255, 255, 0, 0);
        }
        out
    }

    #[test]
    fn identical_pixels_skip_the_diff() {
        let image = ArgbBuffer::blank(100, 100, GREY);
        let r = compare(&image, &image.clone(), Offset::ZERO, Strategy::default()).unwrap();
        assert!(r.is_match);
        assert_eq!(r.score, 0.0);
        assert!(r.diff_image.is_none());
        assert!(r.dimension_mismatch.is_none());
    }

    #[test]
    fn changed_pixels_produce_score_and_heat_map() {
        let reference = ArgbBuffer::blank(100, 100, GREY);
        let current = with_red_pixels(&reference, 50);
        let r = compare(&reference, &current, Offset::ZERO, Strategy::default()).unwrap();
        assert!(!r.is_match);
        assert!(r.score > 0.0);
        let heat = r.diff_image.unwrap();
        assert_eq!(heat.pixels[0], pack_argb(255, 255, 147, 147));
        assert_eq!(heat.pixels[1], pack_argb(255, 255, 255, 255));
    }

    #[test]
    fn identical_but_offset_is_still_diffed() {
        let image = ArgbBuffer::blank(10, 10, GREY);
        let r = compare(&image, &image, Offset::new(1, 1), Strategy::Sequential).unwrap();
        assert!(r.is_match);
        assert!(r.diff_image.is_some());
    }

    #[test]
    fn dimension_mismatch_reported_and_scored_on_overlap() {
        let reference = ArgbBuffer::blank(100, 100, GREY);
        let current = ArgbBuffer::blank(100, 120, GREY);
        let r = compare(&reference, &current, Offset::ZERO, Strategy::Rows).unwrap();
        assert_eq!(r.dimension_mismatch, Some((100, 100, 100, 120)));
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn no_overlap_is_flagged() {
        let image = ArgbBuffer::blank(10, 10, GREY);
        let r = compare(&image, &image, Offset::new(0, 10), Strategy::default()).unwrap();
        assert!(!r.has_overlap());
        assert!(!r.is_match);
        // Untouched: still the reference.
        assert_eq!(r.diff_image.unwrap(), image);
    }
}
