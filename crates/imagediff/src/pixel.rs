use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DiffError;
use crate::argb::{pack_argb, unpack_argb};

/// Scale that maps the largest possible squared RGB distance (3 * 255^2) onto ~255.
const SQR_DIFF_SCALE: u32 = 768;

/// How a reference/comparison pixel pair is turned into an output pixel and a score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffMode {
    /// Copy the comparison RGB over the reference.
    Overwrite,
    /// Like `Overwrite`, but pure white comparison pixels leave the reference visible.
    TransparentWhite,
    /// White-to-red heat map of the squared RGB distance; the only scoring mode.
    #[default]
    SqrDiffRed,
}

impl DiffMode {
    pub const ALL: [DiffMode; 3] = [
        DiffMode::Overwrite,
        DiffMode::TransparentWhite,
        DiffMode::SqrDiffRed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::TransparentWhite => "transparent-white",
            Self::SqrDiffRed => "sqr-diff-red",
        }
    }
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffMode {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DiffError::UnknownMode(s.to_string()))
    }
}

/// Diff one pixel pair. Returns the output pixel and its score contribution.
///
/// The output always carries the reference alpha; the comparison alpha is ignored.
#[inline]
pub fn diff_pixel(reference: u32, compare: u32, mode: DiffMode) -> (u32, f64) {
    let [ref_a, ref_r, ref_g, ref_b] = unpack_argb(reference);
    let [_, cmp_r, cmp_g, cmp_b] = unpack_argb(compare);

    match mode {
        DiffMode::Overwrite => (pack_argb(ref_a, cmp_r, cmp_g, cmp_b), 0.0),
        DiffMode::TransparentWhite => {
            if cmp_r == 0xFF && cmp_g == 0xFF && cmp_b == 0xFF {
                (pack_argb(ref_a, ref_r, ref_g, ref_b), 0.0)
            } else {
                (pack_argb(ref_a, cmp_r, cmp_g, cmp_b), 0.0)
            }
        }
        DiffMode::SqrDiffRed => {
            let dr = i32::from(ref_r) - i32::from(cmp_r);
            let dg = i32::from(ref_g) - i32::from(cmp_g);
            let db = i32::from(ref_b) - i32::from(cmp_b);
            let total_sq = (dr * dr + dg * dg + db * db) as u32;

            // 8-bit channel arithmetic: wraps instead of saturating.
            let fade = 0xFFu8.wrapping_sub((total_sq / SQR_DIFF_SCALE) as u8);
            let contribution = f64::from(total_sq) / f64::from(SQR_DIFF_SCALE);

            (pack_argb(ref_a, 0xFF, fade, fade), contribution)
        }
    }
}
