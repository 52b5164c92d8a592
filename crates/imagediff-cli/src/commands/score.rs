use std::path::Path;

use anyhow::Result;
use imagediff::{DiffMode, NO_OVERLAP};
use tracing::debug;

use crate::config::ResolvedRunConfig;
use crate::store::load_image;

/// `imagediff score` — print the normalized squared difference without rendering anything.
///
/// Returns the process exit code: 0 with a score, 1 when the images do not overlap.
pub fn score(config: &ResolvedRunConfig, reference: &Path, compare: &Path) -> Result<i32> {
    let value = compute(config, reference, compare)?;
    if value == NO_OVERLAP {
        println!("no overlap");
        return Ok(1);
    }
    println!("{value:.6}");
    Ok(0)
}

fn compute(config: &ResolvedRunConfig, reference: &Path, compare: &Path) -> Result<f64> {
    let reference_image = load_image(reference)?;
    let compare_image = load_image(compare)?;

    let value = config.install(|| {
        config.strategy.reduce(
            reference_image.view(),
            None,
            compare_image.view(),
            config.offset,
            DiffMode::SqrDiffRed,
        )
    })?;
    debug!(strategy = %config.strategy, score = value, "scored");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliOverrides, Config, EnvOverrides};
    use crate::store::save_png;
    use imagediff::argb::pack_argb;
    use imagediff::{ArgbBuffer, Offset};

    fn fixtures(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
        let reference = dir.join("ref.png");
        let compare = dir.join("cmp.png");
        save_png(&reference, &ArgbBuffer::blank(8, 8, pack_argb(255, 0, 0, 0))).unwrap();
        save_png(&compare, &ArgbBuffer::blank(8, 8, pack_argb(255, 16, 0, 0))).unwrap();
        (reference, compare)
    }

    fn config_with_offset(offset: Offset) -> ResolvedRunConfig {
        let mut config = ResolvedRunConfig::merge(
            Config::default(),
            EnvOverrides::default(),
            CliOverrides::default(),
        )
        .unwrap();
        config.offset = offset;
        config
    }

    #[test]
    fn score_is_per_pixel_average() {
        let dir = tempfile::tempdir().unwrap();
        let (reference, compare) = fixtures(dir.path());

        let value = compute(&config_with_offset(Offset::ZERO), &reference, &compare).unwrap();
        assert!((value - 256.0 / 768.0).abs() < 1e-12);
        assert_eq!(
            score(&config_with_offset(Offset::ZERO), &reference, &compare).unwrap(),
            0
        );
    }

    #[test]
    fn disjoint_images_exit_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let (reference, compare) = fixtures(dir.path());

        let config = config_with_offset(Offset::new(8, 0));
        assert_eq!(compute(&config, &reference, &compare).unwrap(), NO_OVERLAP);
        assert_eq!(score(&config, &reference, &compare).unwrap(), 1);
    }
}
