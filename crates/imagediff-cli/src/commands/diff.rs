use std::path::Path;
use std::time::Instant;

use anyhow::{Result, bail};
use imagediff::{DiffMode, NO_OVERLAP};
use tracing::{info, warn};

use crate::config::ResolvedRunConfig;
use crate::report::terminal;
use crate::store::{load_image, save_png};

/// `imagediff diff` — render `compare` onto a copy of `base` (or the reference) and save it.
pub fn diff(
    config: &ResolvedRunConfig,
    reference: &Path,
    compare: &Path,
    base: Option<&Path>,
    output: &Path,
) -> Result<()> {
    let reference_image = load_image(reference)?;
    let compare_image = load_image(compare)?;

    // The core only writes the overlap, so the canvas starts as a full copy of the base.
    let mut canvas = match base {
        Some(path) => {
            let base_image = load_image(path)?;
            if (base_image.width, base_image.height)
                != (reference_image.width, reference_image.height)
            {
                bail!(
                    "base image {} is {}x{}, reference is {}x{}",
                    path.display(),
                    base_image.width,
                    base_image.height,
                    reference_image.width,
                    reference_image.height,
                );
            }
            base_image
        }
        None => reference_image.clone(),
    };

    let start = Instant::now();
    let score = config.install(|| {
        config.strategy.reduce(
            reference_image.view(),
            Some(canvas.pixels.as_mut_slice()),
            compare_image.view(),
            config.offset,
            config.mode,
        )
    })?;
    let elapsed = start.elapsed();
    info!(
        strategy = %config.strategy,
        mode = %config.mode,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "diff computed"
    );

    if score == NO_OVERLAP {
        warn!(
            x = config.offset.x,
            y = config.offset.y,
            "images do not overlap, output equals the base image"
        );
    }

    save_png(output, &canvas)?;
    println!("  saved {}", output.display());
    if config.mode == DiffMode::SqrDiffRed && score != NO_OVERLAP {
        println!("  score {score:.6}  ({})", terminal::format_duration(elapsed));
    }
    Ok(())
}
