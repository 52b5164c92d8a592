use std::collections::BTreeSet;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info};

use crate::commands::matches_filter;
use crate::compare::{SnapshotStatus, diff};
use crate::config::ResolvedRunConfig;
use crate::report::terminal::{self, Summary};
use crate::store::Store;

/// `imagediff check` — compare every current image against its reference.
///
/// Returns the process exit code: 0 when every snapshot passes, 1 otherwise.
pub fn check(config: &ResolvedRunConfig, store: &Store, filter: Option<&str>) -> Result<i32> {
    let start = Instant::now();

    let reference_ids = store.list_reference_ids()?;
    let current_ids = store.list_current_ids()?;
    let ids: BTreeSet<&String> = reference_ids
        .iter()
        .chain(current_ids.iter())
        .filter(|id| matches_filter(id, filter))
        .collect();

    info!(
        references = reference_ids.len(),
        current = current_ids.len(),
        selected = ids.len(),
        strategy = %config.strategy,
        "checking snapshots"
    );

    let total = ids.len();
    let mut summary = Summary::default();
    for (done, id) in ids.into_iter().enumerate() {
        terminal::show_progress(done, total);
        let snap_start = Instant::now();

        let status = match (reference_ids.contains(id), current_ids.contains(id)) {
            (true, true) => compare_one(config, store, id)
                .unwrap_or_else(|e| SnapshotStatus::Error(format!("{e:#}"))),
            (false, true) => SnapshotStatus::New,
            (true, false) => SnapshotStatus::Missing,
            (false, false) => unreachable!("id came from one of the listings"),
        };
        debug!(%id, ?status, "compared");

        terminal::print_line(id, &status, snap_start.elapsed());
        summary.record(&status);
    }

    terminal::print_summary(&summary, config.threshold, start.elapsed());
    Ok(if summary.all_passed() { 0 } else { 1 })
}

fn compare_one(config: &ResolvedRunConfig, store: &Store, id: &str) -> Result<SnapshotStatus> {
    let reference = store.read_reference(id)?;
    let current = store.read_current(id)?;

    let result =
        config.install(|| diff::compare(&reference, &current, config.offset, config.strategy))?;

    if !result.has_overlap() {
        if let Some(image) = &result.diff_image {
            store.write_difference(id, image)?;
        }
        return Ok(SnapshotStatus::NoOverlap);
    }

    if result.is_match || result.score <= config.threshold {
        store.remove_difference(id);
        return Ok(SnapshotStatus::Pass {
            score: result.score,
        });
    }

    if let Some(image) = &result.diff_image {
        store.write_difference(id, image)?;
    }
    Ok(SnapshotStatus::Fail {
        score: result.score,
        dimension_mismatch: result.dimension_mismatch,
    })
}
