use anyhow::Result;
use tracing::info;

use crate::commands::matches_filter;
use crate::store::Store;

/// What promoting a current image does to the reference tree.
#[derive(Debug, PartialEq, Eq)]
enum Approval {
    /// The last `check` wrote a heat map for it.
    Failed,
    /// No reference yet.
    New,
    /// Overwrites a reference with no recorded failure, e.g. one that passed `check`.
    Replaced,
}

impl Approval {
    fn classify(store: &Store, id: &str) -> Self {
        if store.has_difference(id) {
            Self::Failed
        } else if store.has_reference(id) {
            Self::Replaced
        } else {
            Self::New
        }
    }
}

/// `imagediff approve` — promote current images to references.
pub fn approve(store: &Store, filter: Option<&str>) -> Result<usize> {
    let ids: Vec<String> = store
        .list_current_ids()?
        .into_iter()
        .filter(|id| matches_filter(id, filter))
        .collect();

    if ids.is_empty() {
        println!("Nothing to approve.");
        return Ok(0);
    }

    for id in &ids {
        let label = match Approval::classify(store, id) {
            Approval::Failed => "\x1b[31m  failed\x1b[0m",
            Approval::New => "\x1b[33m     new\x1b[0m",
            Approval::Replaced => "\x1b[2mreplaced\x1b[0m",
        };
        store.promote(id)?;
        println!("  Approved  {label}  {id}");
    }

    info!(count = ids.len(), "approved snapshots");
    println!();
    println!("{} snapshot(s) approved.", ids.len());
    Ok(ids.len())
}
