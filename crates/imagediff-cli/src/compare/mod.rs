pub mod diff;

/// Status of a single snapshot comparison.
#[derive(Debug)]
pub enum SnapshotStatus {
    Pass {
        score: f64,
    },
    Fail {
        score: f64,
        dimension_mismatch: Option<(usize, usize, usize, usize)>,
    },
    /// The offset moves the current image completely off the reference.
    NoOverlap,
    /// Current image without a reference.
    New,
    /// Reference image without a current one.
    Missing,
    Error(String),
}

impl SnapshotStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }
}
