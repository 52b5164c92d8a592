mod approve;
mod check;
mod diff;
mod init;
mod score;

pub use self::approve::approve;
pub use self::check::check;
pub use self::diff::diff;
pub use self::init::init;
pub use self::score::score;

fn normalize_for_filter(s: &str) -> String {
    s.to_lowercase().replace('_', " ")
}

/// Case-insensitive substring match; a trailing `.png` on the pattern is ignored so names
/// copied from a file listing work too.
pub(crate) fn matches_filter(id: &str, filter: Option<&str>) -> bool {
    filter
        .map(|pat| {
            let pat = pat.strip_suffix(".png").unwrap_or(pat);
            normalize_for_filter(id).contains(&normalize_for_filter(pat))
        })
        .unwrap_or(true)
}
