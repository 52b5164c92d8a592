use std::path::Path;

use anyhow::{Context, Result};

use super::CONFIG_FILE;

/// Hand-crafted config template with every key commented out, so `imagediff init` shows the
/// available knobs while leaving the built-in defaults in charge.
const CONFIG_TEMPLATE: &str = r#"# ─────────────────────────────────────────────────────────
# Comparison — all fields optional.
# ─────────────────────────────────────────────────────────
[diff]
# threshold = 0.0                   # max normalized score that passes `check` (0.0 = exact)
# mode = "sqr-diff-red"             # "sqr-diff-red" | "overwrite" | "transparent-white"
# x_offset = 0                      # comparison image position inside the reference
# y_offset = 0

# ─────────────────────────────────────────────────────────
# Parallelism — all fields optional.
# ─────────────────────────────────────────────────────────
[parallel]
# strategy = "chunked"              # "chunked" | "rows" | "sequential"
# max_chunks = 128                  # upper bound on row bands per diff
# threads = 8                       # dedicated worker pool (omit = all cores)
"#;

pub fn config_file_exists(dir: &Path) -> bool {
    dir.join(CONFIG_FILE).exists()
}

pub fn write_gitignore(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(".gitignore");
    if !force && path.exists() {
        return Ok(());
    }
    std::fs::write(&path, "current/\ndifference/\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn write_template(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(CONFIG_FILE);
    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load;

    #[test]
    fn template_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path()).unwrap();
        assert!(config_file_exists(dir.path()));

        let config = load(dir.path()).unwrap();
        assert_eq!(config.parallel.strategy, "chunked");
        assert_eq!(config.parallel.max_chunks, 128);
    }

    #[test]
    fn gitignore_is_kept_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".gitignore");
        std::fs::write(&path, "custom\n").unwrap();

        write_gitignore(dir.path(), false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "custom\n");

        write_gitignore(dir.path(), true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("difference/"));
    }
}
