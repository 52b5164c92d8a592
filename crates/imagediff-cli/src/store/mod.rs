//! Snapshot layout on disk: `reference/`, `current/` and `difference/` PNG trees under one
//! base directory. A snapshot id is the path relative to its tree without the `.png` suffix.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use imagediff::ArgbBuffer;
use tracing::warn;

pub const REFERENCE_DIR: &str = "reference";
pub const CURRENT_DIR: &str = "current";
pub const DIFFERENCE_DIR: &str = "difference";

pub struct Store {
    base: PathBuf,
}

impl Store {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn file_path(&self, subdir: &str, id: &str) -> PathBuf {
        self.base.join(subdir).join(format!("{id}.png"))
    }

    pub fn list_reference_ids(&self) -> Result<BTreeSet<String>> {
        self.list_ids(REFERENCE_DIR)
    }

    pub fn list_current_ids(&self) -> Result<BTreeSet<String>> {
        self.list_ids(CURRENT_DIR)
    }

    /// Collect every `.png` below `subdir` as an id. A missing directory is empty.
    fn list_ids(&self, subdir: &str) -> Result<BTreeSet<String>> {
        let root = self.base.join(subdir);
        let pattern = root.join("**").join("*.png");
        let pattern = pattern.to_string_lossy();

        let mut ids = BTreeSet::new();
        for entry in glob::glob(&pattern).context("Invalid snapshot glob pattern")? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable snapshot path");
                    continue;
                }
            };
            if let Ok(rel) = path.strip_prefix(&root) {
                let id = rel.with_extension("");
                // Ids use forward slashes on every platform.
                ids.insert(id.to_string_lossy().replace('\\', "/"));
            }
        }
        Ok(ids)
    }

    pub fn read_reference(&self, id: &str) -> Result<ArgbBuffer> {
        load_image(&self.file_path(REFERENCE_DIR, id))
    }

    pub fn read_current(&self, id: &str) -> Result<ArgbBuffer> {
        load_image(&self.file_path(CURRENT_DIR, id))
    }

    pub fn write_difference(&self, id: &str, image: &ArgbBuffer) -> Result<()> {
        save_png(&self.file_path(DIFFERENCE_DIR, id), image)
    }

    pub fn remove_difference(&self, id: &str) {
        let _ = std::fs::remove_file(self.file_path(DIFFERENCE_DIR, id));
    }

    pub fn has_reference(&self, id: &str) -> bool {
        self.file_path(REFERENCE_DIR, id).exists()
    }

    pub fn has_difference(&self, id: &str) -> bool {
        self.file_path(DIFFERENCE_DIR, id).exists()
    }

    /// Move `current/<id>.png` over `reference/<id>.png` and drop its difference.
    pub fn promote(&self, id: &str) -> Result<()> {
        let from = self.file_path(CURRENT_DIR, id);
        let to = self.file_path(REFERENCE_DIR, id);
        ensure_parent(&to)?;
        std::fs::copy(&from, &to)
            .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
        let _ = std::fs::remove_file(&from);
        self.remove_difference(id);
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Decode any image format `image` understands into packed ARGB.
pub fn load_image(path: &Path) -> Result<ArgbBuffer> {
    let rgba = image::ImageReader::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read {}", path.display()))?
        .decode()
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();
    Ok(ArgbBuffer::from_rgba(&rgba))
}

pub fn save_png(path: &Path, image: &ArgbBuffer) -> Result<()> {
    ensure_parent(path)?;
    image
        .to_rgba()
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))
}
