use std::path::Path;

use anyhow::{Result, bail};

use crate::config;

/// `imagediff init` — create .imagediff/config.toml.
pub fn init(dir: &Path, force: bool) -> Result<()> {
    if !force && config::config_file_exists(dir) {
        bail!(
            "{}/config.toml already exists (use --force to overwrite)",
            dir.display()
        );
    }

    config::write_template(dir)?;
    config::write_gitignore(dir, force)?;

    let verb = if force { "Regenerated" } else { "Created" };
    println!("{verb} {}/config.toml", dir.display());
    println!("  put baseline images in {}/reference/", dir.display());
    println!("  put new renderings in  {}/current/", dir.display());
    Ok(())
}
