pub mod resolve;
pub mod template;

use std::path::Path;

use anyhow::{Context, Result, bail};
use imagediff::{DiffMode, MAX_CHUNKS};
use serde::{Deserialize, Serialize};

pub use self::resolve::{CliOverrides, EnvOverrides, ResolvedRunConfig};
pub use self::template::{config_file_exists, write_gitignore, write_template};

pub(crate) const CONFIG_DIR: &str = ".imagediff";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffConfig {
    /// Maximum normalized score that still passes `check`.
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub mode: DiffMode,
    #[serde(default)]
    pub x_offset: i64,
    #[serde(default)]
    pub y_offset: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelConfig {
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_max_chunks")]
    pub max_chunks: usize,
    /// Size of a dedicated worker pool; `None` runs on the global rayon pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            max_chunks: default_max_chunks(),
            threads: None,
        }
    }
}

fn default_strategy() -> String {
    "chunked".to_string()
}

fn default_max_chunks() -> usize {
    MAX_CHUNKS
}

/// Scores are averages of per-pixel values in `[0, 255)`, so only the lower bound is fixed.
pub fn validate_threshold(v: f64) -> Result<f64, String> {
    if !v.is_finite() || v < 0.0 {
        return Err(format!("threshold must be a finite number >= 0.0, got {v}"));
    }
    Ok(v)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub diff: DiffConfig,
    #[serde(default)]
    pub parallel: ParallelConfig,
}

impl Config {
    /// Validate semantic constraints that serde cannot express.
    fn validate(&self) -> Result<()> {
        validate_threshold(self.diff.threshold).map_err(|e| anyhow::anyhow!("diff.{e}"))?;

        if self.parallel.max_chunks == 0 {
            bail!("parallel.max_chunks must be >= 1");
        }

        if self.parallel.threads == Some(0) {
            bail!("parallel.threads must be >= 1 when set (omit it to use all cores)");
        }

        self.parallel
            .strategy
            .parse::<imagediff::Strategy>()
            .map_err(|e| anyhow::anyhow!("parallel.strategy: {e}"))?;

        Ok(())
    }
}

/// Read `<dir>/config.toml`. A missing file yields the defaults.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
