use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use imagediff::{DiffMode, Offset, Strategy};
use tracing::debug;

use super::{Config, load, validate_threshold};
use crate::cli::PlacementArgs;

/// Values extracted from the CLI that participate in the merge.
#[derive(Default)]
pub struct CliOverrides {
    pub threshold: Option<f64>,
    pub mode: Option<DiffMode>,
    pub placement: PlacementArgs,
}

/// Values read from `IMAGEDIFF_*` environment variables.
#[derive(Default)]
pub struct EnvOverrides {
    pub threshold: Option<f64>,
    pub threads: Option<usize>,
}

impl EnvOverrides {
    pub fn from_env() -> Result<Self> {
        let threshold = std::env::var("IMAGEDIFF_DIFF_THRESHOLD")
            .ok()
            .map(|v| v.parse::<f64>())
            .transpose()
            .context("IMAGEDIFF_DIFF_THRESHOLD must be a valid float")?;
        let threads = std::env::var("IMAGEDIFF_THREADS")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("IMAGEDIFF_THREADS must be a positive integer")?;
        Ok(Self { threshold, threads })
    }
}

/// Fully resolved config after CLI > env > file > defaults merge.
#[derive(Debug)]
pub struct ResolvedRunConfig {
    pub threshold: f64,
    pub mode: DiffMode,
    pub offset: Offset,
    pub strategy: Strategy,
    pub threads: Option<usize>,
    /// Dedicated pool, built once when `threads` is set and shared by every diff of the run.
    pool: Option<rayon::ThreadPool>,
}

impl ResolvedRunConfig {
    pub fn new(config_dir: &Path, cli: CliOverrides) -> Result<Self> {
        let file_config = load(config_dir)?;
        let env = EnvOverrides::from_env()?;
        Self::merge(file_config, env, cli)
    }

    pub fn merge(file: Config, env: EnvOverrides, cli: CliOverrides) -> Result<Self> {
        let threshold = cli
            .threshold
            .or(env.threshold)
            .unwrap_or(file.diff.threshold);
        validate_threshold(threshold).map_err(|e| anyhow!("{e}"))?;

        let mode = cli.mode.unwrap_or(file.diff.mode);

        let offset = Offset::new(
            cli.placement.x_offset.unwrap_or(file.diff.x_offset),
            cli.placement.y_offset.unwrap_or(file.diff.y_offset),
        );

        let strategy_name = cli
            .placement
            .strategy
            .as_deref()
            .unwrap_or(file.parallel.strategy.as_str());
        let strategy = strategy_name
            .parse::<Strategy>()
            .map_err(|e| anyhow!("{e}"))?
            .with_max_chunks(file.parallel.max_chunks);

        let threads = cli.placement.threads.or(env.threads).or(file.parallel.threads);
        let pool = threads.map(build_thread_pool).transpose()?;

        let resolved = Self {
            threshold,
            mode,
            offset,
            strategy,
            threads,
            pool,
        };
        debug!(?resolved, "resolved run config");
        Ok(resolved)
    }

    /// Run `f` on the dedicated pool, or on the global pool when `threads` is unset.
    pub fn install<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

fn build_thread_pool(threads: usize) -> Result<rayon::ThreadPool> {
    if threads == 0 {
        bail!("thread count must be >= 1");
    }
    debug!(threads, "building rayon thread pool");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .context("Failed to build rayon thread pool")
}
