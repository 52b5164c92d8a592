use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use imagediff::DiffMode;

use crate::config;

fn parse_threshold(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    config::validate_threshold(v)
}

#[derive(Parser)]
#[command(
    name = "imagediff",
    about = "Pixel diffs and diff scores for offset image pairs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Placement of the comparison image and how to split the work.
#[derive(Args, Clone, Debug, Default)]
pub struct PlacementArgs {
    /// Horizontal position of the comparison image in the reference (may be negative)
    #[arg(long, short = 'x', allow_negative_numbers = true)]
    pub x_offset: Option<i64>,
    /// Vertical position of the comparison image in the reference (may be negative)
    #[arg(long, short = 'y', allow_negative_numbers = true)]
    pub y_offset: Option<i64>,
    /// Reduction strategy: chunked, rows or sequential (overrides config)
    #[arg(long)]
    pub strategy: Option<String>,
    /// Worker threads for the parallel strategies (overrides config)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create .imagediff/config.toml with default settings
    Init {
        /// Overwrite existing config and gitignore
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Render a diff image of two PNGs
    Diff {
        /// Reference image (PNG)
        #[arg(long)]
        reference: PathBuf,
        /// Comparison image (PNG)
        #[arg(long)]
        compare: PathBuf,
        /// Where to write the rendered image (PNG)
        #[arg(long, short = 'o')]
        output: PathBuf,
        /// Image the output starts from; defaults to the reference
        #[arg(long)]
        base: Option<PathBuf>,
        /// overwrite, transparent-white or sqr-diff-red (overrides config)
        #[arg(long, short = 'm')]
        mode: Option<DiffMode>,
        #[command(flatten)]
        placement: PlacementArgs,
    },

    /// Print the normalized diff score of two PNGs (exit 1 when they do not overlap)
    Score {
        /// Reference image (PNG)
        #[arg(long)]
        reference: PathBuf,
        /// Comparison image (PNG)
        #[arg(long)]
        compare: PathBuf,
        #[command(flatten)]
        placement: PlacementArgs,
    },

    /// Compare current/ snapshots against reference/ (exit 0/1)
    Check {
        /// Only check snapshots whose name contains PATTERN (case-insensitive)
        #[arg(long, short = 'f')]
        filter: Option<String>,
        /// Max allowed diff score. Snapshots within threshold pass.
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,
        #[command(flatten)]
        placement: PlacementArgs,
    },

    /// Promote current/ snapshots to reference/
    Approve {
        /// Only approve snapshots whose name contains PATTERN (case-insensitive)
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },
}
