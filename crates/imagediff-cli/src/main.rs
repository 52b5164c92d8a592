mod cli;
mod commands;
mod compare;
mod config;
mod report;
mod store;

use std::path::Path;

use clap::Parser;
use config::{CliOverrides, ResolvedRunConfig};
use store::Store;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("imagediff=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let config_dir = Path::new(config::CONFIG_DIR);

    match cli.command {
        cli::Command::Init { force } => {
            commands::init(config_dir, force)?;
        }
        cli::Command::Diff {
            reference,
            compare,
            output,
            base,
            mode,
            placement,
        } => {
            let overrides = CliOverrides {
                threshold: None,
                mode,
                placement,
            };
            let config = ResolvedRunConfig::new(config_dir, overrides)?;
            commands::diff(&config, &reference, &compare, base.as_deref(), &output)?;
        }
        cli::Command::Score {
            reference,
            compare,
            placement,
        } => {
            let overrides = CliOverrides {
                placement,
                ..CliOverrides::default()
            };
            let config = ResolvedRunConfig::new(config_dir, overrides)?;
            let code = commands::score(&config, &reference, &compare)?;
            std::process::exit(code);
        }
        cli::Command::Check {
            filter,
            threshold,
            placement,
        } => {
            let overrides = CliOverrides {
                threshold,
                mode: None,
                placement,
            };
            let config = ResolvedRunConfig::new(config_dir, overrides)?;
            let code = commands::check(&config, &Store::new(config_dir), filter.as_deref())?;
            std::process::exit(code);
        }
        cli::Command::Approve { filter } => {
            commands::approve(&Store::new(config_dir), filter.as_deref())?;
        }
    }

    Ok(())
}
