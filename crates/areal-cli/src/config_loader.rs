//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use areal_core::config::{
    parse_join_suffix, parse_validity_mode, CliConfigOverrides, ExecutionMode, LayeredConfig,
};
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "areal.toml";

/// Load layered configuration: file, then environment, then CLI flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path(cli.config.as_deref()) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(cli_overrides(cli)?);
    Ok(config)
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

fn cli_overrides(cli: &Cli) -> Result<CliConfigOverrides> {
    let geometry_validity = cli
        .validity
        .as_deref()
        .map(parse_validity_mode)
        .transpose()
        .context("Invalid --validity")?;

    let mut overrides = CliConfigOverrides {
        crs: cli.crs,
        geometry_validity,
        execution: (cli.parallel || cli.threads.is_some()).then_some(ExecutionMode::Parallel),
        threads: cli.threads,
        ..Default::default()
    };

    match &cli.command {
        Commands::Join(args) => {
            overrides.join_suffix = args
                .suffix
                .as_deref()
                .map(parse_join_suffix)
                .transpose()
                .context("Invalid --suffix")?;
        }
        Commands::Interpolate(args) => {
            if let Some(epsilon) = args.area_epsilon {
                if !epsilon.is_finite() || epsilon < 0.0 {
                    anyhow::bail!("--area-epsilon must be finite and non-negative, got {}", epsilon);
                }
            }
            overrides.area_epsilon = args.area_epsilon;
        }
        _ => {}
    }

    if overrides.threads == Some(0) {
        anyhow::bail!("--threads must be positive");
    }

    Ok(overrides)
}
