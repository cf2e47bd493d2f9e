//! Command implementations

mod config;
mod contain;
mod dissolve;
mod inspect;
mod interpolate;
mod join;
mod project;
mod subset;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::WriteOutput;
use anyhow::{Context, Result};
use areal_core::config::LayeredConfig;
use areal_core::formats::{geojson::to_geojson_string, read_collection, write_collection};
use areal_core::{Crs, FeatureCollection};
use areal_ops::{FieldReducer, OpsOptions, SpatialOps};
use std::path::Path;

/// Execute a CLI command
pub fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let config = load_config(&cli)?;
    let ctx = CommandContext {
        config: &config,
        output,
        destination: cli.output.as_deref(),
    };

    match cli.command {
        Commands::Subset(args) => subset::execute(args, &ctx),
        Commands::Join(args) => join::execute(args, &ctx),
        Commands::Interpolate(args) => interpolate::execute(args, &ctx),
        Commands::Dissolve(args) => dissolve::execute(args, &ctx),
        Commands::Contain(args) => contain::execute(args, &ctx),
        Commands::Project(args) => project::execute(args, &ctx),
        Commands::Inspect(args) => inspect::execute(args, &ctx),
        Commands::Config => config::execute(&ctx),
    }
}

/// State shared by every command
pub(crate) struct CommandContext<'a> {
    pub config: &'a LayeredConfig,
    pub output: &'a OutputWriter,
    pub destination: Option<&'a Path>,
}

impl CommandContext<'_> {
    pub fn ops(&self) -> SpatialOps {
        SpatialOps::new(OpsOptions::from(self.config))
    }

    /// Read a GeoJSON input, assigning the configured CRS when it declares none
    pub fn read_input(&self, path: &Path) -> Result<FeatureCollection> {
        let collection = read_collection(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        tracing::debug!(path = %path.display(), features = collection.len(), "Loaded input");
        Ok(collection.or_crs(self.config.crs.value.map(Crs::from_epsg)))
    }

    /// Write a result to `--output`, or print it as GeoJSON on stdout
    pub fn write_result(
        &self,
        operation: &str,
        input_features: usize,
        result: &FeatureCollection,
    ) -> Result<()> {
        match self.destination {
            Some(path) => {
                write_collection(result, path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;

                if self.output.is_json() {
                    self.output.result(WriteOutput {
                        operation: operation.to_string(),
                        path: path.display().to_string(),
                        input_features,
                        output_features: result.len(),
                    })?;
                } else {
                    self.output.success(format!(
                        "{}: {} input features -> {} output features written to {}",
                        operation,
                        input_features,
                        result.len(),
                        path.display()
                    ));
                }
            }
            None => self.output.raw(&to_geojson_string(result)?),
        }
        Ok(())
    }
}

/// Parse `field:reducer[:alias]` arguments
pub(crate) fn parse_reducers(specs: &[String]) -> Result<Vec<FieldReducer>> {
    specs
        .iter()
        .map(|spec| {
            spec.parse::<FieldReducer>()
                .with_context(|| format!("Invalid --reduce '{}'", spec))
        })
        .collect()
}
