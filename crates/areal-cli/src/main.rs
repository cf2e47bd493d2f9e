//! Areal CLI - Command-line interface
//!
//! Runs the overlay operations over GeoJSON files.

mod cli;
mod commands;
mod config_loader;
mod output;
mod output_types;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use output::OutputWriter;

fn main() -> ExitCode {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let output = OutputWriter::new(cli.json);

    match commands::execute(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
