//! cmake-deps - build third-party CMake dependencies
//!
//! Entry point for the command-line application.

use anyhow::Result;
use clap::Parser;

use cmake_deps::cli::output::{display_error, OutputConfig};
use cmake_deps::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.apply_global();

    // Logs go to stderr; stdout carries tool output and --json documents
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(output_config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
