//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no build logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::defaults::ENV_ROOT;
use commands::Commands;

/// Long version string with build metadata
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_SHA"),
    "\ntarget: ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

/// cmake-deps - build third-party CMake dependencies
///
/// Configures, builds and installs the dependencies declared in deps.toml
/// into the project's shared install prefix.
#[derive(Parser, Debug)]
#[command(name = "cmake-deps")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Project root (defaults to the nearest directory containing deps.toml)
    #[arg(long, global = true, env = ENV_ROOT, value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        if let Some(cmd) = self.command {
            cmd.run(self.root.as_deref()).await
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
