//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod clear;
pub mod doctor;
pub mod lifecycle;
pub mod list;
pub mod paths;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::defaults::{MANIFEST_FILE, TARGET_ALL};
use crate::core::manifest::Manifest;
use crate::core::workflow::{Operation, Selection};
use crate::infra::paths::ProjectPaths;

/// Dependency and mode selection shared by the lifecycle commands
#[derive(Args, Debug, Clone, Default)]
pub struct SelectArgs {
    /// Dependencies to process (all declared dependencies if omitted)
    #[arg(value_name = "DEP")]
    pub dependencies: Vec<String>,

    /// Skip the Debug configuration
    #[arg(long)]
    pub no_debug: bool,

    /// Skip the Release configuration
    #[arg(long)]
    pub no_release: bool,
}

impl From<SelectArgs> for Selection {
    fn from(args: SelectArgs) -> Self {
        Self {
            names: args.dependencies,
            no_debug: args.no_debug,
            no_release: args.no_release,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure, build and install dependencies
    Setup(SelectArgs),

    /// Run the CMake configure step
    Generate(SelectArgs),

    /// Build a target in the configured build directories
    Build {
        #[command(flatten)]
        select: SelectArgs,

        /// Target to build (`all` and `install` map to the platform's names)
        #[arg(short, long, default_value = TARGET_ALL)]
        target: String,
    },

    /// Build the install target into the shared prefix
    Install(SelectArgs),

    /// Build the clean target
    Clean(SelectArgs),

    /// Delete the Debug and Release build directories
    Clear(SelectArgs),

    /// List declared dependencies
    List,

    /// Show the project path registry
    Paths,

    /// Check system dependencies and project configuration
    Doctor,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, root: Option<&Path>) -> Result<()> {
        match self {
            Self::Setup(select) => lifecycle::execute(root, Operation::Setup, select.into()).await,
            Self::Generate(select) => {
                lifecycle::execute(root, Operation::Generate, select.into()).await
            }
            Self::Build { select, target } => {
                lifecycle::execute(root, Operation::Build { target }, select.into()).await
            }
            Self::Install(select) => {
                lifecycle::execute(root, Operation::Install, select.into()).await
            }
            Self::Clean(select) => lifecycle::execute(root, Operation::Clean, select.into()).await,
            Self::Clear(select) => clear::execute(root, select.into()).await,
            Self::List => list::execute(root).await,
            Self::Paths => paths::execute(root).await,
            Self::Doctor => doctor::execute(root).await,
        }
    }
}

/// Resolve the project root
///
/// An explicit root wins; otherwise the nearest ancestor of the working
/// directory containing the manifest is used.
pub fn resolve_paths(root: Option<&Path>) -> Result<ProjectPaths> {
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    match root {
        Some(root) => Ok(ProjectPaths::new(root, &cwd)),
        None => ProjectPaths::discover(&cwd).with_context(|| {
            format!(
                "No {MANIFEST_FILE} found in {} or any parent directory. \
                 Use --root to point at the project.",
                cwd.display()
            )
        }),
    }
}

/// Resolve the project root and load its manifest
pub fn load_project(root: Option<&Path>) -> Result<(ProjectPaths, Manifest)> {
    let paths = resolve_paths(root)?;
    let manifest = Manifest::load(&paths.manifest())
        .with_context(|| format!("Failed to load project at {}", paths.root().display()))?;
    Ok((paths, manifest))
}
