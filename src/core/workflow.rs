//! Dependency workflow
//!
//! Applies one lifecycle operation to the selected dependencies of a
//! manifest, one dependency at a time in manifest order. The first failure
//! aborts the run. Clearing build directories runs no commands and has its
//! own entry point.

use std::fmt;

use tracing::info;

use crate::core::cmake::{CMakeProject, ClearResult};
use crate::core::manifest::Manifest;
use crate::error::DepsError;
use crate::infra::paths::ProjectPaths;
use crate::infra::process::CommandRunner;

/// Lifecycle operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Configure, build and install
    Setup,
    /// Configure only
    Generate,
    /// Build a target
    Build { target: String },
    /// Build the install target
    Install,
    /// Build the clean target
    Clean,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => f.write_str("setup"),
            Self::Generate => f.write_str("generate"),
            Self::Build { target } => write!(f, "build ({target})"),
            Self::Install => f.write_str("install"),
            Self::Clean => f.write_str("clean"),
        }
    }
}

/// Which dependencies and modes to operate on
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Dependency names; empty means all
    pub names: Vec<String>,
    /// Skip the Debug configuration
    pub no_debug: bool,
    /// Skip the Release configuration
    pub no_release: bool,
}

/// Outcome for one dependency
#[derive(Debug)]
pub struct DependencyReport {
    pub name: String,
    /// Number of commands run
    pub commands: usize,
}

/// Build configurations for the selection, in manifest order
pub fn projects(
    manifest: &Manifest,
    paths: &ProjectPaths,
    selection: &Selection,
) -> Result<Vec<CMakeProject>, DepsError> {
    manifest
        .select(&selection.names)?
        .into_iter()
        .map(|dependency| -> Result<CMakeProject, DepsError> {
            let project = manifest.project(dependency, paths)?;
            let modes = project
                .modes
                .without(selection.no_debug, selection.no_release);
            Ok(project.with_modes(modes))
        })
        .collect()
}

/// Run `operation` on every selected dependency
pub async fn run<R: CommandRunner>(
    manifest: &Manifest,
    paths: &ProjectPaths,
    selection: &Selection,
    operation: &Operation,
    runner: &mut R,
) -> Result<Vec<DependencyReport>, DepsError> {
    let mut reports = Vec::new();

    for project in projects(manifest, paths, selection)? {
        info!(dependency = %project.name, %operation, "starting");

        let outputs = match operation {
            Operation::Setup => project.setup(runner).await,
            Operation::Generate => project.generate(runner).await,
            Operation::Build { target } => project.build(runner, target).await,
            Operation::Install => project.install(runner).await,
            Operation::Clean => project.clean(runner).await,
        }
        .map_err(|source| DepsError::Build {
            dependency: project.name.clone(),
            source,
        })?;

        reports.push(DependencyReport {
            name: project.name,
            commands: outputs.len(),
        });
    }

    Ok(reports)
}

/// Delete the build directories of every selected dependency
///
/// Both configurations are removed whatever the mode selection says.
pub fn clear(
    manifest: &Manifest,
    paths: &ProjectPaths,
    selection: &Selection,
) -> Result<Vec<(String, ClearResult)>, DepsError> {
    projects(manifest, paths, selection)?
        .into_iter()
        .map(|project| -> Result<(String, ClearResult), DepsError> {
            info!(dependency = %project.name, "clearing build directories");
            let result = project.clear()?;
            Ok((project.name, result))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingRunner;
    use std::path::Path;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[[dependency]]
name = "zlib"
release = false

[[dependency]]
name = "glfw"
options = { GLFW_BUILD_DOCS = false }
"#;

    fn setup() -> (TempDir, ProjectPaths, Manifest) {
        let temp = TempDir::new().unwrap();
        let paths = ProjectPaths::new(temp.path(), Path::new("/"));
        let manifest = Manifest::from_toml(MANIFEST).unwrap();
        (temp, paths, manifest)
    }

    #[tokio::test]
    async fn test_setup_processes_dependencies_in_order() {
        let (_temp, paths, manifest) = setup();
        let mut runner = RecordingRunner::new();

        let reports = run(
            &manifest,
            &paths,
            &Selection::default(),
            &Operation::Setup,
            &mut runner,
        )
        .await
        .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].name, "zlib");
        assert_eq!(reports[0].commands, 3);
        assert_eq!(reports[1].name, "glfw");
        assert_eq!(reports[1].commands, 6);
        assert!(runner.commands[0].contains("3rdparty/zlib"));
        assert!(runner.commands[3].contains("-DGLFW_BUILD_DOCS=OFF"));
    }

    #[tokio::test]
    async fn test_selection_narrows_dependencies_and_modes() {
        let (_temp, paths, manifest) = setup();
        let mut runner = RecordingRunner::new();
        let selection = Selection {
            names: vec!["glfw".to_string()],
            no_debug: true,
            no_release: false,
        };

        run(&manifest, &paths, &selection, &Operation::Generate, &mut runner)
            .await
            .unwrap();

        assert_eq!(runner.commands.len(), 1);
        assert!(runner.commands[0].contains("-DCMAKE_BUILD_TYPE=Release"));
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_dependencies() {
        let (_temp, paths, manifest) = setup();
        let mut runner = RecordingRunner::failing_at(0, 1);

        let err = run(
            &manifest,
            &paths,
            &Selection::default(),
            &Operation::Setup,
            &mut runner,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DepsError::Build { dependency, .. } if dependency == "zlib"));
        assert_eq!(runner.commands.len(), 1);
    }

    #[test]
    fn test_clear_reports_directories() {
        let (_temp, paths, manifest) = setup();
        let debug_dir = paths.dependency_build("glfw", crate::core::mode::BuildMode::Debug);
        let zlib_dir = paths.dependency_build("zlib", crate::core::mode::BuildMode::Debug);
        std::fs::create_dir_all(&debug_dir).unwrap();
        std::fs::create_dir_all(&zlib_dir).unwrap();
        let selection = Selection {
            names: vec!["glfw".to_string()],
            no_debug: true,
            ..Selection::default()
        };

        let cleared = clear(&manifest, &paths, &selection).unwrap();

        assert_eq!(cleared.len(), 1);
        assert_eq!(cleared[0].0, "glfw");
        assert_eq!(cleared[0].1.removed, vec![debug_dir.clone()]);
        assert_eq!(cleared[0].1.skipped.len(), 1);
        assert!(!debug_dir.exists());
        assert!(zlib_dir.exists());
    }

    #[tokio::test]
    async fn test_unknown_dependency_is_rejected() {
        let (_temp, paths, manifest) = setup();
        let mut runner = RecordingRunner::new();
        let selection = Selection {
            names: vec!["sdl".to_string()],
            ..Selection::default()
        };

        let err = run(&manifest, &paths, &selection, &Operation::Install, &mut runner)
            .await
            .unwrap_err();

        assert!(matches!(err, DepsError::Manifest(_)));
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Setup.to_string(), "setup");
        assert_eq!(Operation::Clean.to_string(), "clean");
        assert_eq!(
            Operation::Build {
                target: "all".to_string()
            }
            .to_string(),
            "build (all)"
        );
    }
}
