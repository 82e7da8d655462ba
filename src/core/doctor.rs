//! Doctor command logic
//!
//! Locates the CMake executable and the build tool its generator drives,
//! then checks every declared dependency for a CMake source tree.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::defaults::DEFAULT_CMAKE_PROGRAM;
use crate::core::manifest::{DependencySpec, Manifest};
use crate::core::mode::BuildMode;
use crate::core::platform::{Platform, ToolchainProfile};
use crate::infra::paths::ProjectPaths;

/// An executable looked up on `PATH`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCheck {
    /// Program as configured, a bare name or a path
    pub program: String,
    /// Resolved location, `None` when not found
    pub path: Option<PathBuf>,
    /// Version reported by `--version`, if it could be parsed
    pub version: Option<String>,
}

impl ToolCheck {
    /// Resolve `program` and query its version
    pub fn locate(program: &str) -> Self {
        let path = which::which(program).ok();
        let version = path.as_ref().and_then(|path| query_version(path));
        Self {
            program: program.to_string(),
            path,
            version,
        }
    }

    /// A program that resolves counts as found even without a parsable version
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// The configured generator and the build tool behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorCheck {
    pub generator: String,
    pub architecture: Option<String>,
    /// Standalone tool the generated files need; `None` when CMake drives
    /// the build itself, as with Visual Studio
    pub tool: Option<ToolCheck>,
}

impl GeneratorCheck {
    pub fn for_profile(profile: &ToolchainProfile) -> Self {
        Self {
            generator: profile.generator.clone(),
            architecture: profile.architecture.clone(),
            tool: generator_tool(&profile.generator).map(ToolCheck::locate),
        }
    }

    pub fn ready(&self) -> bool {
        self.tool.as_ref().map_or(true, ToolCheck::found)
    }
}

/// State of one declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCheck {
    pub name: String,
    pub source: PathBuf,
    pub has_cmake_lists: bool,
    /// Active configurations
    pub modes: Vec<&'static str>,
    pub problems: Vec<String>,
}

/// Everything `doctor` found
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub cmake: ToolCheck,
    pub generator: GeneratorCheck,
    /// Empty outside a project
    pub dependencies: Vec<DependencyCheck>,
    /// Problems with the manifest as a whole
    pub manifest_problems: Vec<String>,
}

impl DoctorReport {
    /// Every problem, toolchain first, then the manifest, then dependencies
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.cmake.found() {
            problems.push(format!("CMake program '{}' not found", self.cmake.program));
        }
        if let Some(tool) = self.generator.tool.as_ref().filter(|t| !t.found()) {
            problems.push(format!(
                "Generator '{}' needs '{}', which was not found",
                self.generator.generator, tool.program
            ));
        }
        problems.extend(self.manifest_problems.iter().cloned());
        for dependency in &self.dependencies {
            problems.extend(
                dependency
                    .problems
                    .iter()
                    .map(|problem| format!("{}: {problem}", dependency.name)),
            );
        }
        problems
    }

    pub fn is_healthy(&self) -> bool {
        self.problems().is_empty()
    }
}

/// Run all doctor checks
///
/// Without a project only the default toolchain is checked.
pub fn run_doctor(project: Option<(&Manifest, &ProjectPaths)>) -> DoctorReport {
    let Some((manifest, paths)) = project else {
        return DoctorReport {
            cmake: ToolCheck::locate(DEFAULT_CMAKE_PROGRAM),
            generator: GeneratorCheck::for_profile(&Platform::current().profile()),
            dependencies: Vec::new(),
            manifest_problems: Vec::new(),
        };
    };

    let program = manifest
        .cmake
        .program
        .as_deref()
        .unwrap_or(DEFAULT_CMAKE_PROGRAM);
    let profile = Platform::current().profile().with_overrides(&manifest.cmake);

    let mut manifest_problems = Vec::new();
    if manifest.dependencies.is_empty() {
        manifest_problems.push("No dependencies declared in deps.toml".to_string());
    }

    DoctorReport {
        cmake: ToolCheck::locate(program),
        generator: GeneratorCheck::for_profile(&profile),
        dependencies: manifest
            .dependencies
            .iter()
            .map(|dependency| check_dependency(manifest, dependency, paths))
            .collect(),
        manifest_problems,
    }
}

/// Check one dependency's source tree and configuration
pub fn check_dependency(
    manifest: &Manifest,
    dependency: &DependencySpec,
    paths: &ProjectPaths,
) -> DependencyCheck {
    let mut problems = Vec::new();

    let (source, modes) = match manifest.project(dependency, paths) {
        Ok(project) => (project.paths.source, project.modes),
        Err(e) => {
            problems.push(e.to_string());
            let source = match &dependency.source {
                Some(source) => paths.root().join(source),
                None => paths.dependency_source(&dependency.name),
            };
            (source, dependency.modes(manifest.defaults))
        }
    };

    let has_cmake_lists = source.join("CMakeLists.txt").is_file();
    if !has_cmake_lists {
        problems.push(format!("no CMakeLists.txt in {}", source.display()));
    }
    if modes.is_empty() {
        problems.push("both debug and release are disabled".to_string());
    }

    DependencyCheck {
        name: dependency.name.clone(),
        source,
        has_cmake_lists,
        modes: modes.modes().into_iter().map(BuildMode::as_str).collect(),
        problems,
    }
}

/// Build tool driven by a generator, if it is a standalone executable
fn generator_tool(generator: &str) -> Option<&'static str> {
    if generator.starts_with("Ninja") {
        Some("ninja")
    } else if generator == "Unix Makefiles" {
        Some("make")
    } else {
        None
    }
}

fn query_version(path: &std::path::Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    extract_version(&format!("{stdout}{stderr}"))
}

/// Extract version string from command output
fn extract_version(output: &str) -> Option<String> {
    // Version patterns like "1.2.3" or "v1.2.3-rc1"
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:-\w+)?)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
