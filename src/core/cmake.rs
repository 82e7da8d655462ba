//! CMake build configuration
//!
//! One [`CMakeProject`] describes how a single third-party dependency is
//! configured, built and installed: its source directory, one build
//! directory per build mode, the shared install prefix, and the cache
//! options passed to the configure step.
//!
//! Every operation issues its commands through a [`CommandRunner`] in a
//! fixed order (Debug before Release) and stops at the first command that
//! exits unsuccessfully.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::defaults::{
    BUILD_TYPE_VARIABLE, DEFAULT_CMAKE_PROGRAM, FAILURE_OUTPUT_LINES, INSTALL_PREFIX_VARIABLE,
    TARGET_ALL, TARGET_CLEAN, TARGET_INSTALL,
};
use crate::core::invocation::{display_path, Invocation, Shell};
use crate::core::mode::{BuildMode, ModeSelection};
use crate::core::options::BuildOptions;
use crate::core::platform::{Platform, ToolchainProfile};
use crate::error::{BuildError, FilesystemError};
use crate::infra::filesystem;
use crate::infra::paths::ProjectPaths;
use crate::infra::process::{CommandRunner, ProcessOutput};

/// Directories used by one dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakePaths {
    /// Directory holding the top-level `CMakeLists.txt`
    pub source: PathBuf,
    /// Build tree for the Debug configuration
    pub build_debug: PathBuf,
    /// Build tree for the Release configuration
    pub build_release: PathBuf,
    /// Install prefix
    pub install: PathBuf,
}

impl CMakePaths {
    /// Standard layout for a dependency under the project root
    pub fn for_dependency(paths: &ProjectPaths, name: &str) -> Self {
        Self {
            source: paths.dependency_source(name),
            build_debug: paths.dependency_build(name, BuildMode::Debug),
            build_release: paths.dependency_build(name, BuildMode::Release),
            install: paths.dependencies(),
        }
    }

    /// Build tree for a mode
    pub fn build_dir(&self, mode: BuildMode) -> &Path {
        match mode {
            BuildMode::Debug => &self.build_debug,
            BuildMode::Release => &self.build_release,
        }
    }
}

/// Result of [`CMakeProject::clear`]
#[derive(Debug, Default)]
pub struct ClearResult {
    /// Build directories that were removed
    pub removed: Vec<PathBuf>,
    /// Build directories that did not exist
    pub skipped: Vec<PathBuf>,
}

/// Build configuration of one dependency
#[derive(Debug, Clone)]
pub struct CMakeProject {
    /// Dependency name, used in logs
    pub name: String,
    pub paths: CMakePaths,
    /// Cache options for the configure step
    pub options: BuildOptions,
    /// Active build modes
    pub modes: ModeSelection,
    program: String,
    profile: ToolchainProfile,
}

impl CMakeProject {
    /// Create a configuration with both modes enabled, the default `cmake`
    /// executable and the current platform's toolchain profile
    pub fn new(name: impl Into<String>, paths: CMakePaths) -> Self {
        Self {
            name: name.into(),
            paths,
            options: BuildOptions::new(),
            modes: ModeSelection::both(),
            program: DEFAULT_CMAKE_PROGRAM.to_string(),
            profile: Platform::current().profile(),
        }
    }

    /// Create a configuration using the standard layout for `name`
    pub fn for_dependency(paths: &ProjectPaths, name: &str) -> Self {
        Self::new(name, CMakePaths::for_dependency(paths, name))
    }

    /// Set the CMake executable
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the toolchain profile
    #[must_use]
    pub fn with_profile(mut self, profile: ToolchainProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the active build modes
    #[must_use]
    pub fn with_modes(mut self, modes: ModeSelection) -> Self {
        self.modes = modes;
        self
    }

    /// Set the cache options
    #[must_use]
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn profile(&self) -> &ToolchainProfile {
        &self.profile
    }

    /// Configure command for one mode
    ///
    /// `CMAKE_BUILD_TYPE` and `CMAKE_INSTALL_PREFIX` are always injected
    /// after the user's options; a user value for either is replaced. Fails
    /// if an argument cannot be passed through the platform shell.
    pub fn configure_invocation(&self, mode: BuildMode) -> Result<Invocation, BuildError> {
        let mut options = self.options.clone();
        options.set(BUILD_TYPE_VARIABLE, mode.as_str())?;
        options.set(INSTALL_PREFIX_VARIABLE, display_path(&self.paths.install))?;

        let mut invocation = Invocation::new(&self.program)
            .arg("-S")
            .path_arg(&self.paths.source)
            .arg("-B")
            .path_arg(self.paths.build_dir(mode))
            .arg("-G")
            .arg(&self.profile.generator);
        if let Some(architecture) = &self.profile.architecture {
            invocation = invocation.arg("-A").arg(architecture);
        }
        shell_checked(invocation.args(options.to_defines()))
    }

    /// Build command for one mode and target
    pub fn build_invocation(&self, mode: BuildMode, target: &str) -> Result<Invocation, BuildError> {
        shell_checked(
            Invocation::new(&self.program)
                .arg("--build")
                .path_arg(self.paths.build_dir(mode))
                .arg("--target")
                .arg(self.profile.target_alias(target))
                .arg("--config")
                .arg(mode.as_str()),
        )
    }

    /// Run the configure step for every active mode
    ///
    /// Build directories are left to CMake to create.
    pub async fn generate<R: CommandRunner>(
        &self,
        runner: &mut R,
    ) -> Result<Vec<ProcessOutput>, BuildError> {
        for reserved in [BUILD_TYPE_VARIABLE, INSTALL_PREFIX_VARIABLE] {
            if self.options.contains(reserved) {
                warn!(
                    dependency = %self.name,
                    option = reserved,
                    "option is set by cmake-deps and will be overridden"
                );
            }
        }

        let mut outputs = Vec::new();
        for mode in self.modes.modes() {
            let invocation = self.configure_invocation(mode)?;
            self.run_checked(runner, &invocation, &mut outputs).await?;
        }
        Ok(outputs)
    }

    /// Build `target` for every active mode
    ///
    /// The mode's build directory is created first if it is missing.
    pub async fn build<R: CommandRunner>(
        &self,
        runner: &mut R,
        target: &str,
    ) -> Result<Vec<ProcessOutput>, BuildError> {
        let mut outputs = Vec::new();
        for mode in self.modes.modes() {
            let invocation = self.build_invocation(mode, target)?;
            let build_dir = self.paths.build_dir(mode);
            if filesystem::ensure_dir(build_dir)? {
                info!(dependency = %self.name, path = %build_dir.display(), "created build directory");
            }
            self.run_checked(runner, &invocation, &mut outputs).await?;
        }
        Ok(outputs)
    }

    /// Build the install target, creating the install prefix if needed
    pub async fn install<R: CommandRunner>(
        &self,
        runner: &mut R,
    ) -> Result<Vec<ProcessOutput>, BuildError> {
        filesystem::ensure_dir(&self.paths.install)?;
        self.build(runner, TARGET_INSTALL).await
    }

    /// Build the clean target
    pub async fn clean<R: CommandRunner>(
        &self,
        runner: &mut R,
    ) -> Result<Vec<ProcessOutput>, BuildError> {
        self.build(runner, TARGET_CLEAN).await
    }

    /// Configure, build and install
    ///
    /// Stops at the first failing step.
    pub async fn setup<R: CommandRunner>(
        &self,
        runner: &mut R,
    ) -> Result<Vec<ProcessOutput>, BuildError> {
        let mut outputs = self.generate(runner).await?;
        outputs.extend(self.build(runner, TARGET_ALL).await?);
        outputs.extend(self.install(runner).await?);
        Ok(outputs)
    }

    /// Delete the Debug and Release build directories
    ///
    /// Both are removed regardless of which modes are active.
    pub fn clear(&self) -> Result<ClearResult, FilesystemError> {
        let mut result = ClearResult::default();
        for dir in [&self.paths.build_debug, &self.paths.build_release] {
            if filesystem::remove_dir_all(dir)? {
                result.removed.push(dir.clone());
            } else {
                result.skipped.push(dir.clone());
            }
        }
        Ok(result)
    }

    async fn run_checked<R: CommandRunner>(
        &self,
        runner: &mut R,
        invocation: &Invocation,
        outputs: &mut Vec<ProcessOutput>,
    ) -> Result<(), BuildError> {
        info!(dependency = %self.name, command = %invocation, "running");
        let output = runner.run(invocation, None).await?;
        if !output.success() {
            return Err(BuildError::CommandFailed {
                output: output.tail(FAILURE_OUTPUT_LINES),
                command: output.command,
                code: output.code,
            });
        }
        outputs.push(output);
        Ok(())
    }
}

fn shell_checked(invocation: Invocation) -> Result<Invocation, BuildError> {
    if let Some((argument, character)) = invocation.unsafe_word(Shell::current()) {
        return Err(BuildError::UnsafeArgument {
            argument: argument.to_string(),
            character,
        });
    }
    Ok(invocation)
}
