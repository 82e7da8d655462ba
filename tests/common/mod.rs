//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Name of the stand-in for the cmake executable
pub const FAKE_CMAKE: &str = "fake-cmake.sh";

/// File the fake cmake appends its arguments to, one invocation per line
pub const CMAKE_LOG: &str = "cmake.log";

/// Shell script that records its arguments and fails when they contain
/// `$FAKE_CMAKE_FAIL`
const FAKE_CMAKE_SCRIPT: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/cmake.log"
echo "fake cmake: $1"
if [ -n "$FAKE_CMAKE_FAIL" ]; then
    case "$*" in
        *"$FAKE_CMAKE_FAIL"*) echo "fake cmake: failing" >&2; exit 3 ;;
    esac
fi
exit 0
"#;

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create a project whose manifest runs the fake cmake
    ///
    /// `dependencies` is appended to the manifest after the `[cmake]` table.
    pub fn with_fake_cmake(dependencies: &str) -> Self {
        let project = Self::new();
        project.install_fake_cmake();
        let manifest = format!(
            "[cmake]\nprogram = \"{}\"\n\n{dependencies}",
            project.path().join(FAKE_CMAKE).display()
        );
        project.create_file("deps.toml", &manifest);
        project
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Invocations recorded by the fake cmake
    pub fn cmake_calls(&self) -> Vec<String> {
        if !self.file_exists(CMAKE_LOG) {
            return Vec::new();
        }
        self.read_file(CMAKE_LOG)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Run cmake-deps in the project directory
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("Failed to execute cmake-deps")
    }

    /// cmake-deps command ready to run in the project directory
    pub fn command(&self, args: &[&str]) -> Command {
        cmake_deps_command(&self.path(), args)
    }

    #[cfg(unix)]
    fn install_fake_cmake(&self) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join(FAKE_CMAKE);
        std::fs::write(&path, FAKE_CMAKE_SCRIPT).expect("Failed to write fake cmake");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake cmake executable");
    }

    #[cfg(not(unix))]
    fn install_fake_cmake(&self) {
        unimplemented!("the fake cmake is a POSIX shell script");
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// cmake-deps command running in `dir` with a clean environment for the
/// variables it reads
pub fn cmake_deps_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cmake-deps"));
    cmd.current_dir(dir)
        .env_remove("CMAKE_DEPS_ROOT")
        .env_remove("FAKE_CMAKE_FAIL")
        .env_remove("RUST_LOG")
        .args(args);
    cmd
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Two dependencies, the first Debug only
pub const TWO_DEPENDENCIES: &str = r#"
[[dependency]]
name = "zlib"
release = false

[[dependency]]
name = "glfw"

[dependency.options]
GLFW_BUILD_DOCS = false
GLFW_BUILD_EXAMPLES = false
"#;

/// One dependency with both modes
pub const ONE_DEPENDENCY: &str = r#"
[[dependency]]
name = "glfw"
options = { GLFW_INSTALL = true }
"#;
