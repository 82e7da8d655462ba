//! Error types for cmake-deps
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Process execution errors
///
/// A non-zero exit status is not a process error; it is reported in
/// [`crate::infra::process::ProcessOutput`] and judged by the caller.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The shell could not be started
    #[error("Failed to spawn '{command}': {error}")]
    Spawn { command: String, error: String },

    /// Reading the child's output or waiting for it failed
    #[error("Failed to read output of '{command}': {error}")]
    Stream { command: String, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Build option validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// Option name is empty
    #[error("Option name cannot be empty")]
    EmptyName,

    /// Option name contains a character that cannot appear in `-D<name>=`
    #[error("Option name '{name}' contains invalid character {character:?}")]
    InvalidName { name: String, character: char },

    /// Option value would break command-line quoting
    #[error("Option '{name}' value '{value}' contains unsafe character {character:?}")]
    UnsafeValue {
        name: String,
        value: String,
        character: char,
    },

    /// Manifest value has no command-line representation
    #[error("Option '{name}' has unsupported {kind} value: expected string, boolean or number")]
    UnsupportedValue { name: String, kind: String },
}

/// Dependency manifest (deps.toml) errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("Manifest not found at '{path}'")]
    NotFound { path: PathBuf },

    /// Manifest could not be read
    #[error(transparent)]
    Read(#[from] FilesystemError),

    /// Manifest parse error
    #[error("Failed to parse manifest '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// Dependency declared with an empty name
    #[error("Dependency entry #{index} has an empty name")]
    EmptyName { index: usize },

    /// Dependency name that cannot be used as a single directory name
    #[error("Dependency name '{name}' is invalid: {reason}")]
    InvalidName { name: String, reason: String },

    /// Dependency declared more than once
    #[error("Dependency '{name}' is declared more than once")]
    DuplicateDependency { name: String },

    /// Dependency requested but not declared
    #[error("Dependency '{name}' is not declared in the manifest")]
    UnknownDependency { name: String },

    /// Invalid option in a dependency
    #[error("Dependency '{dependency}': {source}")]
    Option {
        dependency: String,
        source: OptionError,
    },
}

/// Build errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// The external tool exited unsuccessfully
    ///
    /// `output` holds the last lines the tool wrote, stderr preferred.
    #[error("Command failed with {}: {command}", exit_description(*.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: Vec<String>,
    },

    /// An argument the platform shell would expand or cannot quote
    #[error("Argument '{argument}' contains {character:?}, which the shell cannot pass through")]
    UnsafeArgument { argument: String, character: char },

    /// The external tool could not be run
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// A build or install directory could not be prepared
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// An injected option could not be rendered safely
    #[error(transparent)]
    Option(#[from] OptionError),
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

/// Top-level cmake-deps error type
#[derive(Error, Debug)]
pub enum DepsError {
    /// Manifest error
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Build error in one dependency
    #[error("Build error in '{dependency}'")]
    Build {
        dependency: String,
        source: BuildError,
    },

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_mentions_exit_code() {
        let err = BuildError::CommandFailed {
            command: "cmake --build build".to_string(),
            code: Some(2),
            output: vec!["make: *** [all] Error 2".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("exit code 2"));
        assert!(message.contains("cmake --build build"));
    }

    #[test]
    fn test_command_failed_without_code_mentions_signal() {
        let err = BuildError::CommandFailed {
            command: "cmake".to_string(),
            code: None,
            output: Vec::new(),
        };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn test_manifest_option_error_names_dependency() {
        let err = ManifestError::Option {
            dependency: "glfw".to_string(),
            source: OptionError::EmptyName,
        };
        assert!(err.to_string().starts_with("Dependency 'glfw'"));
    }

    #[test]
    fn test_build_error_cause_is_reported_once() {
        let err = DepsError::Build {
            dependency: "zlib".to_string(),
            source: BuildError::CommandFailed {
                command: "cmake --build build".to_string(),
                code: Some(2),
                output: Vec::new(),
            },
        };
        let chain: Vec<String> = anyhow::Error::from(err)
            .chain()
            .map(ToString::to_string)
            .collect();

        assert_eq!(chain[0], "Build error in 'zlib'");
        assert_eq!(
            chain.iter().filter(|m| m.contains("exit code 2")).count(),
            1
        );
    }
}
