//! Output formatting
//!
//! Status lines printed to the user, honouring the global `--quiet` and
//! `--json` flags. Tool output streamed from child processes is not routed
//! through here.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::BuildError;

static QUIET: AtomicBool = AtomicBool::new(false);
static JSON: AtomicBool = AtomicBool::new(false);

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

/// Output settings from the global CLI flags
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub quiet: bool,
    pub json: bool,
    pub verbose: u8,
}

impl OutputConfig {
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Make these settings visible to the print helpers
    pub fn apply_global(self) {
        QUIET.store(self.quiet, Ordering::Relaxed);
        JSON.store(self.json, Ordering::Relaxed);
    }

    /// Default tracing level for the verbosity
    pub fn log_level(self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}

pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub fn is_json() -> bool {
    JSON.load(Ordering::Relaxed)
}

/// Whether human-readable status lines should be printed
fn show_status() -> bool {
    !is_quiet() && !is_json()
}

pub fn print_success(message: &str) {
    if show_status() {
        println!("{} {message}", status::SUCCESS);
    }
}

pub fn print_info(message: &str) {
    if show_status() {
        println!("{} {message}", status::INFO);
    }
}

pub fn print_warning(message: &str) {
    if !is_json() {
        eprintln!("{} {message}", status::WARNING);
    }
}

/// Indented detail line under a status message
pub fn print_detail(message: &str) {
    if show_status() {
        println!("  {message}");
    }
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    let output = failure_output(error);

    if is_json() {
        let json = serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "causes": error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
            "output": output,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return;
    }

    eprintln!("{} {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
    // Without --quiet the tool output was already streamed
    if is_quiet() && !output.is_empty() {
        eprintln!("  output:");
        for line in output {
            eprintln!("    {line}");
        }
    }
}

/// Last lines written by a failed tool anywhere in the error chain
fn failure_output(error: &anyhow::Error) -> &[String] {
    error
        .chain()
        .find_map(|cause| match cause.downcast_ref::<BuildError>() {
            Some(BuildError::CommandFailed { output, .. }) => Some(output.as_slice()),
            _ => None,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_follows_verbosity() {
        assert_eq!(OutputConfig::new(false, false, 0).log_level(), tracing::Level::WARN);
        assert_eq!(OutputConfig::new(false, false, 1).log_level(), tracing::Level::INFO);
        assert_eq!(OutputConfig::new(false, false, 3).log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_failure_output_is_found_through_context() {
        let error = anyhow::Error::new(crate::error::DepsError::Build {
            dependency: "zlib".to_string(),
            source: BuildError::CommandFailed {
                command: "cmake --build build".to_string(),
                code: Some(2),
                output: vec!["make: *** [all] Error 2".to_string()],
            },
        })
        .context("Setup failed");

        assert_eq!(failure_output(&error), ["make: *** [all] Error 2"]);
        assert!(failure_output(&anyhow::anyhow!("plain")).is_empty());
    }
}
