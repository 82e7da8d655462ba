//! Test utilities
//!
//! Proptest generators and a command runner that records instead of
//! spawning.

use std::path::Path;

use crate::core::invocation::{Invocation, Shell};
use crate::error::ProcessError;
use crate::infra::process::{CommandRunner, ProcessOutput};

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate a CMake-style variable name
    pub fn option_name() -> impl Strategy<Value = String> {
        "[A-Z][A-Z0-9_]{0,20}".prop_filter("Name must not be reserved", |s| {
            s != "CMAKE_BUILD_TYPE" && s != "CMAKE_INSTALL_PREFIX"
        })
    }

    /// Generate an option value that needs no escaping beyond quoting
    pub fn option_value() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 ._/+-]{0,16}"
    }
}

/// Runner that records rendered commands
///
/// Commands are rendered for `sh` on every platform. Every command succeeds
/// except the one at `fail_at` (zero-based), which exits with `fail_code`
/// and writes [`FAILURE_MESSAGE`] to stderr.
pub const FAILURE_MESSAGE: &str = "recording runner: simulated failure";

#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub commands: Vec<String>,
    fail_at: Option<usize>,
    fail_code: i32,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(index: usize, code: i32) -> Self {
        Self {
            commands: Vec::new(),
            fail_at: Some(index),
            fail_code: code,
        }
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(
        &mut self,
        invocation: &Invocation,
        _working_dir: Option<&Path>,
    ) -> Result<ProcessOutput, ProcessError> {
        let command = invocation.render_for(Shell::Posix);
        let failing = self.fail_at == Some(self.commands.len());
        self.commands.push(command.clone());
        Ok(ProcessOutput {
            command,
            code: Some(if failing { self.fail_code } else { 0 }),
            stderr: if failing {
                vec![FAILURE_MESSAGE.to_string()]
            } else {
                Vec::new()
            },
            ..ProcessOutput::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use super::*;
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use crate::core::options::{validate_name, validate_value};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn test_option_name_generator(name in option_name()) {
            prop_assert!(validate_name(&name).is_ok());
        }

        #[test]
        fn test_option_value_generator(value in option_value()) {
            prop_assert!(validate_value("NAME", &value).is_ok());
        }
    }

    #[tokio::test]
    async fn test_recording_runner_fails_only_at_index() {
        let mut runner = RecordingRunner::failing_at(1, 7);
        let invocation = Invocation::new("cmake").arg("--version");

        let first = runner.run(&invocation, None).await.unwrap();
        let second = runner.run(&invocation, None).await.unwrap();

        assert!(first.success());
        assert!(first.stderr.is_empty());
        assert_eq!(second.code, Some(7));
        assert_eq!(second.stderr, vec![FAILURE_MESSAGE]);
        assert_eq!(runner.commands, vec!["cmake --version", "cmake --version"]);
    }
}
