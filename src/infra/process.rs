//! Process execution
//!
//! Runs commands through the platform shell, forwarding the child's stdout
//! and stderr line by line while it runs. A non-zero exit status is returned
//! to the caller, never raised here.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::core::invocation::Invocation;
use crate::error::ProcessError;

/// Result of one finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Command string handed to the shell
    pub command: String,
    /// Exit code, `None` if the process was terminated by a signal
    pub code: Option<i32>,
    /// Captured stdout lines
    pub stdout: Vec<String>,
    /// Captured stderr lines
    pub stderr: Vec<String>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Last `lines` lines of stderr, or of stdout when stderr is empty
    pub fn tail(&self, lines: usize) -> Vec<String> {
        let stream = if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        stream[stream.len().saturating_sub(lines)..].to_vec()
    }
}

/// Something that can execute invocations
///
/// Build operations are written against this trait so the commands they
/// issue can be observed without spawning processes.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run one invocation to completion
    async fn run(
        &mut self,
        invocation: &Invocation,
        working_dir: Option<&Path>,
    ) -> Result<ProcessOutput, ProcessError>;
}

/// Runner spawning real processes through the shell
#[derive(Debug, Clone)]
pub struct ShellRunner {
    echo: bool,
}

impl ShellRunner {
    /// Runner that forwards child output to this process's stdout/stderr
    pub fn new() -> Self {
        Self { echo: true }
    }

    /// Runner that only captures child output
    pub fn silent() -> Self {
        Self { echo: false }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ShellRunner {
    async fn run(
        &mut self,
        invocation: &Invocation,
        working_dir: Option<&Path>,
    ) -> Result<ProcessOutput, ProcessError> {
        run_shell(&invocation.render(), working_dir, self.echo).await
    }
}

/// Shell executable and the flag introducing a command string
fn shell() -> (&'static str, &'static str) {
    if cfg!(windows) {
        ("cmd", "/C")
    } else {
        ("/bin/sh", "-c")
    }
}

/// Run a command string through the shell
///
/// Both output streams are drained concurrently so a chatty stderr cannot
/// stall stdout. When `echo` is set each line is printed as soon as it is
/// read.
pub async fn run_shell(
    command: &str,
    working_dir: Option<&Path>,
    echo: bool,
) -> Result<ProcessOutput, ProcessError> {
    let stream_error = |e: std::io::Error| ProcessError::Stream {
        command: command.to_string(),
        error: e.to_string(),
    };

    let (shell, flag) = shell();
    let mut cmd = Command::new(shell);
    cmd.arg(flag);
    #[cfg(windows)]
    cmd.raw_arg(command);
    #[cfg(not(windows))]
    cmd.arg(command);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    debug!(shell, command, working_dir = ?working_dir, "spawning process");

    let mut child = cmd.spawn().map_err(|e| ProcessError::Spawn {
        command: command.to_string(),
        error: e.to_string(),
    })?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(ProcessError::Stream {
            command: command.to_string(),
            error: "output pipes were not captured".to_string(),
        });
    };

    let mut stdout_lines = BufReader::new(stdout).split(b'\n');
    let mut stderr_lines = BufReader::new(stderr).split(b'\n');
    let mut stdout_open = true;
    let mut stderr_open = true;

    let mut output = ProcessOutput {
        command: command.to_string(),
        ..ProcessOutput::default()
    };

    while stdout_open || stderr_open {
        tokio::select! {
            segment = stdout_lines.next_segment(), if stdout_open => {
                match segment.map_err(stream_error)? {
                    Some(bytes) => {
                        let line = decode_line(&bytes);
                        if echo {
                            println!("{line}");
                        }
                        output.stdout.push(line);
                    }
                    None => stdout_open = false,
                }
            }
            segment = stderr_lines.next_segment(), if stderr_open => {
                match segment.map_err(stream_error)? {
                    Some(bytes) => {
                        let line = decode_line(&bytes);
                        if echo {
                            eprintln!("{line}");
                        }
                        output.stderr.push(line);
                    }
                    None => stderr_open = false,
                }
            }
        }
    }

    let status = child.wait().await.map_err(stream_error)?;
    output.code = status.code();

    debug!(command, code = ?output.code, "process exited");

    Ok(output)
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line_strips_carriage_return() {
        assert_eq!(decode_line(b"hello\r"), "hello");
        assert_eq!(decode_line(b"plain"), "plain");
    }

    #[test]
    fn test_decode_line_replaces_invalid_utf8() {
        assert_eq!(decode_line(&[b'a', 0xff, b'b']), "a\u{fffd}b");
    }

    #[test]
    fn test_success_requires_zero_exit() {
        let mut output = ProcessOutput::default();
        assert!(!output.success());
        output.code = Some(0);
        assert!(output.success());
        output.code = Some(1);
        assert!(!output.success());
    }

    #[test]
    fn test_tail_prefers_stderr() {
        let output = ProcessOutput {
            stdout: vec!["building".to_string()],
            stderr: vec!["a", "b", "c"].into_iter().map(String::from).collect(),
            ..ProcessOutput::default()
        };
        assert_eq!(output.tail(2), vec!["b", "c"]);
        assert_eq!(output.tail(10).len(), 3);

        let quiet_stderr = ProcessOutput {
            stdout: vec!["only stdout".to_string()],
            ..ProcessOutput::default()
        };
        assert_eq!(quiet_stderr.tail(5), vec!["only stdout"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_shell_captures_both_streams() {
        let output = run_shell("echo out; echo err 1>&2; echo out2", None, false)
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, vec!["out", "out2"]);
        assert_eq!(output.stderr, vec!["err"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_shell_returns_nonzero_exit_code() {
        let output = run_shell("exit 3", None, false).await.unwrap();
        assert_eq!(output.code, Some(3));
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_shell_uses_working_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let output = run_shell("pwd", Some(temp.path()), false).await.unwrap();
        let reported = std::path::PathBuf::from(&output.stdout[0]);
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_run_shell_missing_directory_is_spawn_error() {
        let err = run_shell("echo hi", Some(Path::new("/definitely/not/here")), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}
