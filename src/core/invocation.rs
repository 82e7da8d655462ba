//! External tool invocations
//!
//! An invocation is a program and its arguments. It is rendered to a single
//! command string for the shell, quoting arguments that need it.
//!
//! POSIX `sh` gets single quotes, which carry every character literally.
//! `cmd` only has double quotes, which cannot hold `"` and still expand
//! `%VAR%`; arguments containing either are refused before anything runs.

use std::fmt;
use std::path::Path;

/// Shell family that parses the rendered command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// `/bin/sh -c`
    Posix,
    /// `cmd /C`
    Cmd,
}

impl Shell {
    /// Shell used by the process runner on this platform
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Cmd
        } else {
            Self::Posix
        }
    }

    /// Characters this shell cannot pass through inside quotes
    fn unsafe_characters(self) -> &'static [char] {
        match self {
            Self::Posix => &['\0'],
            Self::Cmd => &['"', '%', '\0'],
        }
    }

    /// Quote an argument unless it only holds plain characters
    pub fn quote(self, arg: &str) -> String {
        if !arg.is_empty() && arg.chars().all(is_plain) {
            return arg.to_string();
        }
        match self {
            Self::Posix => format!("'{}'", arg.replace('\'', r"'\''")),
            Self::Cmd => format!("\"{arg}\""),
        }
    }
}

/// One command to hand to the process runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument
    #[must_use]
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(display_path(path))
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Command string for the current platform's shell
    pub fn render(&self) -> String {
        self.render_for(Shell::current())
    }

    /// Command string for `shell`
    pub fn render_for(&self, shell: Shell) -> String {
        self.words()
            .map(|word| shell.quote(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First word `shell` would not pass through unchanged, with the
    /// offending character
    pub fn unsafe_word(&self, shell: Shell) -> Option<(&str, char)> {
        self.words().find_map(|word| {
            word.chars()
                .find(|c| shell.unsafe_characters().contains(c))
                .map(|c| (word, c))
        })
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Render a path with forward slashes, which CMake accepts on every platform
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-./:=+,@%".contains(c)
}
