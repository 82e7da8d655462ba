//! Build modes
//!
//! A build mode is a CMake configuration with its own build directory.

use std::fmt;

/// CMake build configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Configuration name passed to CMake (`CMAKE_BUILD_TYPE`, `--config`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which build modes are active
///
/// Iteration order is always Debug, then Release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSelection {
    pub debug: bool,
    pub release: bool,
}

impl ModeSelection {
    /// Both modes active
    pub fn both() -> Self {
        Self {
            debug: true,
            release: true,
        }
    }

    /// Active modes in build order
    pub fn modes(self) -> Vec<BuildMode> {
        let mut modes = Vec::with_capacity(2);
        if self.debug {
            modes.push(BuildMode::Debug);
        }
        if self.release {
            modes.push(BuildMode::Release);
        }
        modes
    }

    /// Narrow this selection by disabling modes
    #[must_use]
    pub fn without(self, no_debug: bool, no_release: bool) -> Self {
        Self {
            debug: self.debug && !no_debug,
            release: self.release && !no_release,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.debug && !self.release
    }
}

impl Default for ModeSelection {
    fn default() -> Self {
        Self::both()
    }
}
