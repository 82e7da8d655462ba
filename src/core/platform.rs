//! Platform toolchain table
//!
//! The platform picks a default generator. The generator family then decides
//! the architecture flag and target aliases: only Visual Studio takes `-A`
//! and spells its targets `ALL_BUILD` and `INSTALL`. Both lookups live here
//! instead of being decided inline where commands are assembled.

use serde::Deserialize;

use crate::config::defaults::{TARGET_ALL, TARGET_INSTALL};

/// Generator platform passed to Visual Studio generators
const VISUAL_STUDIO_ARCHITECTURE: &str = "x64";

fn is_visual_studio(generator: &str) -> bool {
    generator.starts_with("Visual Studio")
}

/// Host platform family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

/// Generator settings for one platform family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainProfile {
    /// CMake generator (`-G`)
    pub generator: String,
    /// Generator platform (`-A`), only used by multi-config generators
    pub architecture: Option<String>,
    /// Name of the default target
    pub all_target: &'static str,
    /// Name of the install target
    pub install_target: &'static str,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Default generator for this platform
    pub fn default_generator(self) -> &'static str {
        match self {
            Self::Windows => "Visual Studio 16 2019",
            Self::Unix => "Unix Makefiles",
        }
    }

    /// Toolchain profile for this platform
    pub fn profile(self) -> ToolchainProfile {
        ToolchainProfile::for_generator(self.default_generator())
    }
}

/// User overrides for the platform profile (the manifest's `[cmake]` table)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToolchainOverrides {
    /// CMake executable
    #[serde(default)]
    pub program: Option<String>,

    /// Generator replacing the platform default
    #[serde(default)]
    pub generator: Option<String>,

    /// Generator platform replacing the platform default
    #[serde(default)]
    pub architecture: Option<String>,
}

impl ToolchainProfile {
    /// Profile for a generator
    pub fn for_generator(generator: impl Into<String>) -> Self {
        let generator = generator.into();
        if is_visual_studio(&generator) {
            Self {
                generator,
                architecture: Some(VISUAL_STUDIO_ARCHITECTURE.to_string()),
                all_target: "ALL_BUILD",
                install_target: "INSTALL",
            }
        } else {
            Self {
                generator,
                architecture: None,
                all_target: TARGET_ALL,
                install_target: TARGET_INSTALL,
            }
        }
    }

    /// Apply manifest overrides
    ///
    /// A generator override replaces the whole profile; an explicit
    /// architecture is applied on top of it.
    #[must_use]
    pub fn with_overrides(self, overrides: &ToolchainOverrides) -> Self {
        let mut profile = match &overrides.generator {
            Some(generator) => Self::for_generator(generator.as_str()),
            None => self,
        };
        if let Some(architecture) = &overrides.architecture {
            profile.architecture = Some(architecture.clone());
        }
        profile
    }

    /// Translate a target name to the generator's spelling
    pub fn target_alias<'a>(&'a self, target: &'a str) -> &'a str {
        match target {
            TARGET_ALL => self.all_target,
            TARGET_INSTALL => self.install_target,
            other => other,
        }
    }
}
