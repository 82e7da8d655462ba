//! Dependency manifest (deps.toml) parsing and validation
//!
//! The manifest lists the third-party dependencies built by the helper, in
//! the order they are processed, together with their CMake options.
//! String values support environment variable substitution using `${VAR}`.
//!
//! ```toml
//! [cmake]
//! generator = "Ninja"
//!
//! [defaults]
//! release = true
//!
//! [[dependency]]
//! name = "glfw"
//! [dependency.options]
//! GLFW_BUILD_DOCS = false
//! ```

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::core::cmake::{CMakePaths, CMakeProject};
use crate::core::mode::ModeSelection;
use crate::core::options::{BuildOptions, UNSAFE_CHARACTERS};
use crate::core::platform::{Platform, ToolchainOverrides};
use crate::error::ManifestError;
use crate::infra::filesystem;
use crate::infra::paths::ProjectPaths;

/// The dependency manifest
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Manifest {
    /// Toolchain overrides
    #[serde(default)]
    pub cmake: ToolchainOverrides,

    /// Build modes applied to every dependency unless overridden
    #[serde(default)]
    pub defaults: ModeDefaults,

    /// Dependencies in processing order
    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<DependencySpec>,
}

/// Default build modes
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ModeDefaults {
    #[serde(default = "enabled")]
    pub debug: bool,

    #[serde(default = "enabled")]
    pub release: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ModeDefaults {
    fn default() -> Self {
        Self {
            debug: true,
            release: true,
        }
    }
}

/// One third-party dependency
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DependencySpec {
    /// Name, also the directory under `3rdparty/` and `build/3rdparty/<mode>/`
    pub name: String,

    /// Override of `defaults.debug`
    #[serde(default)]
    pub debug: Option<bool>,

    /// Override of `defaults.release`
    #[serde(default)]
    pub release: Option<bool>,

    /// Source directory relative to the project root
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// CMake cache options, in declaration order
    #[serde(default)]
    pub options: toml::Table,
}

impl DependencySpec {
    /// Active modes for this dependency
    pub fn modes(&self, defaults: ModeDefaults) -> ModeSelection {
        ModeSelection {
            debug: self.debug.unwrap_or(defaults.debug),
            release: self.release.unwrap_or(defaults.release),
        }
    }

    /// Validated build options
    pub fn build_options(&self) -> Result<BuildOptions, ManifestError> {
        BuildOptions::from_table(&self.options).map_err(|source| ManifestError::Option {
            dependency: self.name.clone(),
            source,
        })
    }
}

impl Manifest {
    /// Parse a manifest from TOML, substituting `${VAR}` in string values
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let mut table: toml::Table = toml::from_str(content)?;
        substitute_in_table(&mut table);
        toml::Value::Table(table).try_into()
    }

    /// Load and validate the manifest at `path`
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = filesystem::read_file(path)?;
        let manifest = Self::from_toml(&content).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check names are present and unique and every option is valid
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = HashSet::new();
        for (index, dependency) in self.dependencies.iter().enumerate() {
            if dependency.name.trim().is_empty() {
                return Err(ManifestError::EmptyName { index });
            }
            validate_dependency_name(&dependency.name)?;
            if !seen.insert(dependency.name.as_str()) {
                return Err(ManifestError::DuplicateDependency {
                    name: dependency.name.clone(),
                });
            }
            dependency.build_options()?;
        }
        Ok(())
    }

    /// Dependencies matching `names`, in manifest order
    ///
    /// An empty `names` selects every dependency.
    pub fn select(&self, names: &[String]) -> Result<Vec<&DependencySpec>, ManifestError> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.dependencies.iter().any(|d| &d.name == *name))
        {
            return Err(ManifestError::UnknownDependency {
                name: unknown.clone(),
            });
        }
        Ok(self
            .dependencies
            .iter()
            .filter(|d| names.is_empty() || names.contains(&d.name))
            .collect())
    }

    /// Build configuration for one dependency
    pub fn project(
        &self,
        dependency: &DependencySpec,
        paths: &ProjectPaths,
    ) -> Result<CMakeProject, ManifestError> {
        let mut cmake_paths = CMakePaths::for_dependency(paths, &dependency.name);
        if let Some(source) = &dependency.source {
            cmake_paths.source = paths.root().join(source);
        }

        let profile = Platform::current().profile().with_overrides(&self.cmake);
        let mut project = CMakeProject::new(&dependency.name, cmake_paths)
            .with_profile(profile)
            .with_modes(dependency.modes(self.defaults))
            .with_options(dependency.build_options()?);
        if let Some(program) = &self.cmake.program {
            project = project.with_program(program);
        }
        Ok(project)
    }
}

/// Check a name can serve as a single directory component
///
/// The name is joined under `3rdparty/` and the build directories, so it
/// must not climb out of them or address another directory.
fn validate_dependency_name(name: &str) -> Result<(), ManifestError> {
    let invalid = |reason: &str| ManifestError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.contains(['/', '\\']) {
        return Err(invalid("path separators are not allowed"));
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_control() || UNSAFE_CHARACTERS.contains(c))
    {
        return Err(invalid(&format!("character {c:?} is not allowed")));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None) if component == name => Ok(()),
        _ => Err(invalid("must be a single directory name")),
    }
}

/// Substitute environment variables in a string using `${VAR}` syntax
///
/// Unset variables expand to the empty string.
pub fn substitute_env_vars(input: &str) -> String {
    env_var_pattern()
        .replace_all(input, |caps: &regex::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_default()
        })
        .into_owned()
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        // ${VAR_NAME}
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("Invalid env var pattern")
    })
}

fn substitute_in_table(table: &mut toml::Table) {
    for (_, value) in table.iter_mut() {
        substitute_in_value(value);
    }
}

fn substitute_in_value(value: &mut toml::Value) {
    match value {
        toml::Value::String(s) => *s = substitute_env_vars(s),
        toml::Value::Array(items) => items.iter_mut().for_each(substitute_in_value),
        toml::Value::Table(table) => substitute_in_table(table),
        _ => {}
    }
}
