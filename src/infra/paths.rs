//! Project path registry
//!
//! Every location the helper touches is derived from one anchor, the project
//! root. The registry only computes paths; directories are created by the
//! build operations that need them.
//!
//! The anchor is resolved, in order, from:
//! - an explicit `--root` argument
//! - the `CMAKE_DEPS_ROOT` environment variable
//! - the nearest ancestor of the working directory containing `deps.toml`

use std::path::{Path, PathBuf};

use crate::config::defaults::{
    BUILD_DIR, DEPENDENCIES_DIR, DEVELOP_DIR, MANIFEST_FILE, RESOURCES_DIR, THIRD_PARTY_DIR,
    TOOLS_DIR,
};
use crate::core::mode::BuildMode;

/// Locations derived from the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    /// Create a registry anchored at `root`
    ///
    /// A relative root is joined onto `cwd` so that every derived path is
    /// absolute.
    pub fn new(root: impl Into<PathBuf>, cwd: &Path) -> Self {
        let root = root.into();
        let root = if root.is_relative() {
            cwd.join(root)
        } else {
            root
        };
        Self { root }
    }

    /// Find the project root by walking up from `start`
    ///
    /// Returns `None` if no ancestor contains a manifest.
    pub fn discover(start: &Path) -> Option<Self> {
        start
            .ancestors()
            .find(|dir| dir.join(MANIFEST_FILE).is_file())
            .map(|dir| Self {
                root: dir.to_path_buf(),
            })
    }

    /// Project root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Manifest location
    pub fn manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Third-party sources (`<root>/3rdparty`)
    pub fn third_party(&self) -> PathBuf {
        self.root.join(THIRD_PARTY_DIR)
    }

    /// Shared install prefix for all dependencies (`<root>/dependencies`)
    pub fn dependencies(&self) -> PathBuf {
        self.root.join(DEPENDENCIES_DIR)
    }

    pub fn resources(&self) -> PathBuf {
        self.root.join(RESOURCES_DIR)
    }

    /// Build output root (`<root>/build`)
    pub fn build(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    pub fn develop(&self) -> PathBuf {
        self.root.join(DEVELOP_DIR)
    }

    pub fn tools(&self) -> PathBuf {
        self.root.join(TOOLS_DIR)
    }

    /// Source directory of a dependency (`<root>/3rdparty/<name>`)
    pub fn dependency_source(&self, name: &str) -> PathBuf {
        self.third_party().join(name)
    }

    /// Build directory of a dependency for one mode
    /// (`<root>/build/3rdparty/<Debug|Release>/<name>`)
    pub fn dependency_build(&self, name: &str, mode: BuildMode) -> PathBuf {
        self.build()
            .join(THIRD_PARTY_DIR)
            .join(mode.as_str())
            .join(name)
    }

    /// All named locations, for display
    pub fn entries(&self) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("root", self.root.clone()),
            ("third_party", self.third_party()),
            ("dependencies", self.dependencies()),
            ("resources", self.resources()),
            ("build", self.build()),
            ("develop", self.develop()),
            ("tools", self.tools()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths() -> ProjectPaths {
        ProjectPaths::new("/work/project", Path::new("/"))
    }

    #[test]
    fn test_named_locations_are_under_root() {
        let paths = paths();
        for (_, path) in paths.entries() {
            assert!(path.starts_with("/work/project"));
        }
        assert_eq!(paths.third_party(), PathBuf::from("/work/project/3rdparty"));
        assert_eq!(paths.dependencies(), PathBuf::from("/work/project/dependencies"));
        assert_eq!(paths.tools(), PathBuf::from("/work/project/tools"));
    }

    #[test]
    fn test_dependency_layout() {
        let paths = paths();
        assert_eq!(
            paths.dependency_source("glfw"),
            PathBuf::from("/work/project/3rdparty/glfw")
        );
        assert_eq!(
            paths.dependency_build("glfw", BuildMode::Debug),
            PathBuf::from("/work/project/build/3rdparty/Debug/glfw")
        );
        assert_eq!(
            paths.dependency_build("glfw", BuildMode::Release),
            PathBuf::from("/work/project/build/3rdparty/Release/glfw")
        );
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let paths = ProjectPaths::new("project", Path::new("/work"));
        assert_eq!(paths.root(), Path::new("/work/project"));
    }

    #[test]
    fn test_registry_never_creates_directories() {
        let temp = TempDir::new().unwrap();
        let paths = ProjectPaths::new(temp.path(), Path::new("/"));
        let _ = paths.entries();
        let _ = paths.dependency_build("zlib", BuildMode::Release);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_discover_finds_manifest_in_ancestor() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(MANIFEST_FILE), "").unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let paths = ProjectPaths::discover(&nested).unwrap();
        assert_eq!(paths.root(), temp.path());
    }

    #[test]
    fn test_discover_without_manifest() {
        let temp = TempDir::new().unwrap();
        assert!(ProjectPaths::discover(temp.path()).is_none());
    }
}
