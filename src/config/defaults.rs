//! Default configuration values

/// Manifest file name, also marks the project root
pub const MANIFEST_FILE: &str = "deps.toml";

/// Environment variable overriding the project root
pub const ENV_ROOT: &str = "CMAKE_DEPS_ROOT";

/// Default CMake executable
pub const DEFAULT_CMAKE_PROGRAM: &str = "cmake";

/// Directory names relative to the project root
pub const THIRD_PARTY_DIR: &str = "3rdparty";
pub const DEPENDENCIES_DIR: &str = "dependencies";
pub const RESOURCES_DIR: &str = "resources";
pub const BUILD_DIR: &str = "build";
pub const DEVELOP_DIR: &str = "develop";
pub const TOOLS_DIR: &str = "tools";

/// Build target names before platform aliasing
pub const TARGET_ALL: &str = "all";
pub const TARGET_INSTALL: &str = "install";
pub const TARGET_CLEAN: &str = "clean";

/// CMake variables injected into every configure step
pub const BUILD_TYPE_VARIABLE: &str = "CMAKE_BUILD_TYPE";
pub const INSTALL_PREFIX_VARIABLE: &str = "CMAKE_INSTALL_PREFIX";

/// Lines of tool output kept with a failed command
pub const FAILURE_OUTPUT_LINES: usize = 20;

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
