//! Core logic module
//!
//! Build configurations and the commands they issue. Processes are started
//! only through [`crate::infra::process::CommandRunner`].
//!
//! # Submodules
//!
//! - [`cmake`] - Per-dependency build configuration and lifecycle steps
//! - [`invocation`] - Command lines and their rendering
//! - [`options`] - Ordered CMake cache options
//! - [`mode`] - Debug/Release selection
//! - [`platform`] - Generator and target names per platform
//! - [`manifest`] - Manifest (deps.toml) parsing and validation
//! - [`workflow`] - Operations over the selected dependencies
//! - [`doctor`] - Tool and project checks

pub mod cmake;
pub mod doctor;
pub mod invocation;
pub mod manifest;
pub mod mode;
pub mod options;
pub mod platform;
pub mod workflow;
