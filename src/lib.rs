//! cmake-deps - build third-party CMake dependencies
//!
//! Configures, builds and installs the CMake projects vendored under a
//! project's `3rdparty/` directory into one shared install prefix, in Debug
//! and Release, by driving the external `cmake` tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Build configurations, manifest and workflow
//! - [`infra`] - Path registry, filesystem and external processes
//! - [`config`] - Constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
