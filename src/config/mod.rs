//! Configuration and constants
//!
//! Fixed names shared by the path registry, the manifest loader and the CLI.

pub mod defaults;
