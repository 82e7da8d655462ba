//! Infrastructure layer
//!
//! Handles I/O: the filesystem, external processes and the locations they
//! operate on.

pub mod filesystem;
pub mod paths;
pub mod process;
