//! Filesystem operations
//!
//! Handles directory creation/removal for build and install trees.

use std::path::Path;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
///
/// Returns `true` if the directory did not exist before.
pub fn ensure_dir(path: &Path) -> Result<bool, FilesystemError> {
    if path.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(true)
}

/// Remove a directory and all its contents
///
/// Returns `true` if something was removed.
pub fn remove_dir_all(path: &Path) -> Result<bool, FilesystemError> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(true)
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}
