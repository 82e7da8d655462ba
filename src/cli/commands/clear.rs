//! CLI implementation for `cmake-deps clear`
//!
//! Deletes the Debug and Release build directories of the selected
//! dependencies. Installed files in the shared prefix are left alone.

use std::path::Path;

use anyhow::Result;

use crate::cli::commands::load_project;
use crate::cli::output::{is_json, print_detail, print_success};
use crate::core::workflow::{self, Selection};

/// Execute the clear command
pub async fn execute(root: Option<&Path>, selection: Selection) -> Result<()> {
    let (paths, manifest) = load_project(root)?;

    let cleared = workflow::clear(&manifest, &paths, &selection)?;

    let removed: Vec<_> = cleared
        .iter()
        .flat_map(|(_, result)| result.removed.iter())
        .collect();

    if is_json() {
        let json = serde_json::json!({
            "status": "success",
            "removed": removed.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return Ok(());
    }

    if removed.is_empty() {
        print_success("Nothing to clear");
    } else {
        print_success("Cleared build directories:");
        for dir in removed {
            print_detail(&format!("Removed {}", dir.display()));
        }
    }

    Ok(())
}
