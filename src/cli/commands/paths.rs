//! CLI implementation for `cmake-deps paths`

use std::path::Path;

use anyhow::Result;

use crate::cli::commands::resolve_paths;
use crate::cli::output::is_json;

/// Execute the paths command
pub async fn execute(root: Option<&Path>) -> Result<()> {
    let paths = resolve_paths(root)?;
    let entries = paths.entries();

    if is_json() {
        let json: serde_json::Map<_, _> = entries
            .iter()
            .map(|(name, path)| {
                (
                    (*name).to_string(),
                    serde_json::Value::from(path.display().to_string()),
                )
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return Ok(());
    }

    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, path) in &entries {
        println!("{name:<width$}  {}", path.display());
    }

    Ok(())
}
