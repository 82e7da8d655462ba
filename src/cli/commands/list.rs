//! CLI implementation for `cmake-deps list`

use std::path::Path;

use anyhow::Result;

use crate::cli::commands::load_project;
use crate::cli::output::{is_json, is_quiet, print_info};
use crate::core::mode::BuildMode;

/// Execute the list command
pub async fn execute(root: Option<&Path>) -> Result<()> {
    let (paths, manifest) = load_project(root)?;

    let mut entries = Vec::with_capacity(manifest.dependencies.len());
    for dependency in &manifest.dependencies {
        let project = manifest.project(dependency, &paths)?;
        entries.push(project);
    }

    if is_json() {
        let json = serde_json::json!({
            "dependencies": entries.iter().map(|p| serde_json::json!({
                "name": p.name,
                "source": p.paths.source.display().to_string(),
                "modes": p.modes.modes().into_iter().map(BuildMode::as_str).collect::<Vec<_>>(),
                "options": p.options.iter().map(|(k, v)| (k.to_string(), serde_json::Value::from(v))).collect::<serde_json::Map<_, _>>(),
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return Ok(());
    }

    if is_quiet() {
        for project in &entries {
            println!("{}", project.name);
        }
        return Ok(());
    }

    if entries.is_empty() {
        print_info("No dependencies declared");
        return Ok(());
    }

    for project in &entries {
        let modes: Vec<_> = project.modes.modes().into_iter().map(BuildMode::as_str).collect();
        let modes = if modes.is_empty() {
            "none".to_string()
        } else {
            modes.join(", ")
        };
        println!("{} [{modes}]", project.name);
        println!("  source: {}", project.paths.source.display());
        for (name, value) in project.options.iter() {
            println!("  {name} = {value}");
        }
    }

    Ok(())
}
