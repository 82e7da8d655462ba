//! CLI implementation for `setup`, `generate`, `build`, `install` and `clean`
//!
//! Loads the manifest, runs the operation on every selected dependency and
//! summarises what was done. Tool output is streamed as it arrives.

use std::path::Path;

use anyhow::Result;

use crate::cli::commands::load_project;
use crate::cli::output::{is_json, is_quiet, print_detail, print_info, print_success};
use crate::core::workflow::{self, DependencyReport, Operation, Selection};
use crate::infra::process::ShellRunner;

/// Execute a lifecycle operation
pub async fn execute(root: Option<&Path>, operation: Operation, selection: Selection) -> Result<()> {
    let (paths, manifest) = load_project(root)?;

    if manifest.dependencies.is_empty() {
        print_info("No dependencies declared, nothing to do");
        return Ok(());
    }

    // Child output would corrupt the JSON document on stdout
    let mut runner = if is_quiet() || is_json() {
        ShellRunner::silent()
    } else {
        ShellRunner::new()
    };

    let reports = workflow::run(&manifest, &paths, &selection, &operation, &mut runner).await?;

    if is_json() {
        print_json(&operation, &reports);
        return Ok(());
    }

    print_summary(&operation, &reports);
    Ok(())
}

fn print_summary(operation: &Operation, reports: &[DependencyReport]) {
    if is_quiet() {
        return;
    }
    println!();
    print_success(&format!(
        "Finished {operation} for {} dependenc{}",
        reports.len(),
        if reports.len() == 1 { "y" } else { "ies" }
    ));
    for report in reports {
        if report.commands == 0 {
            print_detail(&format!("{}: no active build modes", report.name));
        } else {
            print_detail(&format!("{}: {} command(s)", report.name, report.commands));
        }
    }
}

fn print_json(operation: &Operation, reports: &[DependencyReport]) {
    let json = serde_json::json!({
        "status": "success",
        "operation": operation.to_string(),
        "dependencies": reports.iter().map(|r| serde_json::json!({
            "name": r.name,
            "commands": r.commands,
        })).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
}
