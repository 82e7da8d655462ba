//! CLI command for `cmake-deps doctor`
//!
//! Reports the toolchain CMake will use and the state of every declared
//! dependency. Exits with an error when anything needs fixing.

use std::path::Path;

use anyhow::Result;

use crate::cli::commands::load_project;
use crate::cli::output::{
    is_json, is_quiet, print_detail, print_info, print_success, print_warning, status,
};
use crate::core::doctor::{run_doctor, DoctorReport, ToolCheck};

/// Execute the doctor command
///
/// Outside a project only the default toolchain is checked.
pub async fn execute(root: Option<&Path>) -> Result<()> {
    let project = match load_project(root) {
        Ok(project) => Some(project),
        Err(e) if root.is_some() => return Err(e),
        Err(e) => {
            tracing::debug!("doctor running without a project: {e:#}");
            None
        }
    };
    let report = run_doctor(project.as_ref().map(|(paths, manifest)| (manifest, paths)));
    let problems = report.problems();

    if is_json() {
        let json = serde_json::json!({
            "status": if problems.is_empty() { "success" } else { "error" },
            "cmake": report.cmake,
            "generator": report.generator,
            "dependencies": report.dependencies,
            "problems": problems,
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
    } else if is_quiet() {
        for problem in &problems {
            eprintln!("{} {problem}", status::ERROR);
        }
    } else {
        print_report(&report);
        println!();
        if problems.is_empty() {
            print_success("No problems found");
        } else {
            println!("{} Problems:", status::ERROR);
            for problem in &problems {
                print_detail(&format!("• {problem}"));
            }
        }
    }

    if !problems.is_empty() {
        anyhow::bail!("doctor found {} problem(s)", problems.len());
    }
    Ok(())
}

fn print_report(report: &DoctorReport) {
    print_info("Toolchain");
    println!("  {}", describe_tool("cmake", &report.cmake));
    if report.cmake.found() && report.cmake.version.is_none() {
        print_warning(&format!(
            "'{}' did not report a version; is it really cmake?",
            report.cmake.program
        ));
    }

    let generator = &report.generator;
    let architecture = generator
        .architecture
        .as_ref()
        .map(|arch| format!(" -A {arch}"))
        .unwrap_or_default();
    let driver = if generator.tool.is_some() {
        ""
    } else {
        ", built through cmake"
    };
    println!(
        "  {} generator \"{}\"{architecture}{driver}",
        mark(generator.ready()),
        generator.generator
    );
    if let Some(tool) = &generator.tool {
        println!("  {}", describe_tool(&tool.program, tool));
    }

    if report.dependencies.is_empty() {
        return;
    }
    println!();
    print_info("Dependencies");
    for dependency in &report.dependencies {
        let modes = if dependency.modes.is_empty() {
            "none".to_string()
        } else {
            dependency.modes.join(", ")
        };
        println!(
            "  {} {} [{modes}] {}",
            mark(dependency.problems.is_empty()),
            dependency.name,
            dependency.source.display()
        );
    }
}

fn describe_tool(label: &str, tool: &ToolCheck) -> String {
    match (&tool.path, &tool.version) {
        (Some(path), Some(version)) => {
            format!("{} {label} {version} ({})", status::SUCCESS, path.display())
        }
        (Some(path), None) => format!("{} {label} ({})", status::SUCCESS, path.display()),
        (None, _) => format!("{} {label} not found ('{}')", status::ERROR, tool.program),
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        status::SUCCESS
    } else {
        status::ERROR
    }
}
