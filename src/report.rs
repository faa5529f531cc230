use anyhow::{Context, Result};
use console::{style, Style};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::locator::BinaryLocation;
use crate::platform::Target;
use crate::runner::LaunchPlan;

#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    target: &'a Target,
    executable_name: String,
    command_line: String,
    #[serde(flatten)]
    plan: &'a LaunchPlan,
}

pub fn plan_json(plan: &LaunchPlan, target: &Target) -> Result<String> {
    let report = PlanReport {
        target,
        executable_name: target.executable_name(),
        command_line: plan.command_line(),
        plan,
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize launch plan")
}

pub fn print_plan(plan: &LaunchPlan, target: &Target) {
    let label = Style::new().bold().cyan();
    let binary_note = if plan.kind == crate::locator::BinaryKind::Fallback {
        style(" (generic fallback)").yellow().to_string()
    } else {
        String::new()
    };

    println!(
        "{} {}-{}",
        label.apply_to(format!("{:<8}", "Target")),
        target.os_token(),
        target.arch_token()
    );
    println!(
        "{} {}{}",
        label.apply_to(format!("{:<8}", "Binary")),
        plan.program.display(),
        binary_note
    );
    println!(
        "{} {}",
        label.apply_to(format!("{:<8}", "Command")),
        plan.command_line()
    );
    println!(
        "{} {}",
        label.apply_to(format!("{:<8}", "Output")),
        if plan.silent { "discarded" } else { "inherited" }
    );
}

/// One line per build; the build this host would launch is marked.
pub fn print_builds(bin_dir: &Path, builds: &[PathBuf], selected: Option<&BinaryLocation>) {
    if builds.is_empty() {
        println!(
            "{} No analyzer builds in {}",
            style("⚠").yellow(),
            style(bin_dir.display()).bold()
        );
        return;
    }

    println!(
        "{} {} builds in {}",
        style("✓").green(),
        style(builds.len()).cyan(),
        style(bin_dir.display()).bold()
    );
    for build in builds {
        let name = build
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| build.display().to_string());
        if selected.map(|s| &s.path == build).unwrap_or(false) {
            println!("  {} {}", style("▸").cyan(), style(name).bold());
        } else {
            println!("  {} {}", style("•").dim(), name);
        }
    }
}
