// src/info.rs
//! Print plans and results.

#![deny(missing_docs)]

use crate::execute::ExecutionReport;
use crate::plan::InstallationPlan;
use colored::Colorize;

/// Print helpers for the terminal.
pub struct ScaffoldInfo();

impl ScaffoldInfo {
    /// Print what a plan is about to do.
    pub fn show_plan(plan: &InstallationPlan) {
        for file in &plan.files {
            println!("{} {}", "copy".green(), file.path.display());
        }
        for (name, constraint) in &plan.dependencies {
            println!("{} {}@{}", "add".green(), name.bold(), constraint);
        }
        for key in plan.manifest.keys() {
            println!("{} package.json#{}", "set".green(), key);
        }
    }

    /// One-line summary after execution.
    pub fn show_report(report: &ExecutionReport) {
        println!(
            "{} {} file(s) copied, {} dependenc(y/ies) added.",
            "done:".bold(),
            report.files_written,
            report.dependencies_added
        );
    }

    /// Shown when the selection came back empty.
    pub fn show_nothing() {
        println!("nothing to install.");
    }
}
