// src/run.rs
//! The load, detect, select, plan, execute pipeline.

#![deny(missing_docs)]

use crate::catalog::{Catalog, CatalogSource, ToolDescriptor};
use crate::detect::annotate;
use crate::error::ScaffoldResult;
use crate::execute::{ExecutionReport, execute};
use crate::manifest::ProjectManifest;
use crate::plan::{InstallationPlan, plan};
use crate::resolve::VersionLookup;
use crate::select::{Prompt, select};
use std::path::PathBuf;

/// Explicit inputs of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Where the tool catalog comes from.
    pub catalog: CatalogSource,
    /// Project root; templates land here and `package.json` lives here.
    pub working_dir: PathBuf,
    /// Checklist page size.
    pub page_size: usize,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOutcome {
    /// Names of the confirmed tools, in catalog order.
    pub selected: Vec<String>,
    /// The applied plan; `None` when nothing was selected.
    pub plan: Option<InstallationPlan>,
    /// Effects of the applied plan.
    pub report: Option<ExecutionReport>,
}

/// Load and annotate the catalog for the project in `opts`.
pub fn load_tools(opts: &RunOptions) -> ScaffoldResult<(Vec<ToolDescriptor>, ProjectManifest)> {
    let manifest = ProjectManifest::load(&opts.working_dir)?;
    let mut tools = Catalog::load(&opts.catalog, &opts.working_dir)?;
    annotate(&mut tools, &manifest);
    Ok((tools, manifest))
}

/// Run the whole flow once. `before_execute` sees the plan before anything
/// is written.
pub async fn run<F>(
    opts: &RunOptions,
    prompt: &mut dyn Prompt,
    lookup: &dyn VersionLookup,
    before_execute: F,
) -> ScaffoldResult<RunOutcome>
where
    F: FnOnce(&InstallationPlan),
{
    let (tools, manifest) = load_tools(opts)?;
    let selected = select(prompt, &tools, opts.page_size)?;
    if selected.is_empty() {
        return Ok(RunOutcome::default());
    }

    let plan = plan(&selected, &manifest, lookup).await;
    before_execute(&plan);
    let report = execute(&plan, manifest).await?;

    Ok(RunOutcome {
        selected: selected.into_iter().map(|t| t.name).collect(),
        plan: Some(plan),
        report: Some(report),
    })
}
