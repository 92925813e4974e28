// src/execute.rs
//! Applying a plan to the project.

#![deny(missing_docs)]

use crate::catalog::{TemplateSource, ToolFile};
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::manifest::ProjectManifest;
use crate::plan::InstallationPlan;
use futures::future::try_join_all;
use tokio::fs;

/// What an executed plan changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionReport {
    /// Number of file copies performed.
    pub files_written: usize,
    /// Number of names added to `devDependencies`.
    pub dependencies_added: usize,
}

impl ExecutionReport {
    /// Any template file was copied.
    pub fn has_new_files(&self) -> bool {
        self.files_written > 0
    }

    /// Any dev dependency was added; the install step is only offered then.
    pub fn has_new_dependencies(&self) -> bool {
        self.dependencies_added > 0
    }
}

async fn copy_file(file: &ToolFile) -> ScaffoldResult<()> {
    let action = || format!("copy {} to", file.source);

    if let Some(parent) = file.target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ScaffoldError::io(action(), &file.target, e))?;
    }
    let written = match &file.source {
        TemplateSource::File(source) => fs::copy(source, &file.target).await.map(|_| ()),
        TemplateSource::Embedded { contents, .. } => fs::write(&file.target, *contents).await,
    };
    written.map_err(|e| ScaffoldError::io(action(), &file.target, e))?;

    tracing::debug!(path = %file.path.display(), "copied");
    Ok(())
}

/// Apply `plan` and persist `manifest`.
///
/// The manifest is updated in memory first, so a manifest that cannot take
/// the plan fails before any file is touched. Files are then copied
/// concurrently and the first failure aborts the rest, leaving
/// already-copied files in place. The manifest is written last, so it is
/// untouched whenever a copy fails.
pub async fn execute(
    plan: &InstallationPlan,
    mut manifest: ProjectManifest,
) -> ScaffoldResult<ExecutionReport> {
    let dependencies_added = manifest.add_dev_dependencies(&plan.dependencies)?;
    manifest.merge_top_level(&plan.manifest);
    manifest.strip_internal_id();

    try_join_all(plan.files.iter().map(copy_file)).await?;
    manifest.write()?;

    Ok(ExecutionReport {
        files_written: plan.files.len(),
        dependencies_added,
    })
}
