// src/plan.rs
//! Merging selected tools into one installation plan.

#![deny(missing_docs)]

use crate::catalog::{ToolDescriptor, ToolFile};
use crate::manifest::{ProjectManifest, merge_fragments};
use crate::resolve::{VersionLookup, resolve};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Everything one run will apply to the project.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstallationPlan {
    /// Files to copy, in catalog order then declared order.
    pub files: Vec<ToolFile>,
    /// New dev dependencies and their version constraints.
    pub dependencies: BTreeMap<String, String>,
    /// Top-level manifest keys to set.
    pub manifest: Map<String, Value>,
}

impl InstallationPlan {
    /// Nothing to copy, add or merge.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dependencies.is_empty() && self.manifest.is_empty()
    }
}

/// Combine `selected` (in catalog order) into a plan for `manifest`.
///
/// Dependencies the project already declares are dropped before lookup.
/// Files with the same target are kept twice; the later copy wins on disk.
pub async fn plan(
    selected: &[ToolDescriptor],
    manifest: &ProjectManifest,
    lookup: &dyn VersionLookup,
) -> InstallationPlan {
    let files: Vec<ToolFile> = selected.iter().flat_map(|t| t.files.iter().cloned()).collect();

    let existing = manifest.dependency_set();
    let wanted = selected
        .iter()
        .flat_map(|t| t.dependencies.iter())
        .filter(|dep| {
            let keep = !existing.contains(*dep);
            if !keep {
                tracing::debug!(dependency = %dep, "already in project, skipping");
            }
            keep
        })
        .cloned();
    let dependencies = resolve(lookup, wanted).await;

    let manifest = merge_fragments(selected.iter().map(|t| &t.manifest));

    tracing::info!(
        files = files.len(),
        dependencies = dependencies.len(),
        keys = manifest.len(),
        "plan assembled"
    );
    InstallationPlan {
        files,
        dependencies,
        manifest,
    }
}
