// src/detect.rs
//! Installation detection.

#![deny(missing_docs)]

use crate::catalog::{InstallState, ToolDescriptor};
use crate::manifest::ProjectManifest;
use std::collections::BTreeSet;

/// Guess whether `tool` is already in the project.
///
/// Any existing target file, already-declared dependency, or manifest key the
/// tool would set is enough to report [`InstallState::Maybe`].
pub fn detect(
    tool: &ToolDescriptor,
    manifest: &ProjectManifest,
    dependencies: &BTreeSet<String>,
) -> InstallState {
    if let Some(file) = tool.files.iter().find(|f| f.target.exists()) {
        tracing::debug!(tool = %tool.name, target = %file.target.display(), "target file exists");
        return InstallState::Maybe;
    }

    if let Some(dep) = tool.dependencies.iter().find(|d| dependencies.contains(*d)) {
        tracing::debug!(tool = %tool.name, dependency = %dep, "dependency already declared");
        return InstallState::Maybe;
    }

    if let Some(key) = tool.manifest.keys().find(|k| manifest.has_key(k)) {
        tracing::debug!(tool = %tool.name, key = %key, "manifest key already present");
        return InstallState::Maybe;
    }

    InstallState::NotInstalled
}

/// Set `state` on every tool against the current project.
pub fn annotate(tools: &mut [ToolDescriptor], manifest: &ProjectManifest) {
    let dependencies = manifest.dependency_set();
    for tool in tools.iter_mut() {
        tool.state = detect(tool, manifest, &dependencies);
    }
}
