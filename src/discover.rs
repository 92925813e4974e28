// src/discover.rs
//! Catalog discovery for tool-scaffold.

#![deny(missing_docs)]

use crate::error::{ScaffoldError, ScaffoldResult};
use ignore::WalkBuilder;
use include_dir::Dir;
use std::path::{Path, PathBuf};

/// A tool directory found under the catalog root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDir {
    /// Directory name, used as the tool name.
    pub name: String,
    /// Absolute path of the directory.
    pub dir: PathBuf,
}

/// A tool directory compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedToolDir {
    /// Directory name, used as the tool name.
    pub name: &'static str,
    /// The embedded directory.
    pub dir: &'static Dir<'static>,
}

/// Discover struct to keep
pub struct Discover();

impl Discover {
    /// Find the tool directories directly under `root`, sorted by name.
    ///
    /// Hidden entries and plain files are skipped. Any error while reading
    /// the root fails the whole discovery.
    pub fn discover_tool_dirs(root: &Path) -> ScaffoldResult<Vec<ToolDir>> {
        if !root.is_dir() {
            return Err(ScaffoldError::config(root, "catalog root is not a directory"));
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(true)
            .follow_links(true)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut dirs = Vec::new();
        for res in builder.build() {
            let dent = res.map_err(|e| ScaffoldError::config(root, e))?;
            if dent.depth() != 1 {
                continue;
            }
            if !dent.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }

            let name = dent
                .file_name()
                .to_str()
                .ok_or_else(|| ScaffoldError::config(dent.path(), "tool name is not valid UTF-8"))?
                .to_string();
            dirs.push(ToolDir {
                name,
                dir: dent.into_path(),
            });
        }

        // walk order is by OS string; catalog order is by UTF-8 name
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(dirs)
    }

    /// Embedded counterpart of [`Discover::discover_tool_dirs`].
    pub fn embedded_tool_dirs(root: &'static Dir<'static>) -> Vec<EmbeddedToolDir> {
        let mut dirs: Vec<EmbeddedToolDir> = root
            .dirs()
            .filter_map(|dir| {
                let name = dir.path().file_name()?.to_str()?;
                (!name.starts_with('.')).then_some(EmbeddedToolDir { name, dir })
            })
            .collect();
        dirs.sort_by(|a, b| a.name.cmp(b.name));
        dirs
    }
}
