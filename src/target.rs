// src/target.rs
//! The project directory being scaffolded.

#![deny(missing_docs)]

use crate::error::{ScaffoldError, ScaffoldResult};
use std::fs;
use std::path::PathBuf;

/// Resolved working directory of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTarget {
    /// Absolute project root; template targets are resolved against it.
    pub root: PathBuf,
}

impl ProjectTarget {
    /// Resolve the user-provided directory, defaulting to ".".
    pub fn resolve(raw: Option<PathBuf>) -> ScaffoldResult<ProjectTarget> {
        let path = raw.unwrap_or_else(|| PathBuf::from("."));
        let meta = fs::metadata(&path).map_err(|e| ScaffoldError::io("project directory not found:", &path, e))?;
        if !meta.is_dir() {
            return Err(ScaffoldError::config(&path, "project path is not a directory"));
        }

        let root = fs::canonicalize(&path).map_err(|e| ScaffoldError::io("resolve", &path, e))?;
        Ok(ProjectTarget { root })
    }
}
