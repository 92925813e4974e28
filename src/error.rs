// src/error.rs
//! Error handling for tool-scaffold.

#![deny(missing_docs)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a scaffolding run.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// A tool descriptor, the catalog root or the config file is unusable.
    #[error("config error in {}: {message}", path.display())]
    Config {
        /// The offending file or directory.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// Reading or writing a file failed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being attempted, e.g. "copy .eslintrc.js to".
        action: String,
        /// The path the action failed on.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The project manifest exists but is not a JSON object.
    #[error("invalid manifest {}: {message}", path.display())]
    Manifest {
        /// Path of the manifest.
        path: PathBuf,
        /// Parse failure description.
        message: String,
    },

    /// The interactive prompt could not be shown or was interrupted.
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// The package manager could not be run to completion.
    #[error("{client} install failed: {message}")]
    Install {
        /// Client binary, `npm` or `yarn`.
        client: String,
        /// Spawn error or exit status.
        message: String,
    },
}

impl ScaffoldError {
    /// Shorthand for a [`ScaffoldError::Config`].
    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Shorthand for a [`ScaffoldError::Io`].
    pub fn io(action: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action: action.into(),
            path: path.into(),
            source,
        }
    }
}

/// A failed version lookup. Never escapes version resolution.
#[derive(Debug, Error)]
#[error("lookup of {package} failed: {message}")]
pub struct LookupError {
    /// Package that was looked up.
    pub package: String,
    /// Reason reported by the registry or transport.
    pub message: String,
}

/// ScaffoldResult is the crate-wide result alias.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;
