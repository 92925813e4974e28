// src/install.rs
//! Running the project's package manager.

#![deny(missing_docs)]

use crate::config::PackageManagerChoice;
use crate::error::{ScaffoldError, ScaffoldResult};
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// A package manager client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// `npm install`
    Npm,
    /// `yarn`
    Yarn,
}

impl PackageManager {
    /// Resolve `choice` for the project in `working_dir`.
    pub fn detect(choice: PackageManagerChoice, working_dir: &Path) -> Self {
        match choice {
            PackageManagerChoice::Npm => Self::Npm,
            PackageManagerChoice::Yarn => Self::Yarn,
            PackageManagerChoice::Auto if working_dir.join("yarn.lock").is_file() => Self::Yarn,
            PackageManagerChoice::Auto => Self::Npm,
        }
    }

    /// Executable name.
    pub fn program(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
        }
    }

    /// Arguments for a plain install.
    pub fn install_args(self) -> &'static [&'static str] {
        match self {
            Self::Npm => &["install"],
            Self::Yarn => &[],
        }
    }

    /// Run the install in `working_dir`, streaming the client's output.
    pub async fn install(self, working_dir: &Path) -> ScaffoldResult<()> {
        let fail = |message: String| ScaffoldError::Install {
            client: self.program().to_string(),
            message,
        };

        tracing::info!(client = self.program(), "running install");
        let status = Command::new(self.program())
            .args(self.install_args())
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| fail(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(fail(format!("exited with {status}")))
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}
