// src/config.rs
//! Configuration file for tool-scaffold

#![deny(missing_docs)]

use crate::catalog::CatalogSource;
use crate::error::{ScaffoldError, ScaffoldResult};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

/// Name of the optional per-project config file.
pub const CONFIG_FILE: &str = ".tool-scaffold.toml";

/// Registry queried for latest versions when nothing else is configured.
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

/// Upper bound on visible checkbox rows.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Which package manager runs the install step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerChoice {
    /// `yarn` if the project has a `yarn.lock`, else `npm`.
    #[default]
    Auto,
    /// Always `npm install`.
    Npm,
    /// Always `yarn`.
    Yarn,
}

/// Config struct for tool-scaffold.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Catalog root; the bundled catalog when absent.
    pub catalog: Option<PathBuf>,
    /// Base URL of the package registry.
    pub registry: String,
    /// Maximum number of rows in the tool checklist.
    pub page_size: usize,
    /// Package manager selection.
    pub package_manager: PackageManagerChoice,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            registry: DEFAULT_REGISTRY.into(),
            page_size: DEFAULT_PAGE_SIZE,
            package_manager: PackageManagerChoice::Auto,
        }
    }
}

impl Config {
    /// Load `.tool-scaffold.toml` from `dir`. If missing, return defaults.
    /// A relative `catalog` is taken relative to `dir`.
    pub fn load_or_default(dir: &Path) -> ScaffoldResult<Self> {
        let file = dir.join(CONFIG_FILE);
        if !file.exists() {
            return Ok(Config::default());
        }

        let s = fs::read_to_string(&file).map_err(|e| ScaffoldError::io("read", &file, e))?;
        let mut cfg: Config = toml::from_str(&s).map_err(|e| ScaffoldError::config(&file, e))?;
        if cfg.page_size == 0 {
            cfg.page_size = DEFAULT_PAGE_SIZE;
        }
        if cfg.registry.trim().is_empty() {
            cfg.registry = DEFAULT_REGISTRY.into();
        }
        if let Some(catalog) = cfg.catalog.take() {
            cfg.catalog = Some(if catalog.is_relative() {
                dir.join(catalog)
            } else {
                catalog
            });
        }
        tracing::debug!(path = %file.display(), "loaded config");
        Ok(cfg)
    }

    /// Catalog to load: the override, the configured one, or the bundled one.
    pub fn catalog_source(&self, cli_override: Option<PathBuf>) -> CatalogSource {
        cli_override
            .or_else(|| self.catalog.clone())
            .map_or(CatalogSource::Bundled, CatalogSource::Directory)
    }
}
