// src/catalog.rs
//! Tool descriptors and the catalog loader.

#![deny(missing_docs)]

use crate::discover::{Discover, EmbeddedToolDir, ToolDir};
use crate::error::{ScaffoldError, ScaffoldResult};
use include_dir::{Dir, include_dir};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// File name of the descriptor inside each tool directory.
pub const DESCRIPTOR_FILE: &str = "tool.toml";

/// The catalog compiled into the binary.
static BUNDLED_TOOLS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/tools");

/// Where the catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The catalog shipped inside the binary.
    Bundled,
    /// A directory holding one subdirectory per tool.
    Directory(PathBuf),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => f.write_str("<bundled>"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Whether a tool looks present in the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallState {
    /// Known to be installed.
    Installed,
    /// Some trace of the tool exists in the project.
    Maybe,
    /// Nothing of the tool was found.
    #[default]
    NotInstalled,
}

/// Where a template's contents come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A file inside an on-disk catalog.
    File(PathBuf),
    /// A file of the bundled catalog.
    Embedded {
        /// Path inside the bundled catalog, e.g. `eslint/.eslintrc.js`.
        path: PathBuf,
        /// File contents.
        contents: &'static [u8],
    },
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded { path, .. } => write!(f, "<bundled>/{}", path.display()),
        }
    }
}

/// A template file a tool copies into the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFile {
    /// Path as declared, relative to the tool directory.
    pub path: PathBuf,
    /// Template contents.
    pub source: TemplateSource,
    /// Destination inside the working directory.
    pub target: PathBuf,
}

/// A fully resolved catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    /// Catalog directory name.
    pub name: String,
    /// Template files, in declared order.
    pub files: Vec<ToolFile>,
    /// Package names the tool needs as dev dependencies.
    pub dependencies: Vec<String>,
    /// Top-level keys merged into the project manifest.
    pub manifest: Map<String, Value>,
    /// Pre-check the tool in the selection list.
    pub install_by_default: bool,
    /// Detected installation state; computed per run.
    pub state: InstallState,
}

/// On-disk shape of `tool.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescriptor {
    #[serde(default)]
    files: Vec<PathBuf>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    manifest: Map<String, Value>,
    #[serde(default = "default_install")]
    install_by_default: bool,
}

fn default_install() -> bool {
    true
}

/// Catalog loader.
pub struct Catalog();

impl Catalog {
    /// Load every tool of `source`, resolving file targets against `working_dir`.
    pub fn load(source: &CatalogSource, working_dir: &Path) -> ScaffoldResult<Vec<ToolDescriptor>> {
        match source {
            CatalogSource::Bundled => Self::load_bundled(working_dir),
            CatalogSource::Directory(root) => Self::load_all(root, working_dir),
        }
    }

    /// Load every tool under `catalog_root` in name order, resolving file
    /// targets against `working_dir`. One broken descriptor fails the load.
    pub fn load_all(catalog_root: &Path, working_dir: &Path) -> ScaffoldResult<Vec<ToolDescriptor>> {
        let tools = Discover::discover_tool_dirs(catalog_root)?
            .into_iter()
            .map(|tool| Self::load_one(&tool, working_dir))
            .collect::<ScaffoldResult<Vec<_>>>()?;
        tracing::info!(count = tools.len(), root = %catalog_root.display(), "catalog loaded");
        Ok(tools)
    }

    /// Load the bundled catalog. Reads nothing from disk.
    pub fn load_bundled(working_dir: &Path) -> ScaffoldResult<Vec<ToolDescriptor>> {
        let tools = Discover::embedded_tool_dirs(&BUNDLED_TOOLS)
            .into_iter()
            .map(|tool| Self::load_embedded(tool, working_dir))
            .collect::<ScaffoldResult<Vec<_>>>()?;
        tracing::info!(count = tools.len(), "bundled catalog loaded");
        Ok(tools)
    }

    /// Load a single tool directory.
    pub fn load_one(tool: &ToolDir, working_dir: &Path) -> ScaffoldResult<ToolDescriptor> {
        let file = tool.dir.join(DESCRIPTOR_FILE);
        let s = fs::read_to_string(&file).map_err(|e| ScaffoldError::config(&file, e))?;
        build(&tool.name, &file, &s, working_dir, |path| {
            Ok(TemplateSource::File(tool.dir.join(path)))
        })
    }

    fn load_embedded(tool: EmbeddedToolDir, working_dir: &Path) -> ScaffoldResult<ToolDescriptor> {
        let file = Path::new("<bundled>").join(tool.name).join(DESCRIPTOR_FILE);
        let s = tool
            .dir
            .get_file(Path::new(tool.name).join(DESCRIPTOR_FILE))
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| ScaffoldError::config(&file, "missing or not UTF-8"))?;

        build(tool.name, &file, s, working_dir, |path| {
            let embedded = Path::new(tool.name).join(path);
            let template = tool.dir.get_file(&embedded).ok_or_else(|| {
                ScaffoldError::config(&file, format!("template not bundled: {}", path.display()))
            })?;
            Ok(TemplateSource::Embedded {
                path: embedded,
                contents: template.contents(),
            })
        })
    }
}

/// Parse descriptor text `s` of tool `name`; `file` is only used in errors.
fn build<F>(
    name: &str,
    file: &Path,
    s: &str,
    working_dir: &Path,
    template: F,
) -> ScaffoldResult<ToolDescriptor>
where
    F: Fn(&Path) -> ScaffoldResult<TemplateSource>,
{
    let raw: RawDescriptor = toml::from_str(s).map_err(|e| ScaffoldError::config(file, e))?;

    let files = raw
        .files
        .into_iter()
        .map(|path| {
            if !is_contained(&path) {
                return Err(ScaffoldError::config(
                    file,
                    format!("file path must name a file inside the tool: {}", path.display()),
                ));
            }
            Ok(ToolFile {
                source: template(&path)?,
                target: working_dir.join(&path),
                path,
            })
        })
        .collect::<ScaffoldResult<Vec<_>>>()?;

    if let Some(bad) = raw.dependencies.iter().find(|d| d.trim().is_empty()) {
        return Err(ScaffoldError::config(file, format!("empty dependency name {bad:?}")));
    }

    tracing::debug!(tool = %name, files = files.len(), deps = raw.dependencies.len(), "loaded descriptor");
    Ok(ToolDescriptor {
        name: name.to_string(),
        files,
        dependencies: raw.dependencies,
        manifest: raw.manifest,
        install_by_default: raw.install_by_default,
        state: InstallState::NotInstalled,
    })
}

/// Relative, no `..`, and naming at least one real component.
fn is_contained(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::Normal(_)))
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
