//! End-to-end tests of detection, selection, planning and execution.

use assert_fs::prelude::*;
use assert_fs::TempDir;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use tool_scaffold::catalog::{Catalog, CatalogSource, InstallState, ToolDescriptor};
use tool_scaffold::error::{LookupError, ScaffoldError, ScaffoldResult};
use tool_scaffold::execute::execute;
use tool_scaffold::manifest::ProjectManifest;
use tool_scaffold::plan::{InstallationPlan, plan};
use tool_scaffold::resolve::VersionLookup;
use tool_scaffold::run::{RunOptions, load_tools, run};
use tool_scaffold::select::{Choice, Prompt};

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Answers prompts from queues and records what it was shown.
#[derive(Default)]
struct ScriptedPrompt {
    picks: VecDeque<Vec<usize>>,
    confirms: VecDeque<bool>,
    shown: Vec<Vec<Choice>>,
    confirm_messages: Vec<String>,
}

impl ScriptedPrompt {
    fn new(picks: Vec<Vec<usize>>, confirms: Vec<bool>) -> Self {
        Self {
            picks: picks.into(),
            confirms: confirms.into(),
            ..Self::default()
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn multi_select(&mut self, _: &str, choices: &[Choice], _: usize) -> ScaffoldResult<Vec<usize>> {
        self.shown.push(choices.to_vec());
        self.picks
            .pop_front()
            .ok_or_else(|| ScaffoldError::Prompt("no scripted selection left".into()))
    }

    fn confirm(&mut self, message: &str, _: bool) -> ScaffoldResult<bool> {
        self.confirm_messages.push(message.to_string());
        self.confirms
            .pop_front()
            .ok_or_else(|| ScaffoldError::Prompt("no scripted confirmation left".into()))
    }
}

/// Every package is at 1.0.0 except those starting with "unpublished".
#[derive(Default)]
struct FakeRegistry {
    asked: Mutex<Vec<String>>,
}

#[async_trait]
impl VersionLookup for FakeRegistry {
    async fn latest_version(&self, package: &str) -> Result<String, LookupError> {
        self.asked.lock().unwrap().push(package.to_string());
        if package.starts_with("unpublished") {
            return Err(LookupError {
                package: package.into(),
                message: "404 Not Found".into(),
            });
        }
        Ok("1.0.0".into())
    }
}

/// Catalog with `lint` and `fmt`, as in the documented scenario.
fn scenario_catalog() -> Result<TempDir, Box<dyn std::error::Error>> {
    let catalog = TempDir::new()?;
    catalog.child("lint/.lintrc").write_str("{}\n")?;
    catalog.child("lint/tool.toml").write_str(
        "files = [\".lintrc\"]\n\
         dependencies = [\"linter-x\"]\n\
         install_by_default = true\n\
         [manifest.scripts]\n\
         lint = \"linter-x .\"\n",
    )?;
    catalog.child("fmt/.fmtrc").write_str("indent = 2\n")?;
    catalog.child("fmt/tool.toml").write_str(
        "files = [\".fmtrc\"]\n\
         dependencies = []\n\
         install_by_default = false\n\
         [manifest]\n",
    )?;
    Ok(catalog)
}

fn options(catalog: &Path, project: &Path) -> RunOptions {
    RunOptions {
        catalog: CatalogSource::Directory(catalog.to_path_buf()),
        working_dir: project.to_path_buf(),
        page_size: 15,
    }
}

fn read_manifest(project: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let s = std::fs::read_to_string(project.join("package.json"))?;
    Ok(serde_json::from_str(&s)?)
}

fn descriptor(name: &str, deps: &[&str], fragment: Value) -> ToolDescriptor {
    let manifest = match fragment {
        Value::Object(m) => m,
        _ => Map::new(),
    };
    ToolDescriptor {
        name: name.into(),
        files: Vec::new(),
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
        manifest,
        install_by_default: true,
        state: InstallState::NotInstalled,
    }
}

// catalog order is fmt (0), lint (1)
const FMT: usize = 0;
const LINT: usize = 1;

#[tokio::test]
async fn selecting_lint_only_applies_one_file_one_dependency_and_scripts() -> TestResult {
    let catalog = scenario_catalog()?;
    let project = TempDir::new()?;
    let mut prompt = ScriptedPrompt::new(vec![vec![LINT]], vec![true]);
    let registry = FakeRegistry::default();

    let outcome = run(&options(catalog.path(), project.path()), &mut prompt, &registry, |_| {}).await?;

    let shown = &prompt.shown[0];
    assert_eq!(shown[FMT].value, "fmt");
    assert!(!shown[FMT].checked);
    assert_eq!(shown[LINT].value, "lint");
    assert!(shown[LINT].checked);
    assert_eq!(prompt.confirm_messages, ["install 1 selected config(s): lint?"]);

    assert_eq!(outcome.selected, ["lint"]);
    let plan = outcome.plan.expect("plan");
    assert_eq!(plan.files.len(), 1);
    assert_eq!(
        plan.dependencies,
        BTreeMap::from([("linter-x".to_string(), "^1.0.0".to_string())])
    );
    assert_eq!(plan.manifest["scripts"], json!({"lint": "linter-x ."}));

    let report = outcome.report.expect("report");
    assert!(report.has_new_files());
    assert!(report.has_new_dependencies());

    project.child(".lintrc").assert("{}\n");
    project.child(".fmtrc").assert(predicates::path::missing());
    let written = read_manifest(project.path())?;
    assert_eq!(written["devDependencies"]["linter-x"], json!("^1.0.0"));
    assert_eq!(written["scripts"]["lint"], json!("linter-x ."));
    Ok(())
}

#[tokio::test]
async fn empty_selection_touches_nothing() -> TestResult {
    let catalog = scenario_catalog()?;
    let project = TempDir::new()?;
    let mut prompt = ScriptedPrompt::new(vec![vec![]], vec![]);
    let registry = FakeRegistry::default();

    let outcome = run(&options(catalog.path(), project.path()), &mut prompt, &registry, |_| {
        panic!("nothing should be planned")
    })
    .await?;

    assert!(outcome.selected.is_empty());
    assert!(outcome.report.is_none());
    assert!(prompt.confirm_messages.is_empty());
    assert!(registry.asked.lock().unwrap().is_empty());
    project.child("package.json").assert(predicates::path::missing());
    project.child(".lintrc").assert(predicates::path::missing());
    Ok(())
}

#[tokio::test]
async fn rejecting_once_then_accepting_matches_accepting_immediately() -> TestResult {
    let catalog = scenario_catalog()?;
    let registry = FakeRegistry::default();

    let direct_project = TempDir::new()?;
    let mut direct = ScriptedPrompt::new(vec![vec![FMT, LINT]], vec![true]);
    let direct_outcome = run(&options(catalog.path(), direct_project.path()), &mut direct, &registry, |_| {}).await?;

    let retry_project = TempDir::new()?;
    let mut retry = ScriptedPrompt::new(vec![vec![LINT], vec![FMT, LINT]], vec![false, true]);
    let retry_outcome = run(&options(catalog.path(), retry_project.path()), &mut retry, &registry, |_| {}).await?;

    assert_eq!(retry.shown.len(), 2);
    assert_eq!(retry.shown[0], retry.shown[1]);
    assert_eq!(direct_outcome.selected, retry_outcome.selected);

    // targets differ by project dir; compare the project-relative view
    let relative = |plan: &InstallationPlan| -> Vec<_> { plan.files.iter().map(|f| f.path.clone()).collect() };
    let (a, b) = (direct_outcome.plan.expect("plan"), retry_outcome.plan.expect("plan"));
    assert_eq!(relative(&a), relative(&b));
    assert_eq!(a.dependencies, b.dependencies);
    assert_eq!(a.manifest, b.manifest);
    Ok(())
}

#[tokio::test]
async fn applied_tools_are_detected_on_the_next_run() -> TestResult {
    let catalog = scenario_catalog()?;
    let project = TempDir::new()?;
    let opts = options(catalog.path(), project.path());

    let (before, _) = load_tools(&opts)?;
    assert!(before.iter().all(|t| t.state == InstallState::NotInstalled));

    let mut prompt = ScriptedPrompt::new(vec![vec![LINT]], vec![true]);
    run(&opts, &mut prompt, &FakeRegistry::default(), |_| {}).await?;

    let (after, _) = load_tools(&opts)?;
    assert_eq!(after[FMT].state, InstallState::NotInstalled);
    assert_eq!(after[LINT].state, InstallState::Maybe);

    // a maybe-installed tool is no longer pre-checked but can still be picked
    let mut again = ScriptedPrompt::new(vec![vec![LINT]], vec![true]);
    let outcome = run(&opts, &mut again, &FakeRegistry::default(), |_| {}).await?;
    assert!(!again.shown[0][LINT].checked);
    assert!(again.shown[0][LINT].label.contains("[installed]"));
    // linter-x is now a project dependency and is not resolved again
    assert!(outcome.plan.expect("plan").dependencies.is_empty());
    Ok(())
}

#[tokio::test]
async fn later_tool_wins_manifest_key_collisions() {
    let project = TempDir::new().unwrap();
    let manifest = ProjectManifest::load(project.path()).unwrap();
    let a = descriptor("a", &[], json!({"k": "from-a", "only-a": 1}));
    let b = descriptor("b", &[], json!({"k": "from-b"}));

    let plan = plan(&[a, b], &manifest, &FakeRegistry::default()).await;
    assert_eq!(plan.manifest["k"], json!("from-b"));
    assert_eq!(plan.manifest["only-a"], json!(1));
}

#[tokio::test]
async fn project_dependencies_are_never_resolved_again() -> TestResult {
    let project = TempDir::new()?;
    project
        .child("package.json")
        .write_str(r#"{"name": "demo", "devDependencies": {"linter-x": "0.9.0"}}"#)?;
    let manifest = ProjectManifest::load(project.path())?;
    let registry = FakeRegistry::default();
    let tools = [
        descriptor("a", &["linter-x", "shared"], json!({})),
        descriptor("b", &["shared", "unpublished-thing"], json!({})),
    ];

    let plan = plan(&tools, &manifest, &registry).await;
    assert_eq!(
        plan.dependencies,
        BTreeMap::from([
            ("shared".to_string(), "^1.0.0".to_string()),
            ("unpublished-thing".to_string(), "latest".to_string()),
        ])
    );
    let mut asked = registry.asked.lock().unwrap().clone();
    asked.sort();
    assert_eq!(asked, ["shared", "unpublished-thing"]);
    Ok(())
}

#[tokio::test]
async fn executor_keeps_pinned_versions_and_strips_registry_id() -> TestResult {
    let project = TempDir::new()?;
    project.child("package.json").write_str(
        r#"{"name": "demo", "_id": "demo@1.0.0", "scripts": {"test": "jest"}, "devDependencies": {"shared": "2.0.0"}}"#,
    )?;
    let manifest = ProjectManifest::load(project.path())?;
    let mut fragment = Map::new();
    fragment.insert("scripts".into(), json!({"lint": "x"}));
    let plan = InstallationPlan {
        files: Vec::new(),
        dependencies: BTreeMap::from([
            ("shared".to_string(), "^3.0.0".to_string()),
            ("fresh".to_string(), "^1.0.0".to_string()),
        ]),
        manifest: fragment,
    };

    let report = execute(&plan, manifest).await?;
    assert_eq!(report.dependencies_added, 1);
    assert!(!report.has_new_files());

    let written = read_manifest(project.path())?;
    assert!(written.get("_id").is_none());
    assert_eq!(written["name"], json!("demo"));
    assert_eq!(written["scripts"], json!({"lint": "x"}));
    assert_eq!(written["devDependencies"], json!({"fresh": "^1.0.0", "shared": "2.0.0"}));
    Ok(())
}

#[tokio::test]
async fn failed_copy_leaves_manifest_unwritten() -> TestResult {
    let catalog = TempDir::new()?;
    let project = TempDir::new()?;
    catalog.child("ghost/tool.toml").write_str(
        "files = [\"never-shipped.cfg\"]\ndependencies = [\"ghost-lib\"]\n",
    )?;
    project.child("package.json").write_str("{\"name\": \"demo\"}\n")?;
    let mut prompt = ScriptedPrompt::new(vec![vec![0]], vec![true]);

    let err = run(&options(catalog.path(), project.path()), &mut prompt, &FakeRegistry::default(), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, ScaffoldError::Io { .. }), "got: {err}");
    project.child("package.json").assert("{\"name\": \"demo\"}\n");
    Ok(())
}

#[tokio::test]
async fn non_object_dev_dependencies_fails_before_any_copy() -> TestResult {
    let catalog = scenario_catalog()?;
    let project = TempDir::new()?;
    let original = r#"{"name": "demo", "devDependencies": ["eslint@5"]}"#;
    project.child("package.json").write_str(original)?;
    let mut prompt = ScriptedPrompt::new(vec![vec![LINT]], vec![true]);

    let err = run(&options(catalog.path(), project.path()), &mut prompt, &FakeRegistry::default(), |_| {})
        .await
        .unwrap_err();
    match err {
        ScaffoldError::Manifest { path, message } => {
            assert!(path.ends_with("package.json"));
            assert!(message.contains("devDependencies"), "got: {message}");
        }
        other => panic!("expected manifest error, got {other}"),
    }
    project.child("package.json").assert(original);
    project.child(".lintrc").assert(predicates::path::missing());
    Ok(())
}

#[tokio::test]
async fn nested_targets_get_their_directories_created() -> TestResult {
    let catalog = TempDir::new()?;
    let project = TempDir::new()?;
    catalog.child("ci/.github/workflows/ci.yml").write_str("on: push\n")?;
    catalog
        .child("ci/tool.toml")
        .write_str("files = [\".github/workflows/ci.yml\"]\n")?;
    let mut prompt = ScriptedPrompt::new(vec![vec![0]], vec![true]);

    let outcome = run(&options(catalog.path(), project.path()), &mut prompt, &FakeRegistry::default(), |_| {}).await?;
    project.child(".github/workflows/ci.yml").assert("on: push\n");
    assert!(!outcome.report.expect("report").has_new_dependencies());
    Ok(())
}

#[test]
fn catalog_is_loaded_fresh_for_each_project() -> TestResult {
    let catalog = scenario_catalog()?;
    let one = TempDir::new()?;
    let two = TempDir::new()?;
    let a = Catalog::load_all(catalog.path(), one.path())?;
    let b = Catalog::load_all(catalog.path(), two.path())?;
    assert_eq!(a[LINT].files[0].source, b[LINT].files[0].source);
    assert_ne!(a[LINT].files[0].target, b[LINT].files[0].target);
    Ok(())
}
