// src/bin/tool-scaffold.rs
//! tool-scaffold CLI binary.

#![deny(missing_docs)]

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tool_scaffold::cli;
use tool_scaffold::config::Config;
use tool_scaffold::info::ScaffoldInfo;
use tool_scaffold::install::PackageManager;
use tool_scaffold::resolve::NpmRegistry;
use tool_scaffold::run::{RunOptions, run};
use tool_scaffold::select::{Prompt, TerminalPrompt};
use tool_scaffold::target::ProjectTarget;

fn init_logging(verbosity: u8, quiet: bool) {
    let level = match (quiet, verbosity) {
        (true, _) => "off",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = if quiet {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_logging(args.verbose, args.quiet);

    let target = ProjectTarget::resolve(args.cwd)?;
    let cfg = Config::load_or_default(&target.root)?;
    let opts = RunOptions {
        catalog: cfg.catalog_source(args.catalog),
        working_dir: target.root.clone(),
        page_size: cfg.page_size,
    };
    let registry = NpmRegistry::new(args.registry.unwrap_or_else(|| cfg.registry.clone()));
    let mut prompt = TerminalPrompt::default();

    let show_plan = args.verbose > 0 && !args.quiet;
    let outcome = run(&opts, &mut prompt, &registry, |plan| {
        if show_plan {
            ScaffoldInfo::show_plan(plan);
        }
    })
    .await
    .context("scaffolding failed")?;

    let Some(report) = outcome.report else {
        if !args.quiet {
            ScaffoldInfo::show_nothing();
        }
        return Ok(());
    };
    if !args.quiet {
        ScaffoldInfo::show_report(&report);
    }

    if report.has_new_dependencies() && !args.no_install {
        let client = PackageManager::detect(cfg.package_manager, &target.root);
        if prompt.confirm(&format!("run {client} to install?"), true)? {
            client.install(&target.root).await?;
        }
    }

    Ok(())
}
