//! CLI argument parser for tool-scaffold.

#![deny(missing_docs)]

use clap::Parser;
use std::path::PathBuf;

/// Copy tool configs into a project and wire up its package.json.
#[derive(Parser, Debug)]
#[command(
    name = "tool-scaffold",
    version,
    about = "Copy tool configs into a project and wire up its package.json",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Set verbosity level: -v=1, -v=2, -v=3
    #[arg(
        short = 'v',
        long = "verbose",
        value_name = "LEVEL",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=3),
        global = true
    )]
    pub verbose: u8,

    /// Silence all output (overrides -v).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project directory (defaults to pwd).
    #[arg(short = 'C', long = "cwd", value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Catalog of tool directories to choose from.
    #[arg(long, value_name = "DIR")]
    pub catalog: Option<PathBuf>,

    /// Registry used to look up latest versions.
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,

    /// Never offer to run the package manager.
    #[arg(long)]
    pub no_install: bool,
}
