//! CLI command definitions and handlers.

pub mod apply;
pub mod completions;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// apply-patch - apply a patch file to the git working tree that contains it.
#[derive(Parser)]
#[command(name = "apply-patch")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub apply: ApplyArgs,
}

/// Arguments of the default apply action.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Patch file to apply, as a path or a file:// URI.
    ///
    /// A patch file named like a subcommand must be given as a path,
    /// e.g. `./completions`.
    #[arg(required = true, value_name = "PATCH")]
    pub patch: Option<OsString>,

    /// Register a workspace folder (repeatable). Defaults to the current directory.
    #[arg(short, long = "workspace", value_name = "DIR")]
    pub workspaces: Vec<PathBuf>,

    /// Config file [default: ./apply-patch.toml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Git executable to run.
    #[arg(long, value_name = "EXE")]
    pub git: Option<String>,

    /// Show debug diagnostics.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}
