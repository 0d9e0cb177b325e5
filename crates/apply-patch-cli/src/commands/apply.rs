//! Default action - apply a patch file to its enclosing git working tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use apply_patch_core::config::DEFAULT_CONFIG_FILE;
use apply_patch_core::{Config, RegisteredFolders, Surfaces, TracingLog, WriterTranscript};
use apply_patch_git::{GitRunner, TokioLauncher};

use super::ApplyArgs;
use crate::logging;
use crate::output::{self, TerminalNotifier};
use crate::services::{ApplyOutcome, ApplyService};

/// Exit status when git applied the patch.
pub const EXIT_APPLIED: i32 = 0;
/// Exit status when git failed.
pub const EXIT_FAILED: i32 = 1;
/// Exit status when the apply was abandoned before running git.
pub const EXIT_SKIPPED: i32 = 2;

/// Run the apply action, returning the process exit status.
pub fn run(args: &ApplyArgs) -> Result<i32> {
    let Some(patch) = args.patch.as_deref() else {
        bail!("No patch file given");
    };

    let cwd = std::env::current_dir().context("Cannot read current directory")?;
    let config = load_config(args.config.as_deref(), &cwd)?;

    logging::init(logging::level(
        args.verbose,
        args.quiet,
        config.log.level.as_deref(),
    ));
    output::set_quiet(args.quiet);

    let folders = registered_folders(&args.workspaces, &config, &cwd);
    let program = args.git.clone().unwrap_or(config.git.executable);
    let runner = GitRunner::new(TokioLauncher, program);

    // Both log surfaces live for the rest of the process.
    let log = TracingLog;
    let transcript = WriterTranscript::new(std::io::stdout());
    let notifier = TerminalNotifier;

    let service = ApplyService::new(
        &folders,
        &runner,
        Surfaces::new(&log, &transcript),
        &notifier,
        cwd,
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let outcome = rt.block_on(service.apply(patch));

    Ok(exit_code(&outcome))
}

/// Load the explicit config file, or `apply-patch.toml` from `cwd` if present.
fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    match explicit {
        Some(path) => {
            let path = cwd.join(path);
            if !path.is_file() {
                bail!("Config file not found: {}", path.display());
            }
            Ok(Config::load(&path)?)
        }
        None => Ok(Config::load(cwd.join(DEFAULT_CONFIG_FILE))?),
    }
}

/// Folders from flags and config, falling back to the current directory.
fn registered_folders(flags: &[PathBuf], config: &Config, cwd: &Path) -> RegisteredFolders {
    let mut folders: Vec<PathBuf> = flags.iter().map(|dir| cwd.join(dir)).collect();
    folders.extend(config.workspace.folders.iter().cloned());

    if folders.is_empty() {
        folders.push(cwd.to_path_buf());
    }

    RegisteredFolders::new(folders)
}

const fn exit_code(outcome: &ApplyOutcome) -> i32 {
    match outcome {
        ApplyOutcome::Applied => EXIT_APPLIED,
        ApplyOutcome::Failed => EXIT_FAILED,
        ApplyOutcome::Skipped(_) => EXIT_SKIPPED,
    }
}
