//! Locating the git root of a workspace folder.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use apply_patch_core::{DiagnosticLog, WorkspaceFolders};

/// Name of the git metadata directory.
pub const GIT_DIR: &str = ".git";

/// Why no git root was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootNotFound {
    /// No registered folder contains the path.
    NoWorkspaceFolder,
    /// The folder has no `.git` entry.
    MissingGitDir,
    /// The folder's `.git` exists but is not a directory (worktrees,
    /// submodules). Already reported to the diagnostic log.
    GitDirNotDirectory,
}

impl RootNotFound {
    /// Whether the resolver has already logged this outcome.
    #[must_use]
    pub const fn is_reported(self) -> bool {
        matches!(self, Self::GitDirNotDirectory)
    }
}

impl fmt::Display for RootNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NoWorkspaceFolder => "no workspace folder contains the patch",
            Self::MissingGitDir => "no .git folder found in workspace root",
            Self::GitDirNotDirectory => "found .git path in workspace root, but it is not a folder",
        };
        f.write_str(msg)
    }
}

/// Find the workspace folder containing `path` whose `.git` is a directory.
///
/// Only the containing folder itself is checked; parents are not searched.
/// A `.git` that is not a directory emits one warning to `log`.
///
/// # Errors
/// Returns the reason when there is no usable root.
pub fn find_git_root<W: WorkspaceFolders + ?Sized>(
    folders: &W,
    log: &dyn DiagnosticLog,
    path: &Path,
) -> Result<PathBuf, RootNotFound> {
    let folder = folders
        .folder_for(path)
        .ok_or(RootNotFound::NoWorkspaceFolder)?;
    let git_dir = folder.join(GIT_DIR);

    match std::fs::metadata(&git_dir) {
        Ok(meta) if meta.is_dir() => Ok(folder.to_path_buf()),
        Ok(_) => {
            log.warn(&RootNotFound::GitDirNotDirectory.to_string());
            Err(RootNotFound::GitDirNotDirectory)
        }
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                log.debug(&format!("could not stat {}: {e}", git_dir.display()));
            }
            Err(RootNotFound::MissingGitDir)
        }
    }
}
