//! # apply-patch-git
//!
//! Git plumbing for apply-patch: locating the version-controlled root of a
//! registered workspace folder and running `git apply` as a subprocess.

mod error;
mod root;
mod runner;

pub use error::{Error, Result};
pub use root::{GIT_DIR, RootNotFound, find_git_root};
pub use runner::{GitInvocation, GitRunner, ProcessLauncher, TokioLauncher};
