//! Apply service: the "apply this file as a patch" operation.
//!
//! Validates the patch reference, resolves the git root of its workspace
//! folder, runs `git apply`, and reports the outcome. Every failure is
//! handled here; nothing below retries or recovers.

use std::ffi::OsStr;
use std::path::PathBuf;

use apply_patch_core::{PatchRef, Surfaces, WorkspaceFolders};
use apply_patch_git::{GitRunner, ProcessLauncher, RootNotFound, find_git_root};

/// Shown when git applies the patch.
pub const SUCCESS_MESSAGE: &str = "Applied Patch";

/// Shown when git fails or can't be launched.
pub const FAILURE_MESSAGE: &str =
    "Failed to apply patch. Check the git output above for more information";

/// User-facing notification surface.
pub trait Notifier {
    /// Show an informational notification.
    fn info(&self, message: &str);

    /// Show an error notification.
    fn error(&self, message: &str);
}

/// Why an apply was abandoned before running git.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The input is not a file reference.
    InvalidInput,
    /// No workspace folder with a `.git` directory contains the patch.
    NoGitRoot,
}

/// Result of an apply operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Git applied the patch.
    Applied,
    /// Abandoned silently; only the diagnostic log knows.
    Skipped(SkipReason),
    /// Git failed; the user was notified.
    Failed,
}

/// Service applying patches with trait-based dependencies.
pub struct ApplyService<'a, W: WorkspaceFolders, P: ProcessLauncher> {
    folders: &'a W,
    runner: &'a GitRunner<P>,
    surfaces: Surfaces<'a>,
    notifier: &'a dyn Notifier,
    cwd: PathBuf,
}

impl<'a, W: WorkspaceFolders, P: ProcessLauncher> ApplyService<'a, W, P> {
    /// Create a new apply service.
    ///
    /// Relative patch paths are resolved against `cwd`.
    pub fn new(
        folders: &'a W,
        runner: &'a GitRunner<P>,
        surfaces: Surfaces<'a>,
        notifier: &'a dyn Notifier,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            folders,
            runner,
            surfaces,
            notifier,
            cwd: cwd.into(),
        }
    }

    /// Apply the patch named by `input` to its enclosing git working tree.
    pub async fn apply(&self, input: &OsStr) -> ApplyOutcome {
        let log = self.surfaces.log;

        let patch = match PatchRef::parse(input, &self.cwd) {
            Ok(patch) => patch,
            Err(e) => {
                log.warn(&e.to_string());
                return ApplyOutcome::Skipped(SkipReason::InvalidInput);
            }
        };

        let root = match find_git_root(self.folders, log, patch.path()) {
            Ok(root) => root,
            Err(reason) => {
                match reason {
                    RootNotFound::NoWorkspaceFolder => log.warn(&format!(
                        "no .git folder found in workspace root: {reason}"
                    )),
                    _ if !reason.is_reported() => log.warn(&reason.to_string()),
                    _ => {}
                }
                return ApplyOutcome::Skipped(SkipReason::NoGitRoot);
            }
        };

        if let Err(e) = self.runner.apply_patch(self.surfaces, &patch, &root).await {
            log.debug(&e.to_string());
            self.notifier.error(FAILURE_MESSAGE);
            return ApplyOutcome::Failed;
        }

        log.info(&format!(
            "Applied patch: {patch} to workspace folder: {}",
            root.display()
        ));
        self.notifier.info(SUCCESS_MESSAGE);

        ApplyOutcome::Applied
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_mocks::{Level, MockLauncher, MockLog, MockNotifier};
    use apply_patch_core::{MemoryTranscript, RegisteredFolders};
    use std::ffi::{OsStr, OsString};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        folders: RegisteredFolders,
        log: MockLog,
        transcript: MemoryTranscript,
        notifier: MockNotifier,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let folders = RegisteredFolders::new([temp.path().to_path_buf()]);
            Self {
                temp,
                folders,
                log: MockLog::new(),
                transcript: MemoryTranscript::new(),
                notifier: MockNotifier::new(),
            }
        }

        fn with_git_dir(self) -> Self {
            fs::create_dir(self.root().join(".git")).unwrap();
            self
        }

        fn root(&self) -> &Path {
            self.temp.path()
        }

        async fn apply(
            &self,
            runner: &GitRunner<MockLauncher>,
            input: impl AsRef<OsStr>,
        ) -> ApplyOutcome {
            let service = ApplyService::new(
                &self.folders,
                runner,
                Surfaces::new(&self.log, &self.transcript),
                &self.notifier,
                self.root(),
            );
            service.apply(input.as_ref()).await
        }
    }

    #[tokio::test]
    async fn test_applies_patch_in_git_root() {
        let fx = Fixture::new().with_git_dir();
        let runner = GitRunner::new(MockLauncher::new().with_exit(0), "git");
        let patch = fx.root().join("x.patch");

        let outcome = fx.apply(&runner, &patch).await;

        assert_eq!(outcome, ApplyOutcome::Applied);

        let calls = runner.launcher().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program(), "git");
        assert_eq!(
            calls[0].args().to_vec(),
            vec![OsString::from("apply"), patch.clone().into_os_string()]
        );
        assert_eq!(calls[0].cwd(), fx.root());

        assert_eq!(fx.notifier.infos(), vec![SUCCESS_MESSAGE.to_string()]);
        assert!(fx.notifier.errors().is_empty());

        let infos = fx.log.entries(Level::Info);
        assert_eq!(infos.len(), 1);
        assert!(infos[0].contains(&patch.display().to_string()));
        assert!(infos[0].contains(&fx.root().display().to_string()));
    }

    #[tokio::test]
    async fn test_relative_input_resolves_against_cwd() {
        let fx = Fixture::new().with_git_dir();
        let runner = GitRunner::new(MockLauncher::new().with_exit(0), "git");

        let outcome = fx.apply(&runner, "patches/../x.patch").await;

        assert_eq!(outcome, ApplyOutcome::Applied);
        let calls = runner.launcher().calls();
        assert_eq!(calls[0].args()[1], fx.root().join("x.patch").into_os_string());
    }

    #[tokio::test]
    async fn test_git_failure_notifies_error() {
        let fx = Fixture::new().with_git_dir();
        let launcher = MockLauncher::new()
            .with_exit(1)
            .with_output(b"error: patch failed: src/main.rs:3\n".to_vec());
        let runner = GitRunner::new(launcher, "git");

        let outcome = fx.apply(&runner, "x.patch").await;

        assert_eq!(outcome, ApplyOutcome::Failed);
        assert_eq!(fx.notifier.errors(), vec![FAILURE_MESSAGE.to_string()]);
        assert!(fx.notifier.infos().is_empty());
        assert!(
            fx.transcript
                .contents()
                .contains("error: patch failed: src/main.rs:3")
        );
        assert!(fx.log.entries(Level::Info).is_empty());
    }

    #[tokio::test]
    async fn test_launch_failure_is_command_failure() {
        let fx = Fixture::new().with_git_dir();
        let runner = GitRunner::new(MockLauncher::new().with_launch_failure(), "git");

        let outcome = fx.apply(&runner, "x.patch").await;

        assert_eq!(outcome, ApplyOutcome::Failed);
        assert_eq!(fx.notifier.errors().len(), 1);
        assert!(fx.notifier.infos().is_empty());
    }

    #[tokio::test]
    async fn test_multibyte_output_split_across_chunks() {
        let fx = Fixture::new().with_git_dir();
        // "ñ" is C3 B1, split between chunks
        let launcher = MockLauncher::new()
            .with_exit(1)
            .with_output(b"error: a\xC3".to_vec())
            .with_output(b"\xB1o.txt: does not exist\n".to_vec());
        let runner = GitRunner::new(launcher, "git");

        fx.apply(&runner, "x.patch").await;

        assert_eq!(fx.transcript.contents(), "error: año.txt: does not exist\n");
    }

    #[tokio::test]
    async fn test_invalid_input_is_silent() {
        let fx = Fixture::new().with_git_dir();
        let runner = GitRunner::new(MockLauncher::new().with_exit(0), "git");

        for input in ["", "https://example.com/x.patch", "."] {
            let outcome = fx.apply(&runner, input).await;
            assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::InvalidInput));
        }

        assert!(runner.launcher().calls().is_empty());
        assert!(fx.notifier.infos().is_empty());
        assert!(fx.notifier.errors().is_empty());
        let warnings = fx.log.entries(Level::Warn);
        assert_eq!(warnings.len(), 3);
        assert_eq!(warnings[0], "not a file reference '': empty input");
    }

    #[tokio::test]
    async fn test_missing_git_dir_warns_once() {
        let fx = Fixture::new();
        let runner = GitRunner::new(MockLauncher::new().with_exit(0), "git");

        let outcome = fx.apply(&runner, "x.patch").await;

        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::NoGitRoot));
        assert!(runner.launcher().calls().is_empty());
        assert!(fx.notifier.infos().is_empty());
        assert!(fx.notifier.errors().is_empty());
        let warnings = fx.log.entries(Level::Warn);
        assert_eq!(warnings, vec!["no .git folder found in workspace root".to_string()]);
    }

    #[tokio::test]
    async fn test_git_file_warns_once() {
        let fx = Fixture::new();
        fs::write(fx.root().join(".git"), "gitdir: /elsewhere/.git/worktrees/wt\n").unwrap();
        let runner = GitRunner::new(MockLauncher::new().with_exit(0), "git");

        let outcome = fx.apply(&runner, "x.patch").await;

        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::NoGitRoot));
        assert!(runner.launcher().calls().is_empty());
        assert!(fx.notifier.infos().is_empty());
        assert!(fx.notifier.errors().is_empty());
        let warnings = fx.log.entries(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("not a folder"));
    }

    #[tokio::test]
    async fn test_patch_outside_workspace_is_silent() {
        let fx = Fixture::new().with_git_dir();
        let other = TempDir::new().unwrap();
        let runner = GitRunner::new(MockLauncher::new().with_exit(0), "git");
        let patch = other.path().join("x.patch");

        let outcome = fx.apply(&runner, &patch).await;

        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::NoGitRoot));
        assert!(runner.launcher().calls().is_empty());
        assert!(fx.notifier.errors().is_empty());
        assert_eq!(
            fx.log.entries(Level::Warn),
            vec![
                "no .git folder found in workspace root: no workspace folder contains the patch"
                    .to_string()
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_patch_name_is_applied() {
        use std::os::unix::ffi::OsStrExt;

        let fx = Fixture::new().with_git_dir();
        let runner = GitRunner::new(MockLauncher::new().with_exit(0), "git");
        let patch = fx.root().join(OsStr::from_bytes(b"fix\xFF.patch"));

        let outcome = fx.apply(&runner, &patch).await;

        assert_eq!(outcome, ApplyOutcome::Applied);
        let calls = runner.launcher().calls();
        assert_eq!(calls[0].args()[1], patch.into_os_string());
        assert!(fx.log.entries(Level::Warn).is_empty());
    }
}
