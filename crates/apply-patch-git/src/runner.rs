//! Running git as a subprocess.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use apply_patch_core::{OutputSink, PatchRef, Surfaces, Transcript};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::error::{Error, Result};

const READ_BUF_SIZE: usize = 8 * 1024;

/// One git execution: program, arguments, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInvocation {
    program: String,
    args: Vec<OsString>,
    cwd: PathBuf,
}

impl GitInvocation {
    /// Describe a git execution.
    pub fn new<I, S>(program: impl Into<String>, args: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
        }
    }

    /// `git apply <patch>` inside `root`.
    pub fn apply(program: impl Into<String>, patch: &PatchRef, root: &Path) -> Self {
        Self::new(
            program,
            [OsString::from("apply"), patch.path().as_os_str().to_owned()],
            root,
        )
    }

    /// The executable.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the executable.
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Working directory of the child.
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

impl fmt::Display for GitInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Launches a process and waits for it to exit.
///
/// Abstracted so orchestration can be exercised without spawning git.
pub trait ProcessLauncher {
    /// Run `invocation` to completion, streaming its stdout and stderr into
    /// `transcript`.
    ///
    /// Resolves to the exit code, or `None` when the process was killed.
    fn launch(
        &self,
        invocation: &GitInvocation,
        transcript: &dyn Transcript,
    ) -> impl std::future::Future<Output = Result<Option<i32>>>;
}

/// [`ProcessLauncher`] spawning real child processes on the tokio runtime.
///
/// Stdin is closed. Stdout and stderr are drained concurrently on the
/// current task, each through its own [`OutputSink`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLauncher;

impl ProcessLauncher for TokioLauncher {
    async fn launch(
        &self,
        invocation: &GitInvocation,
        transcript: &dyn Transcript,
    ) -> Result<Option<i32>> {
        let mut child = Command::new(invocation.program())
            .args(invocation.args())
            .current_dir(invocation.cwd())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Launch {
                program: invocation.program().to_string(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (out, err, status) = tokio::join!(
            pump(stdout, transcript),
            pump(stderr, transcript),
            child.wait()
        );
        out?;
        err?;

        Ok(status?.code())
    }
}

/// Copy one pipe into the transcript until EOF.
async fn pump<R: AsyncRead + Unpin>(
    reader: Option<R>,
    transcript: &dyn Transcript,
) -> std::io::Result<()> {
    let Some(mut reader) = reader else {
        return Ok(());
    };

    let mut sink = OutputSink::new(transcript);
    let mut buf = vec![0u8; READ_BUF_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        sink.write_bytes(&buf[..n]);
    }
    sink.finish();

    Ok(())
}

/// Runs git commands through a [`ProcessLauncher`].
#[derive(Debug)]
pub struct GitRunner<P: ProcessLauncher> {
    launcher: P,
    program: String,
}

impl<P: ProcessLauncher> GitRunner<P> {
    /// Create a runner invoking `program` (usually `git`).
    pub fn new(launcher: P, program: impl Into<String>) -> Self {
        Self {
            launcher,
            program: program.into(),
        }
    }

    /// The git executable.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The underlying launcher.
    #[must_use]
    pub const fn launcher(&self) -> &P {
        &self.launcher
    }

    /// Run `git apply <patch>` with `root` as the working directory.
    ///
    /// # Errors
    /// Returns error if git can't be launched or exits nonzero.
    pub async fn apply_patch(
        &self,
        surfaces: Surfaces<'_>,
        patch: &PatchRef,
        root: &Path,
    ) -> Result<i32> {
        let invocation = GitInvocation::apply(self.program.as_str(), patch, root);
        self.run(surfaces, &invocation).await
    }

    /// Run an invocation, resolving to its exit code when that is zero.
    ///
    /// # Errors
    /// Returns error if the process can't be launched, is killed, or exits
    /// nonzero.
    pub async fn run(&self, surfaces: Surfaces<'_>, invocation: &GitInvocation) -> Result<i32> {
        surfaces.log.debug(&format!(
            "running git command: {invocation} in cwd: {}",
            invocation.cwd().display()
        ));

        match self.launcher.launch(invocation, surfaces.transcript).await? {
            Some(0) => Ok(0),
            Some(code) => Err(Error::CommandFailed(code)),
            None => Err(Error::Terminated),
        }
    }
}
