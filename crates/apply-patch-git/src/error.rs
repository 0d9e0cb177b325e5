//! Error types for apply-patch-git.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running git.
///
/// Every variant means the command failed; callers are not expected to
/// tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Git exited with a nonzero code.
    #[error("git process exited with code: {0}")]
    CommandFailed(i32),

    /// Git was terminated without an exit code.
    #[error("git process was terminated by a signal")]
    Terminated,

    /// Git could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading the child's output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The exit code, when git ran to completion.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed(code) => Some(*code),
            _ => None,
        }
    }
}
