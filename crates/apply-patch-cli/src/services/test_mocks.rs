//! Mock implementations for testing services.
//!
//! These mocks implement the launcher, log, and notifier seams so service
//! logic can be tested without spawning git.

use std::cell::RefCell;

use apply_patch_core::{DiagnosticLog, OutputSink, Transcript};
use apply_patch_git::{Error as GitError, GitInvocation, ProcessLauncher, Result as GitResult};

use super::Notifier;

/// Mock implementation of `ProcessLauncher` for testing.
pub struct MockLauncher {
    pub calls: RefCell<Vec<GitInvocation>>,
    pub exit: Option<i32>,
    pub output: Vec<Vec<u8>>,
    pub launch_fails: bool,
}

impl Default for MockLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLauncher {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            exit: Some(0),
            output: Vec::new(),
            launch_fails: false,
        }
    }

    pub fn with_exit(mut self, code: i32) -> Self {
        self.exit = Some(code);
        self
    }

    /// Queue a raw chunk written to the transcript during launch.
    pub fn with_output(mut self, chunk: Vec<u8>) -> Self {
        self.output.push(chunk);
        self
    }

    pub fn with_launch_failure(mut self) -> Self {
        self.launch_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<GitInvocation> {
        self.calls.borrow().clone()
    }
}

impl ProcessLauncher for MockLauncher {
    async fn launch(
        &self,
        invocation: &GitInvocation,
        transcript: &dyn Transcript,
    ) -> GitResult<Option<i32>> {
        self.calls.borrow_mut().push(invocation.clone());

        if self.launch_fails {
            return Err(GitError::Launch {
                program: invocation.program().to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let mut sink = OutputSink::new(transcript);
        for chunk in &self.output {
            sink.write_bytes(chunk);
        }
        sink.finish();

        Ok(self.exit)
    }
}

/// Diagnostic log level recorded by [`MockLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

/// Mock implementation of `DiagnosticLog` recording every entry.
#[derive(Default)]
pub struct MockLog {
    pub entries: RefCell<Vec<(Level, String)>>,
}

impl MockLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    fn record(&self, level: Level, message: &str) {
        self.entries
            .borrow_mut()
            .push((level, message.to_string()));
    }
}

impl DiagnosticLog for MockLog {
    fn debug(&self, message: &str) {
        self.record(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message);
    }
}

/// Mock implementation of `Notifier` recording every notification.
#[derive(Default)]
pub struct MockNotifier {
    pub infos: RefCell<Vec<String>>,
    pub errors: RefCell<Vec<String>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl Notifier for MockNotifier {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}
