//! The diagnostic log surface.
//!
//! Both log surfaces are created once at startup and handed to every
//! component that writes to them, so nothing reaches for a global logger
//! directly and tests can substitute recording implementations.

use crate::sink::Transcript;

/// Leveled diagnostic log for internal status.
pub trait DiagnosticLog {
    /// Record a debug-level entry.
    fn debug(&self, message: &str);

    /// Record an info-level entry.
    fn info(&self, message: &str);

    /// Record a warning-level entry.
    fn warn(&self, message: &str);
}

/// [`DiagnosticLog`] backed by the `tracing` subscriber installed at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl DiagnosticLog for TracingLog {
    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// The two process-lifetime log surfaces.
#[derive(Clone, Copy)]
pub struct Surfaces<'a> {
    /// Leveled diagnostics.
    pub log: &'a dyn DiagnosticLog,
    /// Raw subprocess output.
    pub transcript: &'a dyn Transcript,
}

impl<'a> Surfaces<'a> {
    /// Bundle a diagnostic log and a transcript.
    #[must_use]
    pub const fn new(log: &'a dyn DiagnosticLog, transcript: &'a dyn Transcript) -> Self {
        Self { log, transcript }
    }
}

impl std::fmt::Debug for Surfaces<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surfaces").finish_non_exhaustive()
    }
}
