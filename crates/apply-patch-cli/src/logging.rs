//! Diagnostic log subscriber setup.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter used when nothing else picks one.
pub const DEFAULT_LEVEL: &str = "info";

/// Pick the filter directive from flags and config.
///
/// `RUST_LOG`, when set, still wins inside [`init`].
#[must_use]
pub fn level(verbose: bool, quiet: bool, configured: Option<&str>) -> &str {
    if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        configured.unwrap_or(DEFAULT_LEVEL)
    }
}

/// Install the stderr subscriber backing [`apply_patch_core::TracingLog`].
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .compact()
        .try_init();
}
