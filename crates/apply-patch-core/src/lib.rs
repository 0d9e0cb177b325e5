//! # apply-patch-core
//!
//! Core types for apply-patch: patch references, registered workspace
//! folders, configuration, and the two log surfaces (leveled diagnostics
//! and the raw subprocess transcript).

pub mod config;
pub mod error;
pub mod log;
pub mod patch;
pub mod sink;
pub mod workspace;

pub use config::Config;
pub use error::{Error, Result};
pub use log::{DiagnosticLog, Surfaces, TracingLog};
pub use patch::PatchRef;
pub use sink::{MemoryTranscript, OutputSink, Transcript, Utf8Decoder, WriterTranscript};
pub use workspace::{RegisteredFolders, WorkspaceFolders};
