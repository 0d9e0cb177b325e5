//! Configuration management for apply-patch.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::workspace::normalize;

/// Config file looked up in the current directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "apply-patch.toml";

/// apply-patch configuration loaded from `apply-patch.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Registered workspace folders.
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Git executable settings.
    #[serde(default)]
    pub git: GitConfig,

    /// Diagnostic log settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// A missing file yields the defaults. Relative workspace folders are
    /// resolved against the directory holding the file.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            file: path.to_path_buf(),
            source,
        })?;

        let base = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let base = std::path::absolute(base)?;
        config.workspace.folders = config
            .workspace
            .folders
            .iter()
            .map(|folder| normalize(&base.join(folder)))
            .collect();

        Ok(config)
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Workspace folder registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directories treated as project roots.
    #[serde(default)]
    pub folders: Vec<PathBuf>,
}

/// Git executable settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Program used to run `git apply`.
    #[serde(default = "default_executable")]
    pub executable: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
        }
    }
}

fn default_executable() -> String {
    "git".into()
}

/// Diagnostic log settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive for the diagnostic log, e.g. `debug`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}
