//! Registered workspace folders.
//!
//! The host registers a set of project roots. A file belongs to the deepest
//! registered folder that contains it.

use std::path::{Component, Path, PathBuf};

/// Source of registered project roots.
pub trait WorkspaceFolders {
    /// The registered folder containing `path`, if any.
    fn folder_for(&self, path: &Path) -> Option<&Path>;
}

/// A fixed list of registered folders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredFolders {
    folders: Vec<PathBuf>,
}

impl RegisteredFolders {
    /// Register `folders`, normalizing each one.
    ///
    /// Folders are expected to be absolute already.
    pub fn new(folders: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut normalized: Vec<PathBuf> = folders.into_iter().map(|f| normalize(&f)).collect();
        normalized.dedup();
        Self {
            folders: normalized,
        }
    }

    /// The registered folders.
    #[must_use]
    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    /// Whether no folder is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

impl WorkspaceFolders for RegisteredFolders {
    fn folder_for(&self, path: &Path) -> Option<&Path> {
        let path = normalize(path);
        self.folders
            .iter()
            .filter(|folder| path.starts_with(folder))
            .max_by_key(|folder| folder.components().count())
            .map(PathBuf::as_path)
    }
}

/// Lexically normalize a path, dropping `.` and resolving `..`.
///
/// Does not touch the filesystem, so symlinks are left alone.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}
