//! Patch references supplied by the user.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};
use crate::workspace::normalize;

/// An absolute path to a patch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRef {
    path: PathBuf,
}

impl PatchRef {
    /// Parse user input into a patch reference.
    ///
    /// Accepts a filesystem path or a `file://` URI. Relative paths are
    /// resolved against `cwd`. Rejects empty input, URIs with any other
    /// scheme, and paths naming an existing directory. Paths are taken
    /// byte for byte, so names that are not UTF-8 or carry surrounding
    /// whitespace are kept as given.
    ///
    /// # Errors
    /// Returns `InvalidPatchRef` when the input is not a file reference.
    pub fn parse(input: impl AsRef<OsStr>, cwd: &Path) -> Result<Self> {
        let input = input.as_ref();
        let invalid = |reason: &str| Error::InvalidPatchRef {
            input: input.to_string_lossy().into_owned(),
            reason: reason.to_string(),
        };

        if input.is_empty() {
            return Err(invalid("empty input"));
        }

        let path = match input.to_str().and_then(|text| uri_scheme(text).map(|s| (text, s))) {
            Some((text, scheme)) if scheme.eq_ignore_ascii_case("file") => {
                let url = Url::parse(text).map_err(|e| invalid(&e.to_string()))?;
                url.to_file_path()
                    .map_err(|()| invalid("file URI has no local path"))?
            }
            Some((_, scheme)) => {
                return Err(invalid(&format!("unsupported scheme '{scheme}'")));
            }
            None => PathBuf::from(input),
        };

        let path = normalize(&cwd.join(path));
        if path.is_dir() {
            return Err(invalid("is a directory"));
        }

        Ok(Self { path })
    }

    /// The absolute path of the patch file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for PatchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// The scheme of a URI-looking input.
///
/// Single-letter schemes are treated as Windows drive letters.
fn uri_scheme(input: &str) -> Option<&str> {
    let (scheme, rest) = input.split_once(':')?;
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid = starts_alpha
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    (valid && scheme.len() > 1 && rest.starts_with("//")).then_some(scheme)
}
