//! Removal of stale artifacts from the staging directory.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::trace;
use std::fs;
use std::io::ErrorKind;

/// Extension of artifacts removed before each run.
pub const ARTIFACT_EXTENSION: &str = "jar";

/// Delete every non-directory entry in `staging_dir` with the given extension.
///
/// Symbolic links are removed themselves, never their targets, so the stable
/// `vineflower.jar` link from a previous run goes too. A missing directory has
/// nothing to clean. Returns the removed paths in sorted order.
///
/// # Errors
///
/// Returns [`PackagerError::CleanFailed`] if the directory cannot be listed or
/// an entry cannot be removed. Entries removed before the failure stay removed.
pub fn clean_artifacts(staging_dir: &Utf8Path, extension: &str) -> Result<Vec<Utf8PathBuf>> {
    clean_artifacts_with(staging_dir, extension, |_| {})
}

/// Like [`clean_artifacts`], calling `on_remove` with each path just before it
/// is deleted.
///
/// A removal that fails has still been announced, so every path reported
/// before an error was either deleted or is the one named in the error.
///
/// # Errors
///
/// Same as [`clean_artifacts`].
pub fn clean_artifacts_with(
    staging_dir: &Utf8Path,
    extension: &str,
    mut on_remove: impl FnMut(&Utf8Path),
) -> Result<Vec<Utf8PathBuf>> {
    let entries = match staging_dir.read_dir_utf8() {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(PackagerError::CleanFailed {
                path: staging_dir.to_owned(),
                source,
            });
        }
    };

    let mut stale = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PackagerError::CleanFailed {
            path: staging_dir.to_owned(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| PackagerError::CleanFailed {
            path: entry.path().to_owned(),
            source,
        })?;
        if !file_type.is_dir() && entry.path().extension() == Some(extension) {
            stale.push(entry.into_path());
        }
    }
    stale.sort();

    for path in &stale {
        trace!("removing {path}");
        on_remove(path);
        fs::remove_file(path).map_err(|source| PackagerError::CleanFailed {
            path: path.clone(),
            source,
        })?;
    }

    Ok(stale)
}
