//! Artifact staging inside the package tree.
//!
//! This module writes the downloaded jar into the staging directory under its
//! published name and points the version-independent `vineflower.jar` link at
//! it, so launcher scripts never need to know the release number.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;

/// Name of the version-independent link to the staged artifact.
pub const STABLE_ARTIFACT_NAME: &str = "vineflower.jar";

/// Paths produced by staging one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    /// The artifact written under its published name.
    pub artifact_path: Utf8PathBuf,
    /// The stable link pointing at the artifact.
    pub link_path: Utf8PathBuf,
}

/// Handles staging of the artifact into the staging directory.
pub struct Stager {
    staging_dir: Utf8PathBuf,
}

impl Stager {
    /// Create a new stager for the given staging directory.
    #[must_use]
    pub fn new(staging_dir: Utf8PathBuf) -> Self {
        Self { staging_dir }
    }

    /// Return the staging directory.
    #[must_use]
    pub fn staging_path(&self) -> &Utf8Path {
        &self.staging_dir
    }

    /// Ensure the staging directory exists and is writable.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or is not writable.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.staging_dir)?;

        // Verify writability by attempting to create a temp file
        let test_path = self.staging_dir.join(".vineflower-packager-test");
        match fs::write(&test_path, b"test") {
            Ok(()) => {
                fs::remove_file(&test_path)?;
                Ok(())
            }
            Err(e) => Err(PackagerError::StagingNotWritable {
                path: self.staging_dir.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Write the artifact bytes under `asset_name`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidAssetName`] if `asset_name` is not a
    /// plain file name, or [`PackagerError::StagingFailed`] if the write fails.
    pub fn write_artifact(&self, asset_name: &str, bytes: &[u8]) -> Result<Utf8PathBuf> {
        validate_asset_name(asset_name)?;
        let dest_path = self.staging_dir.join(asset_name);

        fs::write(&dest_path, bytes).map_err(|e| PackagerError::StagingFailed {
            reason: format!("failed to write {dest_path}: {e}"),
        })?;
        debug!("wrote {} byte(s) to {dest_path}", bytes.len());

        Ok(dest_path)
    }

    /// Create the [`STABLE_ARTIFACT_NAME`] link with `asset_name` as its
    /// relative target.
    ///
    /// An existing entry at the link path is never replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::LinkCollision`] if the link path is occupied,
    /// [`PackagerError::InvalidAssetName`] for an unsafe target name, or
    /// [`PackagerError::StagingFailed`] if the link cannot be created.
    pub fn link_stable_name(&self, asset_name: &str) -> Result<Utf8PathBuf> {
        validate_asset_name(asset_name)?;
        let link_path = self.link_path();

        if link_path.symlink_metadata().is_ok() {
            return Err(PackagerError::LinkCollision { path: link_path });
        }

        create_relative_link(asset_name, &link_path)?;
        debug!("linked {link_path} -> {asset_name}");

        Ok(link_path)
    }

    /// Write the artifact and create its stable link.
    ///
    /// # Errors
    ///
    /// Returns an error if either [`Stager::write_artifact`] or
    /// [`Stager::link_stable_name`] fails.
    pub fn stage(&self, asset_name: &str, bytes: &[u8]) -> Result<StagedArtifact> {
        let artifact_path = self.write_artifact(asset_name, bytes)?;
        let link_path = self.link_stable_name(asset_name)?;
        Ok(StagedArtifact {
            artifact_path,
            link_path,
        })
    }

    /// Return the full path of the stable link.
    #[must_use]
    pub fn link_path(&self) -> Utf8PathBuf {
        self.staging_dir.join(STABLE_ARTIFACT_NAME)
    }
}

/// Reject asset names that are not a single plain path component.
///
/// # Errors
///
/// Returns [`PackagerError::InvalidAssetName`] for empty names, `.`, `..`, and
/// names containing a path separator.
///
/// # Examples
///
/// ```
/// use vineflower_packager::stager::validate_asset_name;
///
/// assert!(validate_asset_name("vineflower-1.10.1.jar").is_ok());
/// assert!(validate_asset_name("../vineflower.jar").is_err());
/// ```
pub fn validate_asset_name(name: &str) -> Result<()> {
    let is_plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if is_plain {
        Ok(())
    } else {
        Err(PackagerError::InvalidAssetName {
            name: name.to_owned(),
        })
    }
}

#[cfg(unix)]
fn create_relative_link(target: &str, link_path: &Utf8Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            PackagerError::LinkCollision {
                path: link_path.to_owned(),
            }
        } else {
            PackagerError::StagingFailed {
                reason: format!("failed to link {link_path} -> {target}: {e}"),
            }
        }
    })
}

#[cfg(not(unix))]
fn create_relative_link(target: &str, link_path: &Utf8Path) -> Result<()> {
    Err(PackagerError::StagingFailed {
        reason: format!("symbolic links are unsupported here; cannot link {link_path} -> {target}"),
    })
}
