//! Error types for the Vineflower packager.
//!
//! This module defines semantic error variants for every stage of the
//! packaging pipeline. Each variant names the stage that failed and keeps the
//! underlying cause available through [`std::error::Error::source`].

use crate::github::DownloadError;
use camino::Utf8PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur while packaging a release.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// An HTTP request to the release host failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The release host answered with a body of unexpected shape.
    #[error("malformed response from {url}")]
    MalformedResponse {
        /// The URL whose response could not be decoded.
        url: String,
        /// The JSON decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// The release listing was empty.
    #[error("no releases found")]
    NoReleases,

    /// A release tag is not a semantic version.
    #[error("release tag {tag:?} is not a semantic version")]
    InvalidTag {
        /// The raw tag as published.
        tag: String,
        /// The version parse error.
        #[source]
        source: semver::Error,
    },

    /// The selected release has no `.jar` asset attached.
    #[error("release {tag} has no .jar asset")]
    NoJarAsset {
        /// The release tag that was inspected.
        tag: String,
    },

    /// Removing a stale artifact from the staging directory failed.
    #[error("failed to clean {path}")]
    CleanFailed {
        /// The path that could not be listed or removed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The staging directory exists but is not writable.
    #[error("staging directory {path} is not writable: {reason}")]
    StagingNotWritable {
        /// Path to the non-writable directory.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// Writing the artifact or its link failed.
    #[error("staging failed: {reason}")]
    StagingFailed {
        /// Description of the staging failure.
        reason: String,
    },

    /// The asset name is not a plain file name.
    #[error("refusing to stage asset with unsafe name {name:?}")]
    InvalidAssetName {
        /// The name as published by the release host.
        name: String,
    },

    /// An entry already occupies the stable link name.
    #[error("cannot create link {path}: an entry with that name already exists")]
    LinkCollision {
        /// Path of the existing entry.
        path: Utf8PathBuf,
    },

    /// Reading or rewriting the control file failed.
    #[error("failed to update control file {path}")]
    ControlFile {
        /// Path to the control file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The packaging tool could not be started.
    #[error("failed to run {program}; is it installed?")]
    PackagerUnavailable {
        /// Name of the executable.
        program: &'static str,
        /// The spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The packaging tool ran but reported failure.
    #[error("dpkg-deb --build failed ({status}): {stderr}")]
    PackageBuildFailed {
        /// Exit status of the packaging tool.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::exit_status;

    #[test]
    fn invalid_tag_names_the_tag_and_keeps_source() {
        let source = semver::Version::parse("v1.0").expect_err("not semver");
        let err = PackagerError::InvalidTag {
            tag: "v1.0".to_owned(),
            source,
        };
        assert!(err.to_string().contains("\"v1.0\""));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn no_jar_asset_includes_tag() {
        let err = PackagerError::NoJarAsset {
            tag: "1.10.1".to_owned(),
        };
        assert_eq!(err.to_string(), "release 1.10.1 has no .jar asset");
    }

    #[test]
    fn link_collision_includes_path() {
        let err = PackagerError::LinkCollision {
            path: Utf8PathBuf::from("/pkg/usr/share/vineflower/vineflower.jar"),
        };
        assert!(err.to_string().contains("vineflower.jar"));
    }

    #[test]
    fn package_build_failed_includes_stderr() {
        let err = PackagerError::PackageBuildFailed {
            status: exit_status(2),
            stderr: "dpkg-deb: error: control file missing".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dpkg-deb --build failed"));
        assert!(msg.contains("control file missing"));
    }

    #[test]
    fn download_errors_display_transparently() {
        let err = PackagerError::from(DownloadError::NotFound {
            url: "https://example.test/releases".to_owned(),
        });
        assert_eq!(err.to_string(), "not found: https://example.test/releases");
    }

    #[test]
    fn packager_unavailable_preserves_source() {
        let err = PackagerError::PackagerUnavailable {
            program: "dpkg-deb",
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("dpkg-deb"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
