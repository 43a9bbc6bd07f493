//! Debian package assembly with `dpkg-deb`.
//!
//! The package root already mirrors the installed layout by the time this
//! module runs; building is a single `dpkg-deb --build` invocation.

use crate::command::CommandExecutor;
use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

/// The packaging executable.
pub const DPKG_DEB: &str = "dpkg-deb";

/// Stem of every produced archive name.
pub const PACKAGE_NAME: &str = "vineflower";

/// Compute the archive file name for a release tag.
///
/// # Examples
///
/// ```
/// use vineflower_packager::builder::package_filename;
///
/// assert_eq!(package_filename("1.10.1"), "vineflower-1.10.1.deb");
/// ```
#[must_use]
pub fn package_filename(tag: &str) -> String {
    format!("{PACKAGE_NAME}-{tag}.deb")
}

/// Runs `dpkg-deb` through an injected executor.
pub struct PackageBuilder<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> PackageBuilder<'a> {
    /// Create a builder that spawns commands through `executor`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }

    /// Build `package_root` into the archive at `output_path`.
    ///
    /// Captured stdout and stderr are logged at debug level only.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::PackagerUnavailable`] if `dpkg-deb` cannot be
    /// spawned and [`PackagerError::PackageBuildFailed`] if it exits with a
    /// non-zero status.
    pub fn build(&self, package_root: &Utf8Path, output_path: &Utf8Path) -> Result<Utf8PathBuf> {
        let args = ["--build", package_root.as_str(), output_path.as_str()];
        debug!("running {DPKG_DEB} {}", args.join(" "));

        let output = self.executor.run(DPKG_DEB, &args).map_err(|err| match err {
            PackagerError::Io(source) => PackagerError::PackagerUnavailable {
                program: DPKG_DEB,
                source,
            },
            other => other,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("{DPKG_DEB} stdout: {}", stdout.trim());
        debug!("{DPKG_DEB} stderr: {}", stderr.trim());

        if !output.status.success() {
            return Err(PackagerError::PackageBuildFailed {
                status: output.status,
                stderr: stderr.trim().to_owned(),
            });
        }

        Ok(output_path.to_owned())
    }
}
