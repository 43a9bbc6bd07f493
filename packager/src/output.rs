//! Output formatting for the packager CLI.
//!
//! Progress lines go to an injected writer (stderr in production) so tests
//! can capture them. This module also renders the dry-run report and the
//! final success message.

use crate::pipeline::PipelineOutcome;
use camino::Utf8Path;
use std::io::Write;

/// Write a line to stderr, ignoring write failures.
///
/// This is a best-effort logging helper for progress messages where write
/// failures should not abort the operation.
///
/// # Examples
///
/// ```
/// use vineflower_packager::output::write_stderr_line;
///
/// let mut buffer = Vec::new();
/// write_stderr_line(&mut buffer, "Building package...");
/// assert_eq!(buffer, b"Building package...\n");
/// ```
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a success message after the package is built.
#[must_use]
pub fn success_message(outcome: &PipelineOutcome) -> String {
    format!(
        "Packaged Vineflower {} as {}",
        outcome.release.raw_tag, outcome.package_path
    )
}

/// Configuration information for dry-run output.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use vineflower_packager::output::DryRunInfo;
///
/// let staging = Utf8PathBuf::from("src/usr/share/vineflower");
/// let control = Utf8PathBuf::from("src/DEBIAN/control");
/// let package = Utf8PathBuf::from("./vineflower-1.10.1.deb");
///
/// let info = DryRunInfo {
///     repository: "Vineflower/vineflower",
///     tag: "1.10.1",
///     release_id: 123,
///     asset_name: Some("vineflower-1.10.1.jar"),
///     staging_dir: &staging,
///     control_path: &control,
///     package_path: &package,
/// };
///
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("vineflower-1.10.1.jar"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// The `owner/name` upstream repository.
    pub repository: &'a str,
    /// Tag of the latest release.
    pub tag: &'a str,
    /// Host-assigned id of the latest release.
    pub release_id: u64,
    /// The jar asset that would be downloaded, if any.
    pub asset_name: Option<&'a str>,
    /// Directory the artifact would be staged in.
    pub staging_dir: &'a Utf8Path,
    /// Control file that would be patched.
    pub control_path: &'a Utf8Path,
    /// Archive that would be produced.
    pub package_path: &'a Utf8Path,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let asset = self.asset_name.unwrap_or("(none: no .jar asset published)");
        [
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Repository: {}", self.repository),
            format!("Latest release: v{} ({})", self.tag, self.release_id),
            format!("JAR asset: {asset}"),
            format!("Staging directory: {}", self.staging_dir),
            format!("Control file: {}", self.control_path),
            format!("Package: {}", self.package_path),
        ]
        .join("\n")
    }
}
