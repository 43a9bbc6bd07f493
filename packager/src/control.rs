//! `DEBIAN/control` version rewriting.
//!
//! The control file is treated as opaque text: only lines beginning with
//! `Version:` are touched, every other byte (line endings included) is
//! written back unchanged.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use regex::{NoExpand, Regex};
use std::fs;
use std::sync::LazyLock;

static VERSION_LINE: LazyLock<Regex> = LazyLock::new(version_line_pattern);

#[expect(clippy::expect_used, reason = "the pattern is a compile-time literal")]
fn version_line_pattern() -> Regex {
    Regex::new(r"(?mR)^Version:.*$").expect("version line pattern is valid")
}

/// How many `Version:` lines a patch rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplaceMode {
    /// Rewrite only the first `Version:` line.
    First,
    /// Rewrite every `Version:` line.
    #[default]
    All,
}

/// The outcome of patching control text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPatch {
    /// The patched text.
    pub text: String,
    /// Number of lines rewritten; zero means the text is unchanged.
    pub replacements: usize,
}

/// Rewrite `Version:` lines in `text` to carry `version`.
///
/// `version` is inserted literally. A document without a `Version:` line is
/// returned unchanged with `replacements == 0`.
///
/// # Examples
///
/// ```
/// use vineflower_packager::control::{ReplaceMode, patch_version};
///
/// let patch = patch_version("Package: vineflower\nVersion: 0.0.1\n", "2.5.0", ReplaceMode::All);
/// assert_eq!(patch.text, "Package: vineflower\nVersion: 2.5.0\n");
/// assert_eq!(patch.replacements, 1);
/// ```
#[must_use]
pub fn patch_version(text: &str, version: &str, mode: ReplaceMode) -> ControlPatch {
    let limit = match mode {
        ReplaceMode::First => 1,
        ReplaceMode::All => 0,
    };
    let found = VERSION_LINE.find_iter(text).count();
    let replacements = if limit == 0 { found } else { found.min(limit) };

    let line = format!("Version: {version}");
    let text = VERSION_LINE
        .replacen(text, limit, NoExpand(&line))
        .into_owned();

    ControlPatch { text, replacements }
}

/// Read the control file at `path`, patch it, and write it back in full.
///
/// # Errors
///
/// Returns [`PackagerError::ControlFile`] if the file cannot be read or
/// written.
pub fn patch_control_file(path: &Utf8Path, version: &str, mode: ReplaceMode) -> Result<ControlPatch> {
    let to_error = |source| PackagerError::ControlFile {
        path: path.to_owned(),
        source,
    };
    let original = fs::read_to_string(path).map_err(to_error)?;
    let patch = patch_version(&original, version, mode);
    fs::write(path, &patch.text).map_err(to_error)?;
    Ok(patch)
}
