//! Packaging pipeline orchestration.
//!
//! Runs the six stages in order (clean, resolve, fetch, stage, patch, build),
//! each one a standalone function taking explicit inputs. Progress goes to the
//! injected writer; nothing already done is rolled back when a later stage
//! fails.

use crate::builder::{PackageBuilder, package_filename};
use crate::cleaner::{ARTIFACT_EXTENSION, clean_artifacts_with};
use crate::command::CommandExecutor;
use crate::control::{ControlPatch, ReplaceMode, patch_control_file};
use crate::error::{PackagerError, Result};
use crate::github::ReleaseSource;
use crate::output::write_stderr_line;
use crate::release::{Asset, Release, find_jar_asset, resolve_latest};
use crate::stager::{StagedArtifact, Stager};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::fs;
use std::io::Write;

/// Location of the staged artifact relative to the package root.
pub const STAGING_SUBDIR: &str = "usr/share/vineflower";

/// Location of the control file relative to the package root.
pub const CONTROL_SUBPATH: &str = "DEBIAN/control";

/// Inputs for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the Debian package tree handed to `dpkg-deb`.
    pub package_root: Utf8PathBuf,
    /// Directory receiving the built archive.
    pub output_dir: Utf8PathBuf,
    /// Suppress progress output.
    pub quiet: bool,
}

impl PipelineConfig {
    /// Directory holding the artifact and its stable link.
    #[must_use]
    pub fn staging_dir(&self) -> Utf8PathBuf {
        self.package_root.join(STAGING_SUBDIR)
    }

    /// Path of the `DEBIAN/control` file.
    #[must_use]
    pub fn control_path(&self) -> Utf8PathBuf {
        self.package_root.join(CONTROL_SUBPATH)
    }

    /// Path of the archive built for `tag`.
    #[must_use]
    pub fn package_path(&self, tag: &str) -> Utf8PathBuf {
        self.output_dir.join(package_filename(tag))
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The release that was packaged.
    pub release: Release,
    /// Stale artifacts removed before staging.
    pub removed: Vec<Utf8PathBuf>,
    /// The staged artifact and its link.
    pub staged: StagedArtifact,
    /// The control-file rewrite.
    pub control_patch: ControlPatch,
    /// The built archive.
    pub package_path: Utf8PathBuf,
}

/// Resolve the latest release and its jar asset without touching the disk.
///
/// # Errors
///
/// Returns an error if either listing cannot be fetched or the release tags
/// are invalid. A release without a jar asset yields `Ok((release, None))`.
pub fn plan_release(source: &dyn ReleaseSource) -> Result<(Release, Option<Asset>)> {
    let release = resolve_latest(source)?;
    let asset = find_jar_asset(source, release.id)?;
    Ok((release, asset))
}

/// Run the full packaging pipeline.
///
/// # Errors
///
/// Returns the first stage failure. A release without a `.jar` asset fails
/// with [`PackagerError::NoJarAsset`] before anything is downloaded.
pub fn run_pipeline(
    config: &PipelineConfig,
    source: &dyn ReleaseSource,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<PipelineOutcome> {
    // Step 1: Reset the staging directory.
    let stager = Stager::new(config.staging_dir());
    stager.prepare()?;
    let removed = clean_artifacts_with(stager.staging_path(), ARTIFACT_EXTENSION, |path| {
        progress(config, stderr, format!("Cleaning old jar: {path}"));
    })?;

    // Step 2: Resolve the newest release.
    let release = resolve_latest(source)?;
    progress(
        config,
        stderr,
        format!(
            "Found latest Vineflower version: v{} ({})",
            release.raw_tag, release.id
        ),
    );

    // Step 3: Locate and download the jar.
    let asset = require_jar_asset(source, &release)?;
    progress(config, stderr, format!("Found JAR asset: {}", asset.name));
    progress(config, stderr, "Downloading JAR...");
    let bytes = source.download(&asset.download_url)?;

    // Step 4: Stage it under its own name plus the stable link.
    debug!("staging {} into {}", asset.name, stager.staging_path());
    let staged = stager.stage(&asset.name, &bytes)?;
    progress(config, stderr, "Written JAR bytes to file.");
    progress(
        config,
        stderr,
        format!("Created symlink to {}.", staged.link_path),
    );

    // Step 5: Patch the control file.
    let control_patch = update_control(&config.control_path(), &release.raw_tag)?;
    progress(config, stderr, "Updated control file.");

    // Step 6: Build the archive.
    progress(config, stderr, "Building package...");
    fs::create_dir_all(&config.output_dir)?;
    let package_path = PackageBuilder::new(executor)
        .build(&config.package_root, &config.package_path(&release.raw_tag))?;
    progress(config, stderr, "Package built!");

    Ok(PipelineOutcome {
        release,
        removed,
        staged,
        control_patch,
        package_path,
    })
}

fn progress(config: &PipelineConfig, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !config.quiet {
        write_stderr_line(stderr, message);
    }
}

fn require_jar_asset(source: &dyn ReleaseSource, release: &Release) -> Result<Asset> {
    find_jar_asset(source, release.id)?.ok_or_else(|| PackagerError::NoJarAsset {
        tag: release.raw_tag.clone(),
    })
}

fn update_control(control_path: &Utf8Path, version: &str) -> Result<ControlPatch> {
    let patch = patch_control_file(control_path, version, ReplaceMode::All)?;
    if patch.replacements == 0 {
        warn!("{control_path} has no Version: line; left unchanged");
    } else {
        debug!("rewrote {} Version: line(s) in {control_path}", patch.replacements);
    }
    Ok(patch)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
