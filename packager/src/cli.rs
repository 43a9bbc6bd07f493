//! CLI argument definitions for the Vineflower packager.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::github::{DEFAULT_REPOSITORY, DEFAULT_TIMEOUT};
use crate::pipeline::PipelineConfig;
use camino::Utf8PathBuf;
use clap::Parser;
use std::time::Duration;

/// Default Debian package tree, relative to the working directory.
pub const DEFAULT_PACKAGE_ROOT: &str = "src";

/// Default directory receiving the built archive.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Package the latest Vineflower release as a Debian archive.
#[derive(Parser, Debug, Clone)]
#[command(name = "vineflower-packager")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package the latest Vineflower release as a Debian archive.\n\n",
    "The packager asks GitHub for the newest Vineflower release, downloads its ",
    "jar into the package tree under usr/share/vineflower, links it as ",
    "vineflower.jar, stamps the release version into DEBIAN/control, and runs ",
    "`dpkg-deb --build` to produce vineflower-<version>.deb.\n\n",
    "Jars left over from earlier runs are removed before the new one is staged.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Package the latest release from ./src into the current directory:\n",
    "    $ vineflower-packager\n\n",
    "  Use another package tree and output directory:\n",
    "    $ vineflower-packager -p debian/root -o dist\n\n",
    "  Preview the release that would be packaged:\n",
    "    $ vineflower-packager --dry-run\n\n",
    "  Package a fork:\n",
    "    $ vineflower-packager --repo someone/vineflower\n\n",
    "For more information, see: https://github.com/Vineflower/vineflower",
))]
pub struct Cli {
    /// Root of the Debian package tree.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_PACKAGE_ROOT)]
    pub package_root: Utf8PathBuf,

    /// Directory the .deb is written to.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: Utf8PathBuf,

    /// Upstream GitHub repository.
    #[arg(
        long,
        value_name = "OWNER/NAME",
        default_value = DEFAULT_REPOSITORY,
        value_parser = parse_repository
    )]
    pub repo: String,

    /// Per-request HTTP timeout in seconds.
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Show the release that would be packaged and exit without changes.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Default for Cli {
    /// Creates a `Cli` matching an invocation with no arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use vineflower_packager::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert_eq!(cli.package_root, Utf8PathBuf::from("src"));
    /// assert_eq!(cli.repo, "Vineflower/vineflower");
    /// assert!(!cli.dry_run);
    /// ```
    fn default() -> Self {
        Self {
            package_root: Utf8PathBuf::from(DEFAULT_PACKAGE_ROOT),
            output_dir: Utf8PathBuf::from(DEFAULT_OUTPUT_DIR),
            repo: DEFAULT_REPOSITORY.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            dry_run: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

impl Cli {
    /// The HTTP timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pipeline inputs derived from the parsed flags.
    #[must_use]
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            package_root: self.package_root.clone(),
            output_dir: self.output_dir.clone(),
            quiet: self.quiet,
        }
    }
}

/// Validate an `owner/name` repository slug.
fn parse_repository(value: &str) -> Result<String, String> {
    let valid_part = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    match value.split_once('/') {
        Some((owner, name)) if valid_part(owner) && valid_part(name) => Ok(value.to_owned()),
        _ => Err(format!("expected OWNER/NAME, got `{value}`")),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
