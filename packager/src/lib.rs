//! Vineflower Debian packager library.
//!
//! This crate turns the newest Vineflower release on GitHub into a Debian
//! archive: it stages the release jar into a package tree, stamps the version
//! into `DEBIAN/control`, and runs `dpkg-deb`. It is used by the
//! `vineflower-packager` CLI binary and can be driven programmatically with
//! substitute release sources and command executors.
//!
//! # Modules
//!
//! - [`builder`] - `dpkg-deb` invocation and archive naming
//! - [`cleaner`] - Removal of stale jars from the staging directory
//! - [`cli`] - Command-line argument definitions
//! - [`command`] - Subprocess execution seam
//! - [`control`] - `Version:` rewriting for Debian control files
//! - [`error`] - Error types for every pipeline stage
//! - [`github`] - GitHub release listing and asset download
//! - [`logging`] - Diagnostic logger setup
//! - [`output`] - Progress, dry-run, and success messages
//! - [`pipeline`] - Packaging pipeline orchestration
//! - [`release`] - Latest-release selection and jar asset lookup
//! - [`stager`] - Artifact staging and the stable `vineflower.jar` link

pub mod builder;
pub mod cleaner;
pub mod cli;
pub mod command;
pub mod control;
pub mod error;
pub mod github;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod release;
pub mod stager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
