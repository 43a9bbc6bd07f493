//! Shared test utilities for the packager crate.

use crate::command::CommandExecutor;
use crate::error::{PackagerError, Result};
use crate::github::{DownloadError, ReleaseSource};
use crate::release::{Asset, ReleaseRecord};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code.unsigned_abs())
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "dpkg-deb").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<&'static str>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
    seen: RefCell<Vec<Vec<String>>>,
    check_args: bool,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
            seen: RefCell::new(Vec::new()),
            check_args: true,
        }
    }

    /// Creates a stub answering one call to `cmd` with `result`, whatever its
    /// arguments.
    ///
    /// Useful when the arguments embed temporary paths.
    #[must_use]
    pub fn answering(cmd: &'static str, result: Result<Output>) -> Self {
        Self {
            check_args: false,
            ..Self::new(vec![ExpectedCall {
                cmd,
                args: Vec::new(),
                result,
            }])
        }
    }

    /// Creates a stub that accepts any single invocation and succeeds.
    ///
    /// Use [`StubExecutor::invocations`] to inspect what was run.
    #[must_use]
    pub fn accepting() -> Self {
        Self::new(Vec::new())
    }

    /// Returns every invocation received so far, program name first.
    #[must_use]
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.seen.borrow().clone()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let mut invocation = vec![cmd.to_owned()];
        invocation.extend(args.iter().map(|arg| (*arg).to_owned()));
        self.seen.borrow_mut().push(invocation);

        let Some(call) = self.expected.borrow_mut().pop_front() else {
            return Ok(success_output());
        };

        if call.cmd != cmd || (self.check_args && call.args.as_slice() != args) {
            return Err(PackagerError::StubMismatch {
                message: format!(
                    "expected `{} {}`, got `{cmd} {}`",
                    call.cmd,
                    call.args.join(" "),
                    args.join(" ")
                ),
            });
        }

        call.result
    }
}

/// An in-memory release host.
///
/// Serves a fixed release listing, per-release asset listings, and artifact
/// bytes keyed by download URL. Unknown release ids and URLs answer with
/// [`DownloadError::NotFound`].
#[derive(Debug, Default)]
pub struct FakeReleaseSource {
    releases: Vec<ReleaseRecord>,
    assets: HashMap<u64, Vec<Asset>>,
    artifacts: HashMap<String, Vec<u8>>,
    downloads: RefCell<Vec<String>>,
}

impl FakeReleaseSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a release with its assets.
    #[must_use]
    pub fn with_release(mut self, id: u64, tag: &str, assets: Vec<Asset>) -> Self {
        self.releases.push(ReleaseRecord {
            id,
            tag_name: tag.to_owned(),
        });
        self.assets.insert(id, assets);
        self
    }

    /// Registers the bytes served for a download URL.
    #[must_use]
    pub fn with_artifact(mut self, url: &str, bytes: &[u8]) -> Self {
        self.artifacts.insert(url.to_owned(), bytes.to_vec());
        self
    }

    /// Returns the URLs downloaded so far.
    #[must_use]
    pub fn downloads(&self) -> Vec<String> {
        self.downloads.borrow().clone()
    }
}

impl ReleaseSource for FakeReleaseSource {
    fn list_releases(&self) -> Result<Vec<ReleaseRecord>> {
        Ok(self.releases.clone())
    }

    fn list_assets(&self, release_id: u64) -> Result<Vec<Asset>> {
        self.assets.get(&release_id).cloned().ok_or_else(|| {
            DownloadError::NotFound {
                url: format!("releases/{release_id}/assets"),
            }
            .into()
        })
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.downloads.borrow_mut().push(url.to_owned());
        self.artifacts.get(url).cloned().ok_or_else(|| {
            DownloadError::NotFound {
                url: url.to_owned(),
            }
            .into()
        })
    }
}

/// Builds an [`Asset`] whose download URL is derived from its name.
#[must_use]
pub fn asset(name: &str) -> Asset {
    Asset {
        name: name.to_owned(),
        download_url: format!("https://downloads.example.test/{name}"),
    }
}
