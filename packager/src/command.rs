//! External command execution.
//!
//! The packaging tool is the only subprocess the packager runs. Routing it
//! through [`CommandExecutor`] lets tests observe the exact invocation without
//! spawning anything.

use crate::error::Result;
use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vineflower_packager::command::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("dpkg-deb", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), vineflower_packager::error::PackagerError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system, capturing stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        Ok(Command::new(cmd).args(args).output()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PackagerError;

    #[cfg(unix)]
    #[test]
    fn system_executor_captures_output() {
        let output = SystemCommandExecutor
            .run("sh", &["-c", "printf out; printf err >&2"])
            .expect("sh is available on unix hosts");
        assert!(output.status.success());
        assert_eq!(output.stdout, b"out");
        assert_eq!(output.stderr, b"err");
    }

    #[test]
    fn system_executor_reports_missing_program() {
        let err = SystemCommandExecutor
            .run("vineflower-packager-no-such-program", &[])
            .expect_err("program should not exist");
        assert!(matches!(err, PackagerError::Io(e) if e.kind() == std::io::ErrorKind::NotFound));
    }
}
