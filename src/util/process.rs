//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{bail, Context, Result};

/// Runs one external command to completion.
///
/// `argv[0]` is the program. The returned value is the exit status; a
/// process killed by a signal reports `-1`.
pub trait CommandRunner {
    fn run(&self, argv: &[String]) -> Result<i32>;
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute with inherited stdio and return the exit status.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();
        let status = cmd
            .status()
            .with_context(|| format!("failed to execute `{}`", self.program.display()))?;
        Ok(status)
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// [`CommandRunner`] that spawns real processes from the project root.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    cwd: PathBuf,
}

impl ProcessRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        ProcessRunner { cwd: cwd.into() }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, argv: &[String]) -> Result<i32> {
        let Some((program, args)) = argv.split_first() else {
            bail!("cannot run an empty command line");
        };

        let process = ProcessBuilder::new(program).args(args).cwd(&self.cwd);
        tracing::debug!("running `{}`", process.display_command());

        let status = process.status()?;
        Ok(status.code().unwrap_or(-1))
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Render an argument vector as a single shell-like line.
pub fn display_argv(argv: &[String]) -> String {
    argv.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("clang++").args(["-std=c++20", "-c", "math.cpp"]);
        assert_eq!(pb.display_command(), "clang++ -std=c++20 -c math.cpp");
    }

    #[test]
    fn test_empty_argv_is_rejected() {
        let runner = ProcessRunner::new(".");
        assert!(runner.run(&[]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_runner_reports_exit_status() {
        let runner = ProcessRunner::new(std::env::temp_dir());
        let ok = runner.run(&["true".to_string()]).unwrap();
        let failed = runner.run(&["false".to_string()]).unwrap();
        assert_eq!(ok, 0);
        assert_ne!(failed, 0);
    }

    #[test]
    fn test_missing_program() {
        let runner = ProcessRunner::new(".");
        let result = runner.run(&["modbuild-definitely-not-a-program".to_string()]);
        assert!(result.is_err());
    }
}
