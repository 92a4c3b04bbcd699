//! Test utilities and mocks for modbuild unit tests.
//!
//! The planner and the executor reach the outside world through three
//! seams: [`FileGlob`], [`CommandRunner`] and [`SystemHeaderLocator`]. The
//! mocks here stand in for each of them.
//!
//! # Example
//!
//! ```rust,ignore
//! use modbuild::test_support::{MockGlob, MockRunner};
//!
//! let glob = MockGlob::new().with("ifc/*.cppm", &["ifc/math.cppm"]);
//! let runner = MockRunner::new().fail_when(CommandPattern::Contains("math".into()), 1);
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::builder::intrinsics::SystemHeaderLocator;
use crate::util::fs::FileGlob;
use crate::util::process::CommandRunner;

/// Pattern for matching command lines in [`MockRunner`].
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on the space-joined command line.
    Exact(String),
    /// Match if the command line starts with prefix.
    StartsWith(String),
    /// Match if the command line contains substring.
    Contains(String),
    /// Match using a regex pattern.
    Regex(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command line.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
            CommandPattern::Any => true,
        }
    }
}

/// Command runner that records every invocation instead of spawning it.
///
/// Commands exit with 0 unless a scripted status matches. The first
/// matching script wins.
#[derive(Debug, Default)]
pub struct MockRunner {
    scripts: Vec<(CommandPattern, i32)>,
    calls: Mutex<Vec<Vec<String>>>,
    spawn_error: Option<String>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with `status` for commands matching `pattern`.
    pub fn fail_when(mut self, pattern: CommandPattern, status: i32) -> Self {
        self.scripts.push((pattern, status));
        self
    }

    /// Fail to start any command, as if the program was not installed.
    pub fn unspawnable(mut self, message: impl Into<String>) -> Self {
        self.spawn_error = Some(message.into());
        self
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of commands run so far.
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, argv: &[String]) -> Result<i32> {
        if let Some(message) = &self.spawn_error {
            bail!("{}", message);
        }
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(argv.to_vec());
        }

        let cmd = argv.join(" ");
        Ok(self
            .scripts
            .iter()
            .find(|(pattern, _)| pattern.matches(&cmd))
            .map(|(_, status)| *status)
            .unwrap_or(0))
    }
}

/// In-memory glob expansion.
///
/// Unknown patterns match nothing.
#[derive(Debug, Clone, Default)]
pub struct MockGlob {
    matches: HashMap<PathBuf, Vec<PathBuf>>,
    failing: Vec<PathBuf>,
}

impl MockGlob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `pattern` expand to `paths`.
    pub fn with(mut self, pattern: impl AsRef<Path>, paths: &[&str]) -> Self {
        self.matches.insert(
            pattern.as_ref().to_path_buf(),
            paths.iter().map(PathBuf::from).collect(),
        );
        self
    }

    /// Make expanding `pattern` fail.
    pub fn failing(mut self, pattern: impl AsRef<Path>) -> Self {
        self.failing.push(pattern.as_ref().to_path_buf());
        self
    }
}

impl FileGlob for MockGlob {
    fn expand(&self, pattern: &Path) -> Result<Vec<PathBuf>> {
        if self.failing.iter().any(|p| p == pattern) {
            bail!("invalid pattern `{}`", pattern.display());
        }
        Ok(self.matches.get(pattern).cloned().unwrap_or_default())
    }
}

/// Header locator with a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct MockHeaderLocator {
    found: Option<PathBuf>,
}

impl MockHeaderLocator {
    pub fn found(path: impl AsRef<Path>) -> Self {
        MockHeaderLocator {
            found: Some(path.as_ref().to_path_buf()),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

impl SystemHeaderLocator for MockHeaderLocator {
    fn locate(&self, _candidates: &[PathBuf]) -> Option<PathBuf> {
        self.found.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_pattern_matching() {
        let cmd = "clang++ -std=c++20 --precompile -o build/math.pcm ifc/math.cppm";
        assert!(CommandPattern::StartsWith("clang++".into()).matches(cmd));
        assert!(CommandPattern::Contains("--precompile".into()).matches(cmd));
        assert!(CommandPattern::Regex(r"-o \S+\.pcm".into()).matches(cmd));
        assert!(!CommandPattern::Exact("clang++".into()).matches(cmd));
        assert!(CommandPattern::Any.matches(""));
    }

    #[test]
    fn test_mock_runner_records_and_scripts() {
        let runner = MockRunner::new().fail_when(CommandPattern::Contains("bad".into()), 2);

        assert_eq!(runner.run(&["cc".into(), "good.cpp".into()]).unwrap(), 0);
        assert_eq!(runner.run(&["cc".into(), "bad.cpp".into()]).unwrap(), 2);
        assert_eq!(runner.call_count(), 2);
        assert_eq!(runner.calls()[1], vec!["cc", "bad.cpp"]);
    }

    #[test]
    fn test_mock_glob() {
        let glob = MockGlob::new()
            .with("src/*.cpp", &["src/a.cpp"])
            .failing("bad/*");
        assert_eq!(
            glob.expand(Path::new("src/*.cpp")).unwrap(),
            vec![PathBuf::from("src/a.cpp")]
        );
        assert!(glob.expand(Path::new("other/*")).unwrap().is_empty());
        assert!(glob.expand(Path::new("bad/*")).is_err());
    }
}
