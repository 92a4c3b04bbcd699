//! Global context for modbuild operations.
//!
//! Holds the working directory and output preferences, and knows how to find
//! the project's configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Name of the configuration file looked up from the working directory.
pub const CONFIG_FILE_NAME: &str = "modbuild.conf";

/// No configuration file in the working directory or any of its parents.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("could not find `modbuild.conf` in `{}` or any parent directory", .dir.display())]
#[diagnostic(code(modbuild::context::config_not_found))]
pub struct ConfigNotFound {
    pub dir: PathBuf,
}

impl ConfigNotFound {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string()).with_suggestion(suggestions::NO_CONFIG)
    }
}

/// Global context containing paths and output settings.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Explicit configuration file, bypassing discovery
    config_path: Option<PathBuf>,

    verbose: bool,
    color: bool,
}

impl GlobalContext {
    /// Create a context rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a context with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            config_path: None,
            verbose: false,
            color: true,
        }
    }

    /// Use `path` instead of searching for the configuration file.
    ///
    /// Relative paths are taken from the working directory.
    pub fn set_config_path(&mut self, path: PathBuf) {
        self.config_path = Some(self.cwd.join(path));
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Find the configuration file, starting from cwd and searching upward.
    pub fn find_config(&self) -> Result<PathBuf, ConfigNotFound> {
        if let Some(path) = &self.config_path {
            return if path.is_file() {
                Ok(path.clone())
            } else {
                Err(ConfigNotFound {
                    dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
                })
            };
        }

        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                tracing::debug!("using {}", candidate.display());
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(ConfigNotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }

    /// The project root: the directory holding the configuration file.
    pub fn project_root(&self) -> Result<PathBuf, ConfigNotFound> {
        let config = self.find_config()?;
        Ok(config
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_cwd() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config, "[[#project]]\nname: x\n").unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf());
        assert_eq!(ctx.find_config().ok(), Some(config));
        assert_eq!(ctx.project_root().ok(), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_find_config_searches_upward() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config, "").unwrap();
        let nested = tmp.path().join("src").join("inner");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested);
        assert_eq!(ctx.find_config().ok(), Some(config));
    }

    #[test]
    fn test_explicit_config_path() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("other.conf"), "").unwrap();

        let mut ctx = GlobalContext::with_cwd(tmp.path().to_path_buf());
        ctx.set_config_path(PathBuf::from("other.conf"));
        assert_eq!(ctx.find_config().ok(), Some(tmp.path().join("other.conf")));

        ctx.set_config_path(PathBuf::from("missing.conf"));
        assert!(ctx.find_config().is_err());
    }

    #[test]
    fn test_config_not_found_diagnostic() {
        let err = ConfigNotFound {
            dir: PathBuf::from("/work"),
        };
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("could not find `modbuild.conf`"));
        assert!(output.contains("--config"));
    }
}
