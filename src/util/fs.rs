//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{glob, Pattern};

/// Expands file patterns into the files they match.
///
/// Patterns and results are relative to the project root.
pub trait FileGlob {
    fn expand(&self, pattern: &Path) -> Result<Vec<PathBuf>>;
}

/// [`FileGlob`] over the real filesystem.
#[derive(Debug, Clone)]
pub struct FsGlob {
    root: PathBuf,
}

impl FsGlob {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsGlob { root: root.into() }
    }
}

impl FileGlob for FsGlob {
    fn expand(&self, pattern: &Path) -> Result<Vec<PathBuf>> {
        let pattern = pattern.to_string_lossy();
        let matches = glob_files(&self.root, &pattern)?;
        Ok(matches
            .into_iter()
            .map(|path| match path.strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => path,
            })
            .collect())
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Find the files matching a glob pattern relative to a base directory.
///
/// Matches come back sorted so that expansion order does not depend on the
/// directory listing order of the host. Only `pattern` is interpreted; glob
/// metacharacters in `base` match literally.
pub fn glob_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let escaped_base = Pattern::escape(&base.to_string_lossy());
    let full_pattern = Path::new(&escaped_base).join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let mut results = Vec::new();
    for entry in glob(&pattern_str).with_context(|| format!("invalid glob pattern: {}", pattern))? {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    results.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}
