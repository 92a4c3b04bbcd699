//! Module declarations and the units resolved from them.
//!
//! A declaration is one `;`-separated item of the `interfaces` or
//! `implementations` property: either a bare file name (possibly a glob) or
//! `file=[dep, dep, ...]`, naming the module interfaces the file depends on.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One declared interface or implementation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    /// File name or glob pattern, relative to the base directory
    pub file: String,
    /// Explicit dependency list, if the `file=[...]` form was used
    pub dependencies: Option<Vec<String>>,
}

impl ModuleDeclaration {
    /// A bare declaration without explicit dependencies.
    pub fn bare(file: impl Into<String>) -> Self {
        ModuleDeclaration {
            file: file.into(),
            dependencies: None,
        }
    }

    /// Parse a single declaration item.
    ///
    /// Whitespace around the file and around each dependency name is ignored.
    /// Returns `None` when the bracket form is malformed (no closing `]`,
    /// an empty file name, or an empty dependency name).
    pub fn parse(item: &str) -> Option<Self> {
        let item = item.trim();
        match item.split_once("=[") {
            None => {
                if item.is_empty() || item.contains(['[', ']', '=']) {
                    return None;
                }
                Some(ModuleDeclaration::bare(item))
            }
            Some((file, rest)) => {
                let file = file.trim();
                let deps = rest.trim_end().strip_suffix(']')?;
                if file.is_empty() || deps.contains(['[', ']']) {
                    return None;
                }
                let dependencies = if deps.trim().is_empty() {
                    Vec::new()
                } else {
                    deps.split(',')
                        .map(|d| d.trim().to_string())
                        .collect::<Vec<_>>()
                };
                if dependencies.iter().any(|d| d.is_empty()) {
                    return None;
                }
                Some(ModuleDeclaration {
                    file: file.to_string(),
                    dependencies: Some(dependencies),
                })
            }
        }
    }

    /// Whether the file part is a glob pattern to be expanded.
    pub fn is_pattern(&self) -> bool {
        self.file.contains(['*', '?'])
    }
}

impl fmt::Display for ModuleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dependencies {
            Some(deps) => write!(f, "{}=[{}]", self.file, deps.join(", ")),
            None => f.write_str(&self.file),
        }
    }
}

/// A module interface unit to be precompiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleUnit {
    pub source_path: PathBuf,
    /// Names of the interfaces this one imports
    pub dependencies: Vec<String>,
}

impl ModuleUnit {
    /// The module name derived from the source file name.
    pub fn name(&self) -> String {
        module_name(&self.source_path)
    }
}

/// A module implementation unit, bound to the interfaces it implements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleImplUnit {
    pub source_path: PathBuf,
    /// Interface names; never empty
    pub dependencies: Vec<String>,
}

impl ModuleImplUnit {
    /// Base name used for the object artifact.
    pub fn name(&self) -> String {
        module_name(&self.source_path)
    }
}

/// The file name of `path` up to its first `.`.
///
/// `src/inner/math.partition.cppm` names the module `math`.
pub fn module_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .and_then(|n| n.split('.').next().map(str::to_string))
        .unwrap_or_default()
}
