//! Module dependency resolution.
//!
//! Turns the declared interfaces and implementations into compilation
//! units. Interfaces are always compiled as a phase before implementations,
//! so a dependency cited by name only has to be an interface that is
//! precompiled earlier; declaration order is kept and nothing is sorted.
//!
//! # Same-name convention
//!
//! An implementation declared without an explicit `=[...]` list depends on
//! exactly one interface: the one whose module name equals the
//! implementation's file name up to its first `.`. `src/math.cpp` binds to
//! the interface precompiled from `math.cppm`. Nothing checks that such an
//! interface exists; a dangling name surfaces as a compiler failure.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::errors::BuildError;
use crate::core::config::ModulesConfig;
use crate::core::module_unit::{module_name, ModuleDeclaration, ModuleImplUnit, ModuleUnit};
use crate::util::fs::FileGlob;

/// Interface and implementation units in compilation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleGraph {
    pub interfaces: Vec<ModuleUnit>,
    pub implementations: Vec<ModuleImplUnit>,
}

impl ModuleGraph {
    /// Names of the interfaces being precompiled, in order.
    pub fn interface_names(&self) -> Vec<String> {
        self.interfaces.iter().map(ModuleUnit::name).collect()
    }

    /// Dependency names that no declared interface provides.
    ///
    /// These are assumed to be prebuilt; the compiler reports them if not.
    pub fn external_dependencies(&self) -> Vec<String> {
        let known = self.interface_names();
        let mut external: Vec<String> = Vec::new();
        let cited = self
            .interfaces
            .iter()
            .flat_map(|u| &u.dependencies)
            .chain(self.implementations.iter().flat_map(|u| &u.dependencies));
        for name in cited {
            if !known.contains(name) && !external.contains(name) {
                external.push(name.clone());
            }
        }
        external
    }
}

/// Resolve the `[[#modules]]` declarations into compilation units.
pub fn resolve_modules(
    config: &ModulesConfig,
    glob: &dyn FileGlob,
) -> Result<ModuleGraph, BuildError> {
    let mut graph = ModuleGraph::default();

    for decl in &config.interfaces {
        for source_path in expand(&config.base_ifcs_dir, decl, glob)? {
            let dependencies = decl.dependencies.clone().unwrap_or_default();
            graph.interfaces.push(ModuleUnit {
                source_path,
                dependencies,
            });
        }
    }

    for decl in &config.implementations {
        for source_path in expand(&config.base_impls_dir, decl, glob)? {
            let dependencies = match &decl.dependencies {
                Some(deps) if !deps.is_empty() => deps.clone(),
                _ => vec![module_name(&source_path)],
            };
            graph.implementations.push(ModuleImplUnit {
                source_path,
                dependencies,
            });
        }
    }

    let external = graph.external_dependencies();
    if !external.is_empty() {
        tracing::debug!(
            "module(s) not declared as interfaces, assumed prebuilt: {}",
            external.join(", ")
        );
    }

    tracing::debug!(
        "resolved {} interface(s) and {} implementation(s)",
        graph.interfaces.len(),
        graph.implementations.len()
    );

    Ok(graph)
}

/// The source files a declaration stands for, under `base`.
fn expand(
    base: &Path,
    decl: &ModuleDeclaration,
    glob: &dyn FileGlob,
) -> Result<Vec<PathBuf>, BuildError> {
    let path = base.join(&decl.file);
    if !decl.is_pattern() {
        return Ok(vec![path]);
    }

    let matches = glob.expand(&path).map_err(|e| BuildError::Glob {
        pattern: path.display().to_string(),
        message: format!("{:#}", e),
    })?;
    if matches.is_empty() {
        tracing::warn!("`{}` matched no files", path.display());
    }
    Ok(matches)
}
