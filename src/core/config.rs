//! Typed configuration produced by the schema binder.
//!
//! One struct per registry attribute. Each starts from the defaults below and
//! is overwritten property by property as the binder walks a block. Once a
//! `ResolvedConfig` exists its values are fully validated.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::language::{CppCompiler, CppStandard, StdLib};
use crate::core::module_unit::ModuleDeclaration;
use crate::core::schema::AttributeKind;

/// `[[#project]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    pub name: String,
    pub authors: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            name: "new_project".to_string(),
            authors: Vec::new(),
        }
    }
}

/// `[[#compiler]]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompilerConfig {
    pub cpp_compiler: CppCompiler,
    pub extra_args: Vec<String>,
    /// User supplied include path for the system headers
    pub system_headers_path: Option<PathBuf>,
}

/// `[[#language]]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanguageConfig {
    pub cpp_standard: CppStandard,
    pub std_lib: Option<StdLib>,
    pub modules: bool,
}

/// `[[#build]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            output_dir: PathBuf::from("build"),
        }
    }
}

/// `[[#modules]]`
///
/// An empty base directory means the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModulesConfig {
    pub base_ifcs_dir: PathBuf,
    pub interfaces: Vec<ModuleDeclaration>,
    pub base_impls_dir: PathBuf,
    pub implementations: Vec<ModuleDeclaration>,
}

/// Settings shared by the two final link targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetConfig {
    /// Output file name, without platform extension
    pub name: String,
    pub sources_base_path: PathBuf,
    pub sources: Vec<String>,
    /// Run the produced binary after a successful build
    pub auto_run: bool,
    pub extra_args: Vec<String>,
}

impl TargetConfig {
    fn named(name: &str) -> Self {
        TargetConfig {
            name: name.to_string(),
            sources_base_path: PathBuf::new(),
            sources: Vec::new(),
            auto_run: false,
            extra_args: Vec::new(),
        }
    }
}

/// `[[#executable]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutableConfig(pub TargetConfig);

impl Default for ExecutableConfig {
    fn default() -> Self {
        ExecutableConfig(TargetConfig::named("main"))
    }
}

/// `[[#tests]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestsConfig(pub TargetConfig);

impl Default for TestsConfig {
    fn default() -> Self {
        TestsConfig(TargetConfig::named("proj_tests"))
    }
}

/// Which final artifact a build produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Executable,
    Tests,
}

/// The fully validated configuration, one value per registry attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub project: ProjectConfig,
    pub compiler: CompilerConfig,
    pub language: LanguageConfig,
    pub build: BuildConfig,
    pub modules: ModulesConfig,
    pub executable: ExecutableConfig,
    pub tests: TestsConfig,
    /// Attributes that were written in the document (the rest hold defaults)
    pub declared: Vec<AttributeKind>,
}

impl ResolvedConfig {
    /// Whether the attribute was present in the source document.
    pub fn is_declared(&self, kind: AttributeKind) -> bool {
        self.declared.contains(&kind)
    }

    /// The link target for the requested build mode.
    pub fn target(&self, mode: BuildMode) -> &TargetConfig {
        match mode {
            BuildMode::Executable => &self.executable.0,
            BuildMode::Tests => &self.tests.0,
        }
    }
}
