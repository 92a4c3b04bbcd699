//! Toolchain abstraction for module-aware C++ compilers.
//!
//! A toolchain turns planned work (precompile an interface, compile an
//! implementation, link a target) into concrete command lines. Only Clang
//! is implemented; the other compiler families recognised by the
//! configuration are rejected when the build context is created.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::errors::BuildError;
use crate::builder::platform::Platform;
use crate::core::config::ResolvedConfig;
use crate::core::language::CppCompiler;

mod clang;

pub use clang::ClangToolchain;

/// A command to execute: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// The program to run (e.g. `clang++`)
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// The full argument vector, program first.
    pub fn into_argv(self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program);
        argv.extend(self.args);
        argv
    }
}

/// Input for precompiling an interface or compiling an implementation.
#[derive(Debug, Clone)]
pub struct CompileInput {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Precompiled interfaces the unit imports
    pub module_files: Vec<PathBuf>,
}

/// Input for the final link.
#[derive(Debug, Clone, Default)]
pub struct LinkInput {
    pub output: PathBuf,
    /// Target specific flags, placed right after the shared flags
    pub extra_args: Vec<String>,
    /// Ordinary translation units
    pub sources: Vec<PathBuf>,
    /// Precompiled interfaces to fold in
    pub interfaces: Vec<PathBuf>,
    /// Compiled implementation units
    pub objects: Vec<PathBuf>,
    /// Where the linker may look for prebuilt modules
    pub prebuilt_module_path: Option<PathBuf>,
}

/// Trait for toolchain implementations.
pub trait Toolchain: Send + Sync {
    /// The compiler family this toolchain drives.
    fn compiler(&self) -> CppCompiler;

    /// Flags shared by every invocation, program included.
    fn base_command(&self) -> CommandSpec;

    /// Precompile a module interface unit.
    fn precompile_command(&self, input: &CompileInput) -> CommandSpec;

    /// Compile a module implementation unit to an object file.
    fn compile_command(&self, input: &CompileInput) -> CommandSpec;

    /// Link the final executable.
    fn link_command(&self, input: &LinkInput) -> CommandSpec;

    /// Extension of precompiled interfaces.
    fn interface_extension(&self) -> &str;

    /// Extension of object files.
    fn object_extension(&self) -> &str;
}

/// Pick the toolchain for the configured compiler.
pub fn toolchain_for(
    config: &ResolvedConfig,
    platform: Platform,
    module_map: &Path,
) -> Result<Box<dyn Toolchain>, BuildError> {
    match config.compiler.cpp_compiler {
        CppCompiler::Clang => Ok(Box::new(ClangToolchain::new(config, platform, module_map))),
        compiler @ (CppCompiler::Gcc | CppCompiler::Msvc) => {
            Err(BuildError::UnsupportedCompiler { compiler })
        }
    }
}

/// Render a path as a command-line argument, with forward slashes.
pub fn path_arg(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
