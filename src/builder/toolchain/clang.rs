//! Clang toolchain.

use std::path::Path;

use crate::builder::platform::Platform;
use crate::builder::toolchain::{path_arg, CommandSpec, CompileInput, LinkInput, Toolchain};
use crate::core::config::ResolvedConfig;
use crate::core::language::CppCompiler;

/// Extension that makes clang treat a source as a module interface.
const INTERFACE_SOURCE_EXTENSION: &str = ".cppm";

/// Clang with C++ modules support.
#[derive(Debug, Clone)]
pub struct ClangToolchain {
    program: String,
    /// `-std`, stdlib and platform module flags, then the user's extra args
    base_args: Vec<String>,
}

impl ClangToolchain {
    /// Build the shared flags from the language and compiler settings.
    ///
    /// On platforms that need intrinsics the standard library is reached
    /// through the generated module map at `module_map`; elsewhere clang
    /// finds the system module maps on its own.
    pub fn new(config: &ResolvedConfig, platform: Platform, module_map: &Path) -> Self {
        let language = &config.language;
        let mut base_args = vec![language.cpp_standard.as_flag()];

        if platform.needs_intrinsics() {
            if language.modules {
                base_args.push("-fimplicit-modules".to_string());
                base_args.push(format!("-fmodule-map-file={}", path_arg(module_map)));
            }
        } else {
            if let Some(std_lib) = language.std_lib {
                base_args.push(std_lib.as_flag());
            }
            if language.modules {
                base_args.push("-fimplicit-modules".to_string());
                base_args.push("-fimplicit-module-maps".to_string());
            }
        }

        base_args.extend(config.compiler.extra_args.iter().cloned());

        ClangToolchain {
            program: CppCompiler::Clang.as_str().to_string(),
            base_args,
        }
    }

    fn module_file_args(input: &CompileInput) -> impl Iterator<Item = String> + '_ {
        input
            .module_files
            .iter()
            .map(|pcm| format!("-fmodule-file={}", path_arg(pcm)))
    }
}

impl Toolchain for ClangToolchain {
    fn compiler(&self) -> CppCompiler {
        CppCompiler::Clang
    }

    fn base_command(&self) -> CommandSpec {
        CommandSpec::new(&self.program).args(self.base_args.iter().cloned())
    }

    fn precompile_command(&self, input: &CompileInput) -> CommandSpec {
        let mut cmd = self
            .base_command()
            .arg("--precompile")
            .args(Self::module_file_args(input))
            .arg("-o")
            .arg(path_arg(&input.output));

        let source = path_arg(&input.source);
        if !source.ends_with(INTERFACE_SOURCE_EXTENSION) {
            cmd = cmd.args(["-Xclang", "-emit-module-interface", "-x", "c++-module"]);
        }

        cmd.arg(source)
    }

    fn compile_command(&self, input: &CompileInput) -> CommandSpec {
        self.base_command()
            .arg("-c")
            .arg(path_arg(&input.source))
            .arg("-o")
            .arg(path_arg(&input.output))
            .args(Self::module_file_args(input))
    }

    fn link_command(&self, input: &LinkInput) -> CommandSpec {
        let mut cmd = self
            .base_command()
            .args(input.extra_args.iter().cloned())
            .arg("-o")
            .arg(path_arg(&input.output))
            .args(input.sources.iter().map(|p| path_arg(p)))
            .args(input.interfaces.iter().map(|p| path_arg(p)))
            .args(input.objects.iter().map(|p| path_arg(p)));

        if let Some(dir) = &input.prebuilt_module_path {
            cmd = cmd.arg(format!("-fprebuilt-module-path={}", path_arg(dir)));
        }

        cmd
    }

    fn interface_extension(&self) -> &str {
        "pcm"
    }

    fn object_extension(&self) -> &str {
        "o"
    }
}
