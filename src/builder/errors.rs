//! Build error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::language::{CppCompiler, CppStandard};
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised while planning or running a build.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BuildError {
    #[error("`{compiler}` is not supported yet, only `clang++` can build modules")]
    #[diagnostic(code(modbuild::build::unsupported_compiler))]
    UnsupportedCompiler { compiler: CppCompiler },

    #[error("{feature} require at least C++{required}, but {selected} is selected")]
    #[diagnostic(code(modbuild::build::standard_too_low))]
    StandardLevelTooLow {
        required: u32,
        selected: CppStandard,
        feature: String,
    },

    #[error("could not find the system headers")]
    #[diagnostic(code(modbuild::build::system_headers))]
    SystemHeadersNotFound { candidates: Vec<PathBuf> },

    #[error("`{program}` exited with status {status}")]
    #[diagnostic(code(modbuild::build::command_failed))]
    ExternalCommandFailed {
        program: String,
        status: i32,
        command: String,
    },

    #[error("failed to expand `{pattern}`: {message}")]
    #[diagnostic(code(modbuild::build::glob))]
    Glob { pattern: String, message: String },

    #[error("I/O error at `{}`", .path.display())]
    #[diagnostic(code(modbuild::build::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: impl Into<std::io::Error>) -> Self {
        BuildError::Io {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Wrap a collaborator failure, keeping its I/O cause when there is one.
    pub(crate) fn io_from(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        let source = match err.downcast::<std::io::Error>() {
            Ok(io) => io,
            Err(other) => std::io::Error::other(format!("{:#}", other)),
        };
        BuildError::io(path, source)
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BuildError::UnsupportedCompiler { compiler } => {
                Diagnostic::error(format!("`{}` is not a supported compiler", compiler))
                    .with_context("module builds are only planned for `clang++`")
                    .with_suggestion("Set `cpp_compiler: clang++` in the `[[#compiler]]` block")
            }

            BuildError::StandardLevelTooLow {
                required,
                selected,
                feature,
            } => Diagnostic::error(format!(
                "{} require at least C++{}",
                feature, required
            ))
            .with_context(format!("the configured standard is {}", selected))
            .with_suggestion(format!(
                "Set `cpp_standard: {}` in the `[[#language]]` block",
                required
            )),

            BuildError::SystemHeadersNotFound { candidates } => {
                let mut diag = Diagnostic::error("could not find the system headers");
                for candidate in candidates {
                    diag = diag.with_context(format!("searched {}", candidate.display()));
                }
                diag.with_suggestion(suggestions::SYSTEM_HEADERS)
            }

            BuildError::ExternalCommandFailed {
                program,
                status,
                command,
            } => Diagnostic::error(format!("`{}` exited with status {}", program, status))
                .with_context(command.clone())
                .with_suggestion(suggestions::BUILD_FAILED),

            BuildError::Glob { pattern, message } => {
                Diagnostic::error(format!("could not expand `{}`", pattern))
                    .with_context(message.clone())
            }

            BuildError::Io { path, source } => {
                Diagnostic::error(format!("I/O error at `{}`", path.display()))
                    .with_context(source.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_too_low_message() {
        let err = BuildError::StandardLevelTooLow {
            required: 20,
            selected: CppStandard::Cpp17,
            feature: "modules".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "modules require at least C++20, but C++17 is selected"
        );
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("Set `cpp_standard: 20`"));
    }

    #[test]
    fn test_command_failed_diagnostic() {
        let err = BuildError::ExternalCommandFailed {
            program: "clang++".to_string(),
            status: 1,
            command: "clang++ -std=c++20 -c math.cpp".to_string(),
        };
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("`clang++` exited with status 1"));
        assert!(output.contains("clang++ -std=c++20 -c math.cpp"));
        assert!(output.contains("modbuild -v build"));
    }

    #[test]
    fn test_unsupported_compiler() {
        let err = BuildError::UnsupportedCompiler {
            compiler: CppCompiler::Gcc,
        };
        assert!(err.to_string().starts_with("`g++` is not supported"));
    }
}
