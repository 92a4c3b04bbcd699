//! modbuild - a build front end for C++ projects using modules
//!
//! This crate provides the core library functionality for modbuild: the
//! configuration language, module resolution, build planning and
//! execution.

pub mod builder;
pub mod core;
pub mod ops;
pub mod parser;
pub mod resolver;
pub mod util;

/// Test utilities and mocks for modbuild unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations of the glob, process
/// and system header collaborators.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildError, BuildPlan};
pub use core::config::{BuildMode, ResolvedConfig};
pub use parser::{load_config, parse_config, ConfigError};
pub use util::context::GlobalContext;
