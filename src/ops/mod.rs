//! High-level operations.
//!
//! This module contains the implementation of modbuild commands.

pub mod build;

pub use build::{build, build_config, BuildOptions, BuildResult, Collaborators};
