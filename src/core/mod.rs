//! Core data structures for modbuild.
//!
//! This module contains the foundational types used throughout the crate:
//! - The schema registry describing the configuration language
//! - Enumerated value domains (compilers, standards, standard libraries)
//! - The typed, validated configuration
//! - Module declarations and resolved module units

pub mod config;
pub mod language;
pub mod module_unit;
pub mod schema;

pub use config::{BuildMode, ResolvedConfig};
pub use language::{CppCompiler, CppStandard, StdLib};
pub use module_unit::{ModuleDeclaration, ModuleImplUnit, ModuleUnit};
pub use schema::{AttributeKind, AttributeSchema, PropertyKey, PropertySchema};
