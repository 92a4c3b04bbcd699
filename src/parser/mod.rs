//! Configuration language front end.
//!
//! A document goes through three stages: lexical validation ([`lexer`]),
//! grouping into attribute blocks ([`blocks`]) and binding against the
//! schema registry ([`binder`]). Each stage either hands its output to the
//! next or stops with a [`ConfigError`].

pub mod binder;
pub mod blocks;
pub mod errors;
pub mod lexer;

use std::path::Path;

use anyhow::Result;

use crate::core::config::ResolvedConfig;
use crate::util::fs::read_to_string;

pub use errors::ConfigError;

/// Parse a configuration document into a validated configuration.
///
/// Parsing is pure: the same text always yields the same result.
pub fn parse_config(source: &str) -> Result<ResolvedConfig, ConfigError> {
    let lines = lexer::validate(source)?;
    let blocks = blocks::extract(lines)?;
    binder::bind(&blocks)
}

/// Read and parse a configuration file.
///
/// A [`ConfigError`] stays downcastable from the returned error.
pub fn load_config(path: &Path) -> Result<ResolvedConfig> {
    let source = read_to_string(path)?;
    tracing::debug!("parsing {}", path.display());
    let config = parse_config(&source)?;
    Ok(config)
}
