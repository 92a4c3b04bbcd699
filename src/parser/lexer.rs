//! Lexical validation of configuration documents.
//!
//! Every line is classified on its own. Blank lines and `#` comments are
//! dropped; attribute headers (`[[#name]]`) and properties (`name: value`)
//! survive in source order. Anything else is a format error pointing at the
//! offending line.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::errors::ConfigError;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\[#(\w+)\]\]$").expect("valid header regex"));

static PROPERTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+):(.*)$").expect("valid property regex"));

/// Marker that starts a comment line.
pub const COMMENT_MARKER: char = '#';

/// A line that survived lexical validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `[[#identifier]]`
    Header { number: usize, identifier: String },
    /// `name: value`; the value is trimmed and may be empty
    Property {
        number: usize,
        name: String,
        value: String,
    },
}

impl Line {
    /// 1-based line number in the source document.
    pub fn number(&self) -> usize {
        match self {
            Line::Header { number, .. } | Line::Property { number, .. } => *number,
        }
    }
}

/// Classify one raw line.
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn classify(number: usize, text: &str) -> Result<Option<Line>, ConfigError> {
    let trimmed = text.trim();

    if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
        return Ok(None);
    }

    if let Some(caps) = HEADER_RE.captures(trimmed) {
        return Ok(Some(Line::Header {
            number,
            identifier: caps[1].to_string(),
        }));
    }

    if let Some(caps) = PROPERTY_RE.captures(trimmed) {
        return Ok(Some(Line::Property {
            number,
            name: caps[1].to_string(),
            value: caps[2].trim().to_string(),
        }));
    }

    Err(ConfigError::FormatError {
        line_number: number,
        line_text: text.to_string(),
    })
}

/// Validate a whole document, returning the significant lines in order.
pub fn validate(source: &str) -> Result<Vec<Line>, ConfigError> {
    let mut lines = Vec::new();
    for (idx, text) in source.lines().enumerate() {
        if let Some(line) = classify(idx + 1, text)? {
            lines.push(line);
        }
    }
    tracing::debug!("{} significant line(s) in config", lines.len());
    Ok(lines)
}
