//! Grouping of validated lines into attribute blocks.

use std::collections::HashMap;

use crate::core::schema::AttributeKind;
use crate::parser::errors::ConfigError;
use crate::parser::lexer::Line;

/// One `name: value` pair as written in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProperty {
    pub name: String,
    pub value: String,
    pub line: usize,
}

/// An attribute header and its properties, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBlock {
    pub kind: AttributeKind,
    pub line: usize,
    pub properties: Vec<RawProperty>,
}

impl AttributeBlock {
    /// Names of the properties present, in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }
}

/// Blocks keyed by attribute, local to a single parse.
pub type BlockMap = HashMap<AttributeKind, AttributeBlock>;

/// Fold the cleaned lines into attribute blocks.
///
/// A block runs from its header to the next header or the end of input and
/// must hold at least one property. Properties before the first header are
/// format errors, as are headers for attributes outside the registry and
/// attributes declared twice.
pub fn extract(lines: Vec<Line>) -> Result<BlockMap, ConfigError> {
    let mut blocks = BlockMap::new();
    let mut current: Option<AttributeBlock> = None;

    for line in lines {
        match line {
            Line::Header { number, identifier } => {
                if let Some(block) = current.take() {
                    close_block(block, &mut blocks)?;
                }

                let kind = AttributeKind::from_identifier(&identifier)
                    .ok_or(ConfigError::UnknownAttribute { identifier })?;

                if blocks.contains_key(&kind) {
                    return Err(ConfigError::DuplicatedAttribute { attribute: kind });
                }

                current = Some(AttributeBlock {
                    kind,
                    line: number,
                    properties: Vec::new(),
                });
            }
            Line::Property {
                number,
                name,
                value,
            } => match current.as_mut() {
                Some(block) => block.properties.push(RawProperty {
                    name,
                    value,
                    line: number,
                }),
                None => {
                    return Err(ConfigError::FormatError {
                        line_number: number,
                        line_text: format!("{}: {}", name, value),
                    })
                }
            },
        }
    }

    if let Some(block) = current.take() {
        close_block(block, &mut blocks)?;
    }

    Ok(blocks)
}

fn close_block(block: AttributeBlock, blocks: &mut BlockMap) -> Result<(), ConfigError> {
    if block.properties.is_empty() {
        return Err(ConfigError::FormatError {
            line_number: block.line,
            line_text: block.kind.header(),
        });
    }
    tracing::debug!(
        "found attribute {} with {} propert(ies)",
        block.kind,
        block.properties.len()
    );
    blocks.insert(block.kind, block);
    Ok(())
}
