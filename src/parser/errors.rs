//! Configuration error types and diagnostics.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::schema::AttributeKind;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error found while reading a configuration document.
///
/// Every variant is fatal. The batch variants carry every offense found in
/// their scope so a single run reports all defects at once.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error("line {line_number}: not a valid attribute header or property: `{line_text}`")]
    #[diagnostic(code(modbuild::config::format))]
    FormatError {
        line_number: usize,
        line_text: String,
    },

    #[error("`[[#{identifier}]]` is an unknown or unsupported attribute")]
    #[diagnostic(code(modbuild::config::unknown_attribute))]
    UnknownAttribute { identifier: String },

    #[error("`{attribute}` is already defined in the file")]
    #[diagnostic(code(modbuild::config::duplicated_attribute))]
    DuplicatedAttribute { attribute: AttributeKind },

    #[error("mandatory attribute(s) missing: {}", join_attributes(.attributes))]
    #[diagnostic(code(modbuild::config::missing_attributes))]
    MissingMandatoryAttributes { attributes: Vec<AttributeKind> },

    #[error("mandatory propert(ies) missing for `{attribute}`: {}", .properties.join(", "))]
    #[diagnostic(code(modbuild::config::missing_properties))]
    MissingMandatoryProperties {
        attribute: AttributeKind,
        properties: Vec<String>,
    },

    #[error("unknown propert(ies) for `{attribute}`: {}", .properties.join(", "))]
    #[diagnostic(code(modbuild::config::unknown_properties))]
    UnknownProperties {
        attribute: AttributeKind,
        properties: Vec<String>,
    },

    #[error("<{value}> is an unknown or unsupported value for the <{property}> property")]
    #[diagnostic(code(modbuild::config::invalid_value))]
    InvalidPropertyValue {
        value: String,
        property: String,
        allowed: Vec<String>,
    },

    #[error("`{attribute}` requires property <{property}> of `{depends_on}` to be <{expected}>")]
    #[diagnostic(code(modbuild::config::depends_on_property))]
    AttributeDependsOnProperty {
        attribute: AttributeKind,
        depends_on: AttributeKind,
        property: String,
        expected: String,
    },

    #[error("{} configuration errors", .0.len())]
    #[diagnostic(code(modbuild::config::multiple))]
    Multiple(Vec<ConfigError>),
}

fn join_attributes(attributes: &[AttributeKind]) -> String {
    attributes
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ConfigError {
    /// Collapse accumulated errors into one: a single error stays as is.
    pub fn from_batch(mut errors: Vec<ConfigError>) -> Option<ConfigError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ConfigError::Multiple(errors)),
        }
    }

    /// Iterate over the individual errors, flattening `Multiple`.
    pub fn errors(&self) -> Vec<&ConfigError> {
        match self {
            ConfigError::Multiple(errors) => errors.iter().flat_map(|e| e.errors()).collect(),
            other => vec![other],
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::FormatError {
                line_number,
                line_text,
            } => Diagnostic::error(format!("format error in line {}", line_number))
                .with_context(format!("`{}`", line_text))
                .with_context(
                    "expected `[[#attribute]]`, `property: value`, a `#` comment or a blank line",
                ),

            ConfigError::UnknownAttribute { identifier } => {
                let mut diag = Diagnostic::error(format!(
                    "`[[#{}]]` is an unknown or unsupported attribute",
                    identifier
                ));
                diag = diag.with_context(format!(
                    "known attributes: {}",
                    join_attributes(&AttributeKind::ALL)
                ));
                diag
            }

            ConfigError::DuplicatedAttribute { attribute } => {
                Diagnostic::error(format!("`{}` is already defined in the file", attribute))
                    .with_suggestion(format!("Merge both `{}` blocks into one", attribute))
            }

            ConfigError::MissingMandatoryAttributes { attributes } => {
                let mut diag = Diagnostic::error(format!(
                    "{} mandatory attribute(s) missing from the config file",
                    attributes.len()
                ));
                for attr in attributes {
                    diag = diag.with_context(format!("{} is not present", attr));
                }
                diag.with_suggestion(suggestions::MINIMAL_CONFIG)
            }

            ConfigError::MissingMandatoryProperties {
                attribute,
                properties,
            } => {
                let mut diag =
                    Diagnostic::error(format!("`{}` is missing mandatory properties", attribute));
                for p in properties {
                    diag = diag.with_context(format!("<{}> is not present", p));
                }
                diag
            }

            ConfigError::UnknownProperties {
                attribute,
                properties,
            } => {
                let known: Vec<&str> = attribute
                    .schema()
                    .properties
                    .iter()
                    .map(|p| p.identifier)
                    .collect();
                Diagnostic::error(format!("unknown properties for `{}`", attribute))
                    .with_context(format!("found: {}", properties.join(", ")))
                    .with_context(format!("known: {}", known.join(", ")))
            }

            ConfigError::InvalidPropertyValue {
                value,
                property,
                allowed,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "<{}> is not a valid value for <{}>",
                    value, property
                ));
                if !allowed.is_empty() {
                    diag = diag.with_context(format!("allowed values: {}", allowed.join(", ")));
                }
                diag
            }

            ConfigError::AttributeDependsOnProperty {
                attribute,
                depends_on,
                property,
                expected,
            } => Diagnostic::error(format!(
                "`{}` can only be used when <{}> in `{}` is <{}>",
                attribute, property, depends_on, expected
            ))
            .with_suggestion(format!(
                "Add `{}: {}` to the `{}` block",
                property, expected, depends_on
            ))
            .with_suggestion(format!("Remove the `{}` block", attribute)),

            ConfigError::Multiple(_) => {
                let errors = self.errors();
                let mut diag = Diagnostic::error(format!(
                    "the config file has {} errors",
                    errors.len()
                ));
                for err in errors {
                    diag = diag.with_context(err.to_string());
                }
                diag
            }
        }
    }
}
