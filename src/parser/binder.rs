//! Schema binding: from attribute blocks to a typed configuration.
//!
//! Attributes are visited in registry order. Missing attributes, missing
//! properties, unknown properties and invalid values are accumulated and
//! reported together. Cross-attribute rules run last, on an otherwise valid
//! configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::config::ResolvedConfig;
use crate::core::module_unit::ModuleDeclaration;
use crate::core::schema::{
    AllowedValues, AttributeKind, AttributeSchema, PropertyKey, PropertySchema, REGISTRY,
};
use crate::parser::blocks::{AttributeBlock, BlockMap, RawProperty};
use crate::parser::errors::ConfigError;

/// Bind extracted blocks against the registry.
pub fn bind(blocks: &BlockMap) -> Result<ResolvedConfig, ConfigError> {
    let mut config = ResolvedConfig::default();
    let mut errors = Vec::new();
    let mut missing_attributes = Vec::new();

    for schema in &REGISTRY {
        match blocks.get(&schema.kind) {
            Some(block) => {
                bind_block(schema, block, &mut config, &mut errors);
                config.declared.push(schema.kind);
            }
            None if schema.mandatory => missing_attributes.push(schema.kind),
            None => tracing::debug!("{} not declared, using defaults", schema.kind),
        }
    }

    if !missing_attributes.is_empty() {
        errors.push(ConfigError::MissingMandatoryAttributes {
            attributes: missing_attributes,
        });
    }

    if let Some(err) = ConfigError::from_batch(errors) {
        return Err(err);
    }

    check_attribute_dependencies(&config)?;

    Ok(config)
}

fn bind_block(
    schema: &AttributeSchema,
    block: &AttributeBlock,
    config: &mut ResolvedConfig,
    errors: &mut Vec<ConfigError>,
) {
    let present: HashSet<&str> = block.property_names().collect();

    let missing: Vec<String> = schema
        .mandatory_properties()
        .filter(|p| !present.contains(p))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        errors.push(ConfigError::MissingMandatoryProperties {
            attribute: schema.kind,
            properties: missing,
        });
    }

    let mut unknown: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    for raw in &block.properties {
        let Some(property) = schema.property(&raw.name) else {
            if !unknown.contains(&raw.name) {
                unknown.push(raw.name.clone());
            }
            continue;
        };

        if !seen.insert(property.identifier) {
            tracing::warn!(
                "property <{}> repeated in {} (line {}), last value wins",
                raw.name,
                schema.kind,
                raw.line
            );
        }

        if !property.allowed_values.permits(&raw.value) {
            errors.push(invalid_value(property, &raw.value));
            continue;
        }

        if let Err(e) = apply(config, property, raw) {
            errors.push(e);
        }
    }

    if !unknown.is_empty() {
        errors.push(ConfigError::UnknownProperties {
            attribute: schema.kind,
            properties: unknown,
        });
    }
}

/// Store one validated property value on its attribute's config.
fn apply(
    config: &mut ResolvedConfig,
    property: &PropertySchema,
    raw: &RawProperty,
) -> Result<(), ConfigError> {
    let value = raw.value.as_str();
    let parse_error = |_| invalid_value(property, value);

    match property.key {
        PropertyKey::ProjectName => set_text(&mut config.project.name, value),
        PropertyKey::ProjectAuthors => config.project.authors = split_list(value),

        PropertyKey::CppCompiler => {
            config.compiler.cpp_compiler = value.parse().map_err(parse_error)?
        }
        PropertyKey::CompilerExtraArgs => config.compiler.extra_args = split_args(value),
        PropertyKey::SystemHeadersPath => {
            config.compiler.system_headers_path =
                (!value.is_empty()).then(|| normalize_path(value))
        }

        PropertyKey::CppStandard => {
            config.language.cpp_standard = value.parse().map_err(parse_error)?
        }
        PropertyKey::StdLib => config.language.std_lib = Some(value.parse().map_err(parse_error)?),
        PropertyKey::LanguageModules => config.language.modules = coerce_bool(value),

        PropertyKey::OutputDir => {
            let dir = normalize_path(value);
            config.build.output_dir = if dir.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                dir
            };
        }

        PropertyKey::BaseIfcsDir => config.modules.base_ifcs_dir = normalize_path(value),
        PropertyKey::Interfaces => {
            config.modules.interfaces = parse_declarations(value).ok_or_else(|| {
                invalid_value(property, value)
            })?
        }
        PropertyKey::BaseImplsDir => config.modules.base_impls_dir = normalize_path(value),
        PropertyKey::Implementations => {
            config.modules.implementations = parse_declarations(value)
                .ok_or_else(|| invalid_value(property, value))?
        }

        PropertyKey::ExecutableName => set_text(&mut config.executable.0.name, value),
        PropertyKey::ExecutableSourcesBasePath => {
            config.executable.0.sources_base_path = normalize_path(value)
        }
        PropertyKey::ExecutableSources => config.executable.0.sources = split_list(value),
        PropertyKey::AutoExecute => config.executable.0.auto_run = coerce_bool(value),
        PropertyKey::ExecutableExtraArgs => config.executable.0.extra_args = split_args(value),

        PropertyKey::TestsExecutableName => set_text(&mut config.tests.0.name, value),
        PropertyKey::TestsSourcesBasePath => {
            config.tests.0.sources_base_path = normalize_path(value)
        }
        PropertyKey::TestsSources => config.tests.0.sources = split_list(value),
        PropertyKey::AutoRunTests => config.tests.0.auto_run = coerce_bool(value),
        PropertyKey::TestsExtraArgs => config.tests.0.extra_args = split_args(value),
    }

    Ok(())
}

fn check_attribute_dependencies(config: &ResolvedConfig) -> Result<(), ConfigError> {
    if config.is_declared(AttributeKind::Modules) && !config.language.modules {
        return Err(ConfigError::AttributeDependsOnProperty {
            attribute: AttributeKind::Modules,
            depends_on: AttributeKind::Language,
            property: "modules".to_string(),
            expected: "true".to_string(),
        });
    }
    Ok(())
}

fn invalid_value(property: &PropertySchema, value: &str) -> ConfigError {
    let allowed = match property.allowed_values {
        AllowedValues::Any => Vec::new(),
        AllowedValues::OneOf(values) => values.iter().map(|v| v.to_string()).collect(),
    };
    ConfigError::InvalidPropertyValue {
        value: value.to_string(),
        property: property.identifier.to_string(),
        allowed,
    }
}

/// An empty value keeps the default.
fn set_text(field: &mut String, value: &str) {
    if !value.is_empty() {
        *field = value.to_string();
    }
}

/// Split a `,` separated list, trimming items and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split compiler arguments on commas and whitespace.
pub fn split_args(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drop a leading `./` and trailing separators. `.` becomes the empty path.
pub fn normalize_path(value: &str) -> PathBuf {
    let mut path = value.trim();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    let path = path.trim_end_matches(['/', '\\']);
    if path == "." || path.is_empty() {
        return PathBuf::new();
    }
    Path::new(path).to_path_buf()
}

fn coerce_bool(value: &str) -> bool {
    matches!(value, "true" | "True")
}

/// Split a `;` separated declaration list and parse each item.
fn parse_declarations(value: &str) -> Option<Vec<ModuleDeclaration>> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ModuleDeclaration::parse)
        .collect()
}
