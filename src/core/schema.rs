//! The schema registry.
//!
//! A static catalogue of every attribute the configuration language knows,
//! its properties, which of them are mandatory, and the literal values each
//! property accepts. The registry order is the order in which the binder
//! visits attributes and therefore the order of batch error reports.

use std::fmt;

use serde::Serialize;

use crate::core::language::{CppCompiler, CppStandard, StdLib};

/// A top-level section of the configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Project,
    Compiler,
    Language,
    Build,
    Modules,
    Executable,
    Tests,
}

impl AttributeKind {
    /// All attributes, in registry order.
    pub const ALL: [AttributeKind; 7] = [
        AttributeKind::Project,
        AttributeKind::Compiler,
        AttributeKind::Language,
        AttributeKind::Build,
        AttributeKind::Modules,
        AttributeKind::Executable,
        AttributeKind::Tests,
    ];

    /// The identifier written between `[[#` and `]]`.
    pub fn identifier(&self) -> &'static str {
        match self {
            AttributeKind::Project => "project",
            AttributeKind::Compiler => "compiler",
            AttributeKind::Language => "language",
            AttributeKind::Build => "build",
            AttributeKind::Modules => "modules",
            AttributeKind::Executable => "executable",
            AttributeKind::Tests => "tests",
        }
    }

    /// Look up an attribute by its header identifier.
    pub fn from_identifier(identifier: &str) -> Option<AttributeKind> {
        AttributeKind::ALL
            .into_iter()
            .find(|kind| kind.identifier() == identifier)
    }

    /// The full header as it appears in a document (e.g. `[[#compiler]]`).
    pub fn header(&self) -> String {
        format!("[[#{}]]", self.identifier())
    }

    /// The registry entry for this attribute.
    pub fn schema(&self) -> &'static AttributeSchema {
        match self {
            AttributeKind::Project => &REGISTRY[0],
            AttributeKind::Compiler => &REGISTRY[1],
            AttributeKind::Language => &REGISTRY[2],
            AttributeKind::Build => &REGISTRY[3],
            AttributeKind::Modules => &REGISTRY[4],
            AttributeKind::Executable => &REGISTRY[5],
            AttributeKind::Tests => &REGISTRY[6],
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[#{}]]", self.identifier())
    }
}

/// Every property known to the registry.
///
/// The binder matches on this exhaustively, so adding a property to the
/// registry without teaching the binder how to store it fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    ProjectName,
    ProjectAuthors,
    CppCompiler,
    CompilerExtraArgs,
    SystemHeadersPath,
    CppStandard,
    StdLib,
    LanguageModules,
    OutputDir,
    BaseIfcsDir,
    Interfaces,
    BaseImplsDir,
    Implementations,
    ExecutableName,
    ExecutableSourcesBasePath,
    ExecutableSources,
    AutoExecute,
    ExecutableExtraArgs,
    TestsExecutableName,
    TestsSourcesBasePath,
    TestsSources,
    AutoRunTests,
    TestsExtraArgs,
}

/// Values a property accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedValues {
    /// Any value is accepted.
    Any,
    /// Only one of the listed literals.
    OneOf(&'static [&'static str]),
}

impl AllowedValues {
    /// Check whether a raw value is permitted.
    pub fn permits(&self, value: &str) -> bool {
        match self {
            AllowedValues::Any => true,
            AllowedValues::OneOf(values) => values.contains(&value),
        }
    }
}

/// Literals accepted by `language.modules`.
pub const BOOLEAN_LIKE_VALUES: &[&str] = &["true", "True", "false", "False"];

/// Literals accepted by the auto-run switches.
pub const TOGGLE_VALUES: &[&str] = &["true", "false"];

/// Declaration of one property of an attribute.
#[derive(Debug, Clone, Copy)]
pub struct PropertySchema {
    pub identifier: &'static str,
    pub key: PropertyKey,
    pub mandatory: bool,
    pub allowed_values: AllowedValues,
}

/// Declaration of one attribute.
#[derive(Debug)]
pub struct AttributeSchema {
    pub kind: AttributeKind,
    pub mandatory: bool,
    pub properties: &'static [PropertySchema],
}

impl AttributeSchema {
    /// Find a declared property by name.
    pub fn property(&self, identifier: &str) -> Option<&'static PropertySchema> {
        self.properties.iter().find(|p| p.identifier == identifier)
    }

    /// Names of the mandatory properties, in declaration order.
    pub fn mandatory_properties(&self) -> impl Iterator<Item = &'static str> {
        self.properties
            .iter()
            .filter(|p| p.mandatory)
            .map(|p| p.identifier)
    }
}

const fn property(
    identifier: &'static str,
    key: PropertyKey,
    mandatory: bool,
    allowed_values: AllowedValues,
) -> PropertySchema {
    PropertySchema {
        identifier,
        key,
        mandatory,
        allowed_values,
    }
}

use AllowedValues::{Any, OneOf};

static PROJECT_PROPERTIES: [PropertySchema; 2] = [
    property("name", PropertyKey::ProjectName, true, Any),
    property("authors", PropertyKey::ProjectAuthors, false, Any),
];

static COMPILER_PROPERTIES: [PropertySchema; 3] = [
    property(
        "cpp_compiler",
        PropertyKey::CppCompiler,
        true,
        OneOf(CppCompiler::VALUES),
    ),
    property("extra_args", PropertyKey::CompilerExtraArgs, false, Any),
    property(
        "system_headers_path",
        PropertyKey::SystemHeadersPath,
        false,
        Any,
    ),
];

static LANGUAGE_PROPERTIES: [PropertySchema; 3] = [
    property(
        "cpp_standard",
        PropertyKey::CppStandard,
        true,
        OneOf(CppStandard::VALUES),
    ),
    property("std_lib", PropertyKey::StdLib, false, OneOf(StdLib::VALUES)),
    property(
        "modules",
        PropertyKey::LanguageModules,
        false,
        OneOf(BOOLEAN_LIKE_VALUES),
    ),
];

static BUILD_PROPERTIES: [PropertySchema; 1] =
    [property("output_dir", PropertyKey::OutputDir, false, Any)];

static MODULES_PROPERTIES: [PropertySchema; 4] = [
    property("base_ifcs_dir", PropertyKey::BaseIfcsDir, false, Any),
    property("interfaces", PropertyKey::Interfaces, false, Any),
    property("base_impls_dir", PropertyKey::BaseImplsDir, false, Any),
    property("implementations", PropertyKey::Implementations, false, Any),
];

static EXECUTABLE_PROPERTIES: [PropertySchema; 5] = [
    property("executable_name", PropertyKey::ExecutableName, false, Any),
    property(
        "sources_base_path",
        PropertyKey::ExecutableSourcesBasePath,
        false,
        Any,
    ),
    property("sources", PropertyKey::ExecutableSources, false, Any),
    property(
        "auto_execute",
        PropertyKey::AutoExecute,
        false,
        OneOf(TOGGLE_VALUES),
    ),
    property("extra_args", PropertyKey::ExecutableExtraArgs, false, Any),
];

static TESTS_PROPERTIES: [PropertySchema; 5] = [
    property(
        "tests_executable_name",
        PropertyKey::TestsExecutableName,
        false,
        Any,
    ),
    property(
        "sources_base_path",
        PropertyKey::TestsSourcesBasePath,
        false,
        Any,
    ),
    property("sources", PropertyKey::TestsSources, false, Any),
    property(
        "auto_run_tests",
        PropertyKey::AutoRunTests,
        false,
        OneOf(TOGGLE_VALUES),
    ),
    property("extra_args", PropertyKey::TestsExtraArgs, false, Any),
];

/// The registry, in binding order.
pub static REGISTRY: [AttributeSchema; 7] = [
    AttributeSchema {
        kind: AttributeKind::Project,
        mandatory: true,
        properties: &PROJECT_PROPERTIES,
    },
    AttributeSchema {
        kind: AttributeKind::Compiler,
        mandatory: true,
        properties: &COMPILER_PROPERTIES,
    },
    AttributeSchema {
        kind: AttributeKind::Language,
        mandatory: true,
        properties: &LANGUAGE_PROPERTIES,
    },
    AttributeSchema {
        kind: AttributeKind::Build,
        mandatory: false,
        properties: &BUILD_PROPERTIES,
    },
    AttributeSchema {
        kind: AttributeKind::Modules,
        mandatory: false,
        properties: &MODULES_PROPERTIES,
    },
    AttributeSchema {
        kind: AttributeKind::Executable,
        mandatory: false,
        properties: &EXECUTABLE_PROPERTIES,
    },
    AttributeSchema {
        kind: AttributeKind::Tests,
        mandatory: false,
        properties: &TESTS_PROPERTIES,
    },
];

/// Identifiers of the attributes that must appear in every document.
pub fn mandatory_attributes() -> Vec<AttributeKind> {
    REGISTRY
        .iter()
        .filter(|a| a.mandatory)
        .map(|a| a.kind)
        .collect()
}
