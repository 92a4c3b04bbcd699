//! Enumerated value domains of the configuration language.
//!
//! These are the typed counterparts of the literal value sets declared in the
//! schema registry. Every literal accepted by the registry parses here, so the
//! binder never has to handle a parse failure after validation.

use serde::{Deserialize, Serialize};

/// The C++ compiler driver selected with `cpp_compiler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CppCompiler {
    /// LLVM Clang (`clang++`)
    #[default]
    #[serde(rename = "clang++")]
    Clang,
    /// GNU (`g++`)
    #[serde(rename = "g++")]
    Gcc,
    /// Microsoft build tools (`msbuild`)
    #[serde(rename = "msbuild")]
    Msvc,
}

impl CppCompiler {
    /// Literal values accepted by the `cpp_compiler` property.
    pub const VALUES: &'static [&'static str] = &["clang++", "g++", "msbuild"];

    /// Get the compiler as written in the configuration file.
    pub fn as_str(&self) -> &'static str {
        match self {
            CppCompiler::Clang => "clang++",
            CppCompiler::Gcc => "g++",
            CppCompiler::Msvc => "msbuild",
        }
    }
}

impl std::str::FromStr for CppCompiler {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clang++" => Ok(CppCompiler::Clang),
            "g++" => Ok(CppCompiler::Gcc),
            "msbuild" => Ok(CppCompiler::Msvc),
            _ => Err(ValueParseError::new("cpp_compiler", s)),
        }
    }
}

impl std::fmt::Display for CppCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// C++ standard level selected with `cpp_standard`.
///
/// Besides the published standards, the draft spellings accepted by the
/// compilers are kept verbatim so they reach the `-std=c++<level>` flag
/// unchanged. For feature gating they rank as `1x` = 14, `1a` = 17 and
/// `2a`/`2x` = 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CppStandard {
    #[default]
    #[serde(rename = "11")]
    Cpp11,
    #[serde(rename = "14")]
    Cpp14,
    #[serde(rename = "17")]
    Cpp17,
    #[serde(rename = "20")]
    Cpp20,
    #[serde(rename = "23")]
    Cpp23,
    #[serde(rename = "1x")]
    Cpp1x,
    #[serde(rename = "1a")]
    Cpp1a,
    #[serde(rename = "2a")]
    Cpp2a,
    #[serde(rename = "2x")]
    Cpp2x,
}

impl CppStandard {
    /// Literal values accepted by the `cpp_standard` property.
    pub const VALUES: &'static [&'static str] =
        &["11", "14", "17", "20", "23", "1a", "2a", "1x", "2x"];

    /// The level as written in the configuration file.
    pub fn as_str(&self) -> &'static str {
        match self {
            CppStandard::Cpp11 => "11",
            CppStandard::Cpp14 => "14",
            CppStandard::Cpp17 => "17",
            CppStandard::Cpp20 => "20",
            CppStandard::Cpp23 => "23",
            CppStandard::Cpp1x => "1x",
            CppStandard::Cpp1a => "1a",
            CppStandard::Cpp2a => "2a",
            CppStandard::Cpp2x => "2x",
        }
    }

    /// Numeric rank used to gate language features.
    pub fn rank(&self) -> u32 {
        match self {
            CppStandard::Cpp11 => 11,
            CppStandard::Cpp14 | CppStandard::Cpp1x => 14,
            CppStandard::Cpp17 | CppStandard::Cpp1a => 17,
            CppStandard::Cpp20 | CppStandard::Cpp2a | CppStandard::Cpp2x => 20,
            CppStandard::Cpp23 => 23,
        }
    }

    /// Get the standard as a compiler flag (e.g., "-std=c++20").
    pub fn as_flag(&self) -> String {
        format!("-std=c++{}", self.as_str())
    }
}

impl std::str::FromStr for CppStandard {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "11" => Ok(CppStandard::Cpp11),
            "14" => Ok(CppStandard::Cpp14),
            "17" => Ok(CppStandard::Cpp17),
            "20" => Ok(CppStandard::Cpp20),
            "23" => Ok(CppStandard::Cpp23),
            "1x" => Ok(CppStandard::Cpp1x),
            "1a" => Ok(CppStandard::Cpp1a),
            "2a" => Ok(CppStandard::Cpp2a),
            "2x" => Ok(CppStandard::Cpp2x),
            _ => Err(ValueParseError::new("cpp_standard", s)),
        }
    }
}

impl std::fmt::Display for CppStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C++{}", self.as_str())
    }
}

/// C++ standard library selected with `std_lib`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StdLib {
    /// GNU libstdc++
    #[serde(rename = "libstdc++")]
    Libstdcxx,
    /// LLVM libc++
    #[serde(rename = "libc++")]
    Libcxx,
}

impl StdLib {
    /// Literal values accepted by the `std_lib` property.
    pub const VALUES: &'static [&'static str] = &["libstdc++", "libc++"];

    pub fn as_str(&self) -> &'static str {
        match self {
            StdLib::Libstdcxx => "libstdc++",
            StdLib::Libcxx => "libc++",
        }
    }

    /// Get the compiler flag for this library.
    pub fn as_flag(&self) -> String {
        format!("-stdlib={}", self.as_str())
    }
}

impl std::str::FromStr for StdLib {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "libstdc++" => Ok(StdLib::Libstdcxx),
            "libc++" => Ok(StdLib::Libcxx),
            _ => Err(ValueParseError::new("std_lib", s)),
        }
    }
}

/// Error returned when a literal is outside a value domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueParseError {
    pub property: &'static str,
    pub value: String,
}

impl ValueParseError {
    fn new(property: &'static str, value: &str) -> Self {
        ValueParseError {
            property,
            value: value.to_string(),
        }
    }
}

impl std::fmt::Display for ValueParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid value '{}' for `{}`", self.value, self.property)
    }
}

impl std::error::Error for ValueParseError {}
