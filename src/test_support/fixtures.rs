//! Configuration documents shared by the unit tests.

use crate::core::config::ResolvedConfig;
use crate::parser::parse_config;

/// The smallest valid document: the three mandatory attributes.
pub const MINIMAL_CONFIG: &str = "\
[[#project]]
name: demo

[[#compiler]]
cpp_compiler: clang++

[[#language]]
cpp_standard: 20
";

/// A document using every attribute.
///
/// Interfaces are `ifc/*.cppm` (a glob) plus `calc.cppm`, which imports
/// `math` and `vec`. Implementations are `src/math.cpp` (same-name) and
/// `src/calc.impl.cpp` with an explicit list.
pub const FULL_CONFIG: &str = "\
# calculator build
[[#project]]
name: calculator
authors: Ada, Grace

[[#compiler]]
cpp_compiler: clang++
extra_args: -Wall

[[#language]]
cpp_standard: 20
std_lib: libc++
modules: true

[[#build]]
output_dir: ./build/

[[#modules]]
base_ifcs_dir: ifc
interfaces: *.cppm; calc.cppm=[math, vec]
base_impls_dir: src
implementations: math.cpp; calc.impl.cpp=[calc, math]

[[#executable]]
executable_name: calc
sources_base_path: src
sources: main.cpp
auto_execute: true

[[#tests]]
tests_executable_name: calc_tests
sources: tests/*.cpp
extra_args: -DTESTING
";

/// Parse a fixture, panicking on errors.
pub fn config_from(source: &str) -> ResolvedConfig {
    match parse_config(source) {
        Ok(config) => config,
        Err(e) => panic!("fixture does not parse: {}", e),
    }
}
