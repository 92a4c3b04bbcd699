//! CLI integration tests for modbuild.
//!
//! These drive the binary against throwaway projects. Only `--plan` runs
//! and failures before the first compiler invocation are exercised, so no
//! C++ compiler is needed.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const CONFIG: &str = "\
[[#project]]
name: calculator

[[#compiler]]
cpp_compiler: clang++

[[#language]]
cpp_standard: 20
modules: true

[[#modules]]
base_ifcs_dir: ifc
interfaces: *.cppm; calc.ixx=[math]
base_impls_dir: src
implementations: math.cpp

[[#executable]]
executable_name: calc
sources: main.cpp

[[#tests]]
sources: tests/*.cpp
";

/// Get the modbuild binary command.
fn modbuild() -> Command {
    let mut cmd = Command::cargo_bin("modbuild").unwrap();
    cmd.arg("--no-color");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Lay out a small modules project.
fn write_project(root: &Path, config: &str) {
    for dir in ["ifc", "src", "tests"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
    fs::write(root.join("modbuild.conf"), config).unwrap();
    fs::write(root.join("ifc/math.cppm"), "export module math;\n").unwrap();
    fs::write(root.join("ifc/calc.ixx"), "export module calc;\n").unwrap();
    fs::write(root.join("src/math.cpp"), "module math;\n").unwrap();
    fs::write(root.join("main.cpp"), "int main() {}\n").unwrap();
    fs::write(root.join("tests/a_test.cpp"), "").unwrap();
    fs::write(root.join("tests/b_test.cpp"), "").unwrap();
}

fn plan_json(root: &Path, subcommand: &str) -> Value {
    let output = modbuild()
        .args([subcommand, "--plan"])
        .current_dir(root)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn step_types(plan: &Value) -> Vec<String> {
    plan["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["type"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// modbuild build --plan
// ============================================================================

#[test]
fn test_build_plan_orders_phases() {
    let tmp = temp_dir();
    write_project(tmp.path(), CONFIG);

    let plan = plan_json(tmp.path(), "build");
    assert_eq!(plan["mode"], "executable");

    let types = step_types(&plan);
    let compiles: Vec<&str> = types
        .iter()
        .map(String::as_str)
        .filter(|t| *t != "ensure_directory" && *t != "generate_module_map")
        .collect();
    assert_eq!(
        compiles,
        vec![
            "precompile_interface",
            "precompile_interface",
            "compile_implementation",
            "link_executable"
        ]
    );
}

#[test]
fn test_build_plan_expands_globs_from_project_root() {
    let tmp = temp_dir();
    write_project(tmp.path(), CONFIG);

    let plan = plan_json(tmp.path(), "build");
    let steps = plan["steps"].as_array().unwrap();
    let precompiled: Vec<&str> = steps
        .iter()
        .filter(|s| s["type"] == "precompile_interface")
        .map(|s| s["module"].as_str().unwrap())
        .collect();
    assert_eq!(precompiled, vec!["math", "calc"]);

    let calc = steps
        .iter()
        .find(|s| s["module"] == "calc")
        .unwrap();
    let argv: Vec<&str> = calc["argv"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a.as_str().unwrap())
        .collect();
    assert!(argv.contains(&"-emit-module-interface"));
    assert_eq!(argv.last(), Some(&"ifc/calc.ixx"));
}

#[test]
fn test_plan_does_not_touch_output_dir() {
    let tmp = temp_dir();
    write_project(tmp.path(), CONFIG);

    modbuild()
        .args(["build", "--plan"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(!tmp.path().join("build").exists());
}

#[test]
fn test_test_plan_links_tests_target() {
    let tmp = temp_dir();
    write_project(tmp.path(), CONFIG);

    let plan = plan_json(tmp.path(), "test");
    assert_eq!(plan["mode"], "tests");

    let link = plan["steps"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(link["type"], "link_tests");
    let argv = link["argv"].to_string();
    assert!(argv.contains("tests/a_test.cpp"));
    assert!(argv.contains("tests/b_test.cpp"));
    assert!(link["output"].as_str().unwrap().contains("proj_tests"));
}

#[test]
fn test_config_found_from_subdirectory() {
    let tmp = temp_dir();
    write_project(tmp.path(), CONFIG);

    let plan = plan_json(&tmp.path().join("src"), "build");
    assert_eq!(plan["mode"], "executable");
}

#[test]
fn test_explicit_config_path() {
    let tmp = temp_dir();
    let project = tmp.path().join("project");
    fs::create_dir_all(&project).unwrap();
    write_project(&project, CONFIG);

    modbuild()
        .args(["--config", "project/modbuild.conf", "build", "--plan"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"link_executable\""));
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_missing_config() {
    let tmp = temp_dir();

    modbuild()
        .arg("build")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not find `modbuild.conf`"));
}

#[test]
fn test_unknown_attribute() {
    let tmp = temp_dir();
    write_project(tmp.path(), &format!("{}\n[[#linker]]\nname: lld\n", CONFIG));

    modbuild()
        .args(["build", "--plan"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("`[[#linker]]` is an unknown or unsupported attribute"));
}

#[test]
fn test_format_error_reports_line() {
    let tmp = temp_dir();
    write_project(tmp.path(), "[[#project]]\nname: x\nthis is not a property\n");

    modbuild()
        .arg("build")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("format error in line 3"));
}

#[test]
fn test_config_error_points_at_file() {
    let tmp = temp_dir();
    write_project(tmp.path(), "[[#project]]\nname: x\n[[#language]]\ncpp_standard: 99\n");

    modbuild()
        .arg("build")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::is_match(r"--> .*modbuild\.conf").unwrap())
        .stderr(predicate::str::contains("the config file has 2 errors"))
        .stderr(predicate::str::contains("<99> is an unknown or unsupported value"))
        .stderr(predicate::str::contains("mandatory attribute(s) missing: [[#compiler]]"))
        .stderr(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_modules_block_needs_language_flag() {
    let tmp = temp_dir();
    write_project(tmp.path(), &CONFIG.replace("modules: true\n", ""));

    modbuild()
        .args(["build", "--plan"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("can only be used when <modules>"));
}

#[test]
fn test_missing_attributes_reported_together() {
    let tmp = temp_dir();
    write_project(tmp.path(), "[[#project]]\nname: x\n");

    modbuild()
        .arg("build")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 mandatory attribute(s) missing"))
        .stderr(predicate::str::contains("[[#compiler]] is not present"))
        .stderr(predicate::str::contains("[[#language]] is not present"));
}

// ============================================================================
// Build errors
// ============================================================================

#[test]
fn test_unsupported_compiler() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        &CONFIG.replace("cpp_compiler: clang++", "cpp_compiler: g++"),
    );

    modbuild()
        .args(["build", "--plan"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("`g++` is not a supported compiler"));
}

#[test]
fn test_modules_need_cpp20() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        &CONFIG.replace("cpp_standard: 20", "cpp_standard: 17"),
    );

    modbuild()
        .args(["build", "--plan"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("modules require at least C++20"));
}
