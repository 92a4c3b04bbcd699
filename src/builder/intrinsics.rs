//! System header module map generation.
//!
//! Clang on Windows uses the MinGW standard library headers, which come
//! without a module map. To make `import std;` work we generate `std.h`,
//! including every top-level standard header, and a module map exporting it
//! as module `std`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::builder::errors::BuildError;
use crate::util::fs::write_string;

/// Name of the generated module map.
pub const MODULE_MAP_FILE: &str = "modbuild.modulemap";

/// Name of the umbrella header the module map exports.
pub const STD_HEADER_FILE: &str = "std.h";

/// Where the system headers are looked for when not configured.
pub const SYSTEM_HEADER_CANDIDATES: &[&str] = &["C:/msys64/mingw64/include/c++/"];

/// Headers left out of `std.h` because they break the module build.
const DISCARDED_HEADERS: &[&str] = &["cstdlib", "stdlib.h", "stacktrace"];

/// Finds the system header directory among candidate locations.
pub trait SystemHeaderLocator {
    fn locate(&self, candidates: &[PathBuf]) -> Option<PathBuf>;
}

/// Looks for versioned header directories on the real filesystem.
///
/// A candidate such as `C:/msys64/mingw64/include/c++/` holds one directory
/// per GCC version; the highest version wins, compared component by
/// component as numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsHeaderLocator;

impl SystemHeaderLocator for FsHeaderLocator {
    fn locate(&self, candidates: &[PathBuf]) -> Option<PathBuf> {
        candidates.iter().filter(|c| c.is_dir()).find_map(|candidate| {
            WalkDir::new(candidate)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_dir())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .max_by_key(|name| (version_key(name), name.clone()))
                .map(|version| candidate.join(version))
        })
    }
}

/// Numeric components of a version directory name: `12.1.0` is `[12, 1, 0]`.
///
/// Components without leading digits count as zero.
fn version_key(name: &str) -> Vec<u64> {
    name.split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        })
        .collect()
}

/// The default candidate list.
pub fn default_candidates() -> Vec<PathBuf> {
    SYSTEM_HEADER_CANDIDATES.iter().map(PathBuf::from).collect()
}

/// Pick the system header directory: the configured one, or a located one.
pub fn system_headers_dir(
    configured: Option<&Path>,
    locator: &dyn SystemHeaderLocator,
) -> Result<PathBuf, BuildError> {
    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }
    let candidates = default_candidates();
    locator
        .locate(&candidates)
        .ok_or(BuildError::SystemHeadersNotFound { candidates })
}

/// `#include` lines for every extensionless header directly in `dir`.
pub fn std_header_contents(dir: &Path) -> Result<String, BuildError> {
    let mut headers = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| BuildError::io(dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains('.') || DISCARDED_HEADERS.contains(&name.as_str()) {
            continue;
        }
        headers.push(name);
    }
    headers.sort();

    Ok(headers
        .iter()
        .map(|h| format!("#include <{}>\n", h))
        .collect())
}

/// The module map exporting `std.h` as module `std`.
pub fn module_map_contents() -> String {
    format!(
        "module \"std\" {{\n  export *\n  header \"{}\"\n}}",
        STD_HEADER_FILE
    )
}

/// Write `std.h` and the module map into `intrinsics_dir`.
///
/// An existing module map is kept as is; returns whether files were written.
pub fn generate_module_map(
    intrinsics_dir: &Path,
    configured_headers: Option<&Path>,
    locator: &dyn SystemHeaderLocator,
) -> Result<bool, BuildError> {
    let module_map = intrinsics_dir.join(MODULE_MAP_FILE);
    if module_map.exists() {
        tracing::info!("cached {} found, skipping", module_map.display());
        return Ok(false);
    }

    let headers_dir = system_headers_dir(configured_headers, locator)?;
    tracing::debug!("mapping system headers from {}", headers_dir.display());

    let std_header = std_header_contents(&headers_dir)?;
    write(&intrinsics_dir.join(STD_HEADER_FILE), &std_header)?;
    write(&module_map, &module_map_contents())?;

    Ok(true)
}

fn write(path: &Path, contents: &str) -> Result<(), BuildError> {
    write_string(path, contents).map_err(|e| BuildError::io_from(path, e))
}
