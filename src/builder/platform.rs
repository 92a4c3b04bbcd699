//! Host platform detection.

use serde::Serialize;

/// The operating system a build runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl Platform {
    /// Detect the current host platform.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            _ => Platform::Other,
        }
    }

    /// Whether the system headers must be mapped into a `std` module by hand.
    ///
    /// Clang on Windows borrows the MinGW headers, which ship no module map.
    pub fn needs_intrinsics(self) -> bool {
        self == Platform::Windows
    }

    /// Extension appended to linked executables.
    pub fn exe_extension(self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_needs_intrinsics() {
        assert!(Platform::Windows.needs_intrinsics());
        assert!(!Platform::Linux.needs_intrinsics());
        assert!(!Platform::MacOs.needs_intrinsics());
        assert_eq!(Platform::Windows.exe_extension(), ".exe");
        assert_eq!(Platform::Linux.exe_extension(), "");
    }

    #[test]
    fn test_current_matches_cfg() {
        assert_eq!(
            Platform::current() == Platform::Windows,
            cfg!(target_os = "windows")
        );
    }
}
