//! Build context: toolchain, platform and output layout.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::builder::errors::BuildError;
use crate::builder::intrinsics::MODULE_MAP_FILE;
use crate::builder::platform::Platform;
use crate::builder::toolchain::{toolchain_for, Toolchain};
use crate::core::config::{BuildMode, ResolvedConfig};

/// Lowest standard level with C++ modules.
pub const MODULES_MIN_STANDARD: u32 = 20;

/// Where every build artifact goes, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Build output root
    pub output_dir: PathBuf,
    /// Precompiled interfaces (`<out>/modules/interfaces`)
    pub interfaces_dir: PathBuf,
    /// Implementation objects (`<out>/modules/implementations`)
    pub implementations_dir: PathBuf,
    /// Generated system header module map (`<out>/modbuild/intrinsics`)
    pub intrinsics_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(output_dir: &Path) -> Self {
        let modules = output_dir.join("modules");
        OutputLayout {
            output_dir: output_dir.to_path_buf(),
            interfaces_dir: modules.join("interfaces"),
            implementations_dir: modules.join("implementations"),
            intrinsics_dir: output_dir.join("modbuild").join("intrinsics"),
        }
    }

    pub fn module_map(&self) -> PathBuf {
        self.intrinsics_dir.join(MODULE_MAP_FILE)
    }
}

/// Everything the planner needs besides the configuration itself.
#[derive(Clone)]
pub struct BuildContext {
    pub toolchain: Arc<dyn Toolchain>,
    pub platform: Platform,
    pub mode: BuildMode,
    pub layout: OutputLayout,
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("toolchain", &self.toolchain.compiler())
            .field("platform", &self.platform)
            .field("mode", &self.mode)
            .field("layout", &self.layout)
            .finish()
    }
}

impl BuildContext {
    /// Create a build context for `config`.
    ///
    /// Fails when no toolchain exists for the configured compiler or when
    /// modules are enabled below the standard level that introduced them.
    pub fn new(
        config: &ResolvedConfig,
        mode: BuildMode,
        platform: Platform,
    ) -> Result<Self, BuildError> {
        let language = &config.language;
        if language.modules && language.cpp_standard.rank() < MODULES_MIN_STANDARD {
            return Err(BuildError::StandardLevelTooLow {
                required: MODULES_MIN_STANDARD,
                selected: language.cpp_standard,
                feature: "modules".to_string(),
            });
        }

        let layout = OutputLayout::new(&config.build.output_dir);
        let toolchain: Arc<dyn Toolchain> =
            Arc::from(toolchain_for(config, platform, &layout.module_map())?);

        tracing::debug!(
            "building {:?} with {} on {:?}",
            mode,
            toolchain.compiler(),
            platform
        );

        Ok(BuildContext {
            toolchain,
            platform,
            mode,
            layout,
        })
    }

    pub fn toolchain(&self) -> &dyn Toolchain {
        self.toolchain.as_ref()
    }
}
