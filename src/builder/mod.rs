//! C++ modules build system.
//!
//! Turns a validated configuration into an ordered plan of compiler
//! invocations and runs it.

pub mod context;
pub mod errors;
pub mod executor;
pub mod intrinsics;
pub mod plan;
pub mod platform;
pub mod toolchain;

pub use context::{BuildContext, OutputLayout};
pub use errors::BuildError;
pub use executor::{BuildExecutor, BuildReport};
pub use intrinsics::{FsHeaderLocator, SystemHeaderLocator};
pub use plan::{BuildPlan, BuildStep, Phase};
pub use platform::Platform;
pub use toolchain::{CommandSpec, Toolchain};
