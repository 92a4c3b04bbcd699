//! Shared utilities

pub mod context;
pub mod diagnostic;
pub mod fs;
pub mod process;

pub use context::GlobalContext;
pub use diagnostic::Diagnostic;
pub use fs::{FileGlob, FsGlob};
pub use process::{CommandRunner, ProcessRunner};
