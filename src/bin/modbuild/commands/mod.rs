//! Command implementations

pub mod build;
pub mod test;

use anyhow::Result;

use crate::cli::Cli;
use modbuild::util::GlobalContext;

/// Context shared by every command, from the global flags.
pub fn global_context(cli: &Cli) -> Result<GlobalContext> {
    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    ctx.set_color(!cli.no_color);
    if let Some(path) = &cli.config {
        ctx.set_config_path(path.clone());
    }
    Ok(ctx)
}
