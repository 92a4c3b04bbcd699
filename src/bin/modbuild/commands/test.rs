//! `modbuild test` command

use anyhow::Result;

use crate::cli::BuildArgs;
use modbuild::core::config::BuildMode;
use modbuild::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: BuildArgs) -> Result<()> {
    super::build::run(ctx, args, BuildMode::Tests)
}
