//! `modbuild build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use modbuild::core::config::BuildMode;
use modbuild::ops::build::{build, BuildOptions};
use modbuild::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: BuildArgs) -> Result<()> {
    run(ctx, args, BuildMode::Executable)
}

/// Shared by `build` and `test`.
pub fn run(ctx: &GlobalContext, args: BuildArgs, mode: BuildMode) -> Result<()> {
    let opts = BuildOptions {
        mode,
        emit_plan: args.plan,
        no_run: args.no_run,
        verbose: ctx.is_verbose(),
    };

    let result = build(ctx, &opts)?;

    if let Some(report) = &result.report {
        if let Some(output) = &report.output {
            eprintln!(
                "    Finished {} ({} command(s))",
                output.display(),
                report.commands_run
            );
        }
    }

    Ok(())
}
