//! Implementation of `modbuild build` and `modbuild test`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::builder::executor::run_checked;
use crate::builder::intrinsics::{FsHeaderLocator, SystemHeaderLocator};
use crate::builder::{BuildContext, BuildExecutor, BuildPlan, BuildReport, Platform};
use crate::core::config::{BuildMode, ResolvedConfig};
use crate::parser::load_config;
use crate::util::context::GlobalContext;
use crate::util::fs::{FileGlob, FsGlob};
use crate::util::process::{find_executable, CommandRunner, ProcessRunner};

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Link the executable or the test binary
    pub mode: BuildMode,

    /// Print the build plan as JSON instead of running it
    pub emit_plan: bool,

    /// Never run the produced binary, whatever the configuration says
    pub no_run: bool,

    /// Verbose output
    pub verbose: bool,
}

/// Build result.
#[derive(Debug)]
pub struct BuildResult {
    /// The plan that was executed (or only printed)
    pub plan: BuildPlan,

    /// Execution summary; `None` when only the plan was emitted
    pub report: Option<BuildReport>,

    /// Whether the produced binary was run afterwards
    pub ran: bool,
}

/// The outside world a build talks to.
pub struct Collaborators<'a> {
    pub glob: &'a dyn FileGlob,
    pub runner: &'a dyn CommandRunner,
    pub locator: &'a dyn SystemHeaderLocator,
    pub platform: Platform,
}

/// Build the project found from the current directory.
pub fn build(gctx: &GlobalContext, opts: &BuildOptions) -> Result<BuildResult> {
    let config_path = gctx.find_config()?;
    let root = gctx.project_root()?;
    tracing::debug!("project root is {}", root.display());

    let config = load_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    let glob = FsGlob::new(&root);
    let runner = ProcessRunner::new(&root);
    let env = Collaborators {
        glob: &glob,
        runner: &runner,
        locator: &FsHeaderLocator,
        platform: Platform::current(),
    };

    build_config(&config, &root, opts, &env)
}

/// Plan, run and optionally execute a build of an already parsed config.
pub fn build_config(
    config: &ResolvedConfig,
    root: &Path,
    opts: &BuildOptions,
    env: &Collaborators<'_>,
) -> Result<BuildResult> {
    let ctx = BuildContext::new(config, opts.mode, env.platform)?;
    let plan = BuildPlan::new(&ctx, config, env.glob)?;

    if opts.emit_plan {
        let plan_json = serde_json::to_string_pretty(&plan)?;
        println!("{}", plan_json);

        return Ok(BuildResult {
            plan,
            report: None,
            ran: false,
        });
    }

    let compiler = ctx.toolchain().compiler();
    if find_executable(compiler.as_str()).is_none() {
        tracing::warn!("`{}` was not found in PATH", compiler);
    }

    tracing::info!(
        "building `{}` ({} unit(s))",
        config.project.name,
        plan.compile_count()
    );

    let report = BuildExecutor::new(env.runner, env.locator, root)
        .verbose(opts.verbose)
        .execute(&plan)?;

    let target = config.target(opts.mode);
    let mut ran = false;
    if let Some(output) = &report.output {
        tracing::info!("built {}", output.display());
        if target.auto_run && !opts.no_run {
            let binary = root.join(output);
            tracing::info!("running {}", binary.display());
            run_checked(env.runner, &[binary.display().to_string()])?;
            ran = true;
        } else if target.auto_run {
            tracing::debug!("auto-run disabled by --no-run");
        }
    }

    Ok(BuildResult {
        plan,
        report: Some(report),
        ran,
    })
}
