//! Build executor with progress reporting.
//!
//! Steps run one at a time in plan order. Precompiled interfaces must be
//! on disk before anything references them, so nothing runs in parallel,
//! and the first failing command ends the build.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use crate::builder::errors::BuildError;
use crate::builder::intrinsics::{generate_module_map, SystemHeaderLocator};
use crate::builder::plan::{BuildPlan, BuildStep};
use crate::util::fs::ensure_dir;
use crate::util::process::{display_argv, CommandRunner};

/// What a finished build did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Directories created by this run
    pub created_dirs: usize,
    /// Whether the module map had to be generated
    pub module_map_generated: bool,
    /// Compiler and linker invocations
    pub commands_run: usize,
    /// The linked binary, relative to the project root
    pub output: Option<PathBuf>,
}

/// Runs a [`BuildPlan`] against a command runner.
pub struct BuildExecutor<'a> {
    runner: &'a dyn CommandRunner,
    locator: &'a dyn SystemHeaderLocator,
    /// Project root; plan paths are relative to it
    root: PathBuf,
    verbose: bool,
}

impl<'a> BuildExecutor<'a> {
    /// Create a new build executor.
    pub fn new(
        runner: &'a dyn CommandRunner,
        locator: &'a dyn SystemHeaderLocator,
        root: impl Into<PathBuf>,
    ) -> Self {
        BuildExecutor {
            runner,
            locator,
            root: root.into(),
            verbose: false,
        }
    }

    /// Enable verbose output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Execute a build plan, stopping at the first failure.
    pub fn execute(&self, plan: &BuildPlan) -> Result<BuildReport, BuildError> {
        let start = Instant::now();

        if self.verbose {
            eprintln!("   Compiling {} unit(s)", plan.compile_count());
            eprintln!("     Linking {} target(s)", plan.link_count());
        }

        let total = plan.command_count();
        let pb = if !self.verbose && total > 1 {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        } else {
            None
        };

        let mut report = BuildReport {
            created_dirs: 0,
            module_map_generated: false,
            commands_run: 0,
            output: plan.output().map(Path::to_path_buf),
        };

        let mut phase = None;
        for step in &plan.steps {
            if phase != Some(step.phase()) {
                phase = Some(step.phase());
                tracing::debug!("entering phase {:?}", step.phase());
            }

            if let Some(pb) = &pb {
                pb.set_message(step.describe());
            }

            let result = self.run_step(step, &mut report);
            if let Err(e) = result {
                if let Some(pb) = &pb {
                    pb.abandon_with_message("failed");
                }
                return Err(e);
            }

            if step.argv().is_some() {
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        tracing::info!(
            "finished {} command(s) in {:.2}s",
            report.commands_run,
            start.elapsed().as_secs_f64()
        );

        Ok(report)
    }

    fn run_step(&self, step: &BuildStep, report: &mut BuildReport) -> Result<(), BuildError> {
        match step {
            BuildStep::EnsureDirectory(dir) => {
                let path = self.root.join(&dir.path);
                if path.is_dir() {
                    tracing::debug!("{} exists, skipping", dir.path.display());
                    return Ok(());
                }
                if path.exists() {
                    return Err(BuildError::io(
                        &path,
                        io::Error::new(
                            io::ErrorKind::AlreadyExists,
                            "exists and is not a directory",
                        ),
                    ));
                }
                ensure_dir(&path).map_err(|e| BuildError::io_from(&path, e))?;
                report.created_dirs += 1;
                Ok(())
            }

            BuildStep::GenerateModuleMap(map) => {
                let configured = map.system_headers.as_deref().map(|p| self.root.join(p));
                report.module_map_generated = generate_module_map(
                    &self.root.join(&map.dir),
                    configured.as_deref(),
                    self.locator,
                )?;
                Ok(())
            }

            BuildStep::PrecompileInterface(_)
            | BuildStep::CompileImplementation(_)
            | BuildStep::LinkExecutable(_)
            | BuildStep::LinkTests(_) => {
                let argv = step.argv().unwrap_or_default();
                self.run_command(argv)?;
                report.commands_run += 1;
                Ok(())
            }
        }
    }

    fn run_command(&self, argv: &[String]) -> Result<(), BuildError> {
        if self.verbose {
            eprintln!("     Running `{}`", display_argv(argv));
        }
        run_checked(self.runner, argv)
    }
}

/// Run one command line, failing on a non-zero exit.
pub fn run_checked(runner: &dyn CommandRunner, argv: &[String]) -> Result<(), BuildError> {
    let command = display_argv(argv);
    let program = argv.first().cloned().unwrap_or_default();
    tracing::debug!("running `{}`", command);

    let status = runner
        .run(argv)
        .map_err(|e| BuildError::io_from(&program, e))?;
    if status != 0 {
        return Err(BuildError::ExternalCommandFailed {
            program,
            status,
            command,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::context::BuildContext;
    use crate::builder::intrinsics::MODULE_MAP_FILE;
    use crate::builder::platform::Platform;
    use crate::core::config::BuildMode;
    use crate::test_support::fixtures::{config_from, FULL_CONFIG};
    use crate::test_support::{CommandPattern, MockGlob, MockHeaderLocator, MockRunner};
    use std::fs;
    use tempfile::TempDir;

    fn full_plan(platform: Platform) -> BuildPlan {
        let config = config_from(FULL_CONFIG);
        let ctx = BuildContext::new(&config, BuildMode::Executable, platform).unwrap();
        let glob = MockGlob::new().with("ifc/*.cppm", &["ifc/math.cppm", "ifc/vec.cppm"]);
        BuildPlan::new(&ctx, &config, &glob).unwrap()
    }

    #[test]
    fn test_runs_every_command_in_order() {
        let tmp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let locator = MockHeaderLocator::missing();
        let plan = full_plan(Platform::Linux);

        let report = BuildExecutor::new(&runner, &locator, tmp.path())
            .execute(&plan)
            .unwrap();

        let expected: Vec<Vec<String>> = plan
            .steps
            .iter()
            .filter_map(|s| s.argv().map(|a| a.to_vec()))
            .collect();
        assert_eq!(runner.calls(), expected);
        assert_eq!(report.commands_run, 6);
        assert_eq!(report.created_dirs, 3);
        assert!(tmp.path().join("build/modules/interfaces").is_dir());
        assert_eq!(report.output, Some(PathBuf::from("build/calc")));
    }

    #[test]
    fn test_fail_fast_on_nonzero_status() {
        let tmp = TempDir::new().unwrap();
        let runner =
            MockRunner::new().fail_when(CommandPattern::Contains("ifc/vec.cppm".into()), 1);
        let locator = MockHeaderLocator::missing();
        let plan = full_plan(Platform::Linux);

        let err = BuildExecutor::new(&runner, &locator, tmp.path())
            .execute(&plan)
            .unwrap_err();

        match err {
            BuildError::ExternalCommandFailed {
                program,
                status,
                command,
            } => {
                assert_eq!(program, "clang++");
                assert_eq!(status, 1);
                assert!(command.ends_with("ifc/vec.cppm"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // math, then vec; nothing after.
        assert_eq!(runner.call_count(), 2);
    }

    #[test]
    fn test_existing_directories_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("build/modules/interfaces")).unwrap();
        fs::create_dir_all(tmp.path().join("build/modules/implementations")).unwrap();

        let runner = MockRunner::new();
        let locator = MockHeaderLocator::missing();
        let report = BuildExecutor::new(&runner, &locator, tmp.path())
            .execute(&full_plan(Platform::Linux))
            .unwrap();
        assert_eq!(report.created_dirs, 0);
    }

    #[test]
    fn test_file_in_place_of_output_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("build"), "not a directory").unwrap();

        let runner = MockRunner::new();
        let locator = MockHeaderLocator::missing();
        let err = BuildExecutor::new(&runner, &locator, tmp.path())
            .execute(&full_plan(Platform::Linux))
            .unwrap_err();

        match err {
            BuildError::Io { path, source } => {
                assert_eq!(path, tmp.path().join("build"));
                assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_module_map_generated_once() {
        let tmp = TempDir::new().unwrap();
        let headers = tmp.path().join("headers");
        fs::create_dir_all(&headers).unwrap();
        fs::write(headers.join("vector"), "").unwrap();

        let runner = MockRunner::new();
        let plan = full_plan(Platform::Windows);

        let found = MockHeaderLocator::found(&headers);
        let first = BuildExecutor::new(&runner, &found, tmp.path())
            .execute(&plan)
            .unwrap();
        assert!(first.module_map_generated);
        assert!(tmp
            .path()
            .join("build/modbuild/intrinsics")
            .join(MODULE_MAP_FILE)
            .is_file());

        let missing = MockHeaderLocator::missing();
        let second = BuildExecutor::new(&runner, &missing, tmp.path())
            .execute(&plan)
            .unwrap();
        assert!(!second.module_map_generated);
    }

    #[test]
    fn test_missing_headers_stop_before_compiling() {
        let tmp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let locator = MockHeaderLocator::missing();

        let err = BuildExecutor::new(&runner, &locator, tmp.path())
            .execute(&full_plan(Platform::Windows))
            .unwrap_err();
        assert!(matches!(err, BuildError::SystemHeadersNotFound { .. }));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let runner = MockRunner::new().unspawnable("clang++ not found");
        let locator = MockHeaderLocator::missing();

        let err = BuildExecutor::new(&runner, &locator, tmp.path())
            .execute(&full_plan(Platform::Linux))
            .unwrap_err();
        assert!(matches!(err, BuildError::Io { ref path, .. } if path == Path::new("clang++")));
    }
}
