//! Build plan generation.
//!
//! A BuildPlan is the ordered list of everything one build does. It walks
//! four phases, never going back to an earlier one:
//!
//! 1. ensure the output directories (and, where needed, the module map)
//! 2. precompile every module interface
//! 3. compile every module implementation
//! 4. link the executable or the test binary
//!
//! Planning does not touch the filesystem apart from glob expansion. Each
//! compiler step carries its complete argument vector.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::context::BuildContext;
use crate::builder::errors::BuildError;
use crate::builder::toolchain::{CompileInput, LinkInput};
use crate::core::config::{BuildMode, ResolvedConfig, TargetConfig};
use crate::resolver::{resolve_modules, ModuleGraph};
use crate::util::fs::FileGlob;

/// Planning phase a step belongs to, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    EnsureOutputDirectories,
    PrecompileInterfaces,
    CompileImplementations,
    LinkFinal,
}

/// A complete build plan.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub mode: BuildMode,
    /// All build steps in execution order
    pub steps: Vec<BuildStep>,
}

/// A build step in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildStep {
    /// Create a directory unless it exists
    EnsureDirectory(DirectoryStep),
    /// Write the system header module map unless it exists
    GenerateModuleMap(ModuleMapStep),
    /// Precompile a module interface
    PrecompileInterface(CompileStep),
    /// Compile a module implementation
    CompileImplementation(CompileStep),
    /// Link the main executable
    LinkExecutable(LinkStep),
    /// Link the test executable
    LinkTests(LinkStep),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryStep {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleMapStep {
    /// Directory receiving `std.h` and the module map
    pub dir: PathBuf,
    /// Configured system header directory, located at run time if absent
    pub system_headers: Option<PathBuf>,
}

/// A single compiler invocation for one module unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileStep {
    /// Module name
    pub module: String,
    pub source: PathBuf,
    pub output: PathBuf,
    /// Full command line, program first
    pub argv: Vec<String>,
}

/// The final link invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStep {
    pub output: PathBuf,
    /// Full command line, program first
    pub argv: Vec<String>,
}

impl BuildStep {
    pub fn phase(&self) -> Phase {
        match self {
            BuildStep::EnsureDirectory(_) | BuildStep::GenerateModuleMap(_) => {
                Phase::EnsureOutputDirectories
            }
            BuildStep::PrecompileInterface(_) => Phase::PrecompileInterfaces,
            BuildStep::CompileImplementation(_) => Phase::CompileImplementations,
            BuildStep::LinkExecutable(_) | BuildStep::LinkTests(_) => Phase::LinkFinal,
        }
    }

    /// The command line for compiler steps.
    pub fn argv(&self) -> Option<&[String]> {
        match self {
            BuildStep::PrecompileInterface(step) | BuildStep::CompileImplementation(step) => {
                Some(&step.argv)
            }
            BuildStep::LinkExecutable(step) | BuildStep::LinkTests(step) => Some(&step.argv),
            BuildStep::EnsureDirectory(_) | BuildStep::GenerateModuleMap(_) => None,
        }
    }

    /// Short human readable summary for progress output.
    pub fn describe(&self) -> String {
        match self {
            BuildStep::EnsureDirectory(step) => format!("create {}", step.path.display()),
            BuildStep::GenerateModuleMap(step) => {
                format!("generate module map in {}", step.dir.display())
            }
            BuildStep::PrecompileInterface(step) => format!("precompile {}", step.module),
            BuildStep::CompileImplementation(step) => {
                format!("compile {}", step.source.display())
            }
            BuildStep::LinkExecutable(step) | BuildStep::LinkTests(step) => {
                format!("link {}", step.output.display())
            }
        }
    }
}

impl BuildPlan {
    /// Plan a build of `config` in the context's mode.
    pub fn new(
        ctx: &BuildContext,
        config: &ResolvedConfig,
        glob: &dyn FileGlob,
    ) -> Result<Self, BuildError> {
        let layout = &ctx.layout;
        let toolchain = ctx.toolchain();
        let modules = config.language.modules;
        let mut steps = Vec::new();

        // Phase 1
        steps.push(ensure_dir(&layout.output_dir));
        if modules {
            steps.push(ensure_dir(&layout.interfaces_dir));
            steps.push(ensure_dir(&layout.implementations_dir));
        }
        if ctx.platform.needs_intrinsics() {
            steps.push(ensure_dir(&layout.intrinsics_dir));
            steps.push(BuildStep::GenerateModuleMap(ModuleMapStep {
                dir: layout.intrinsics_dir.clone(),
                system_headers: config.compiler.system_headers_path.clone(),
            }));
        }

        let graph = if modules {
            resolve_modules(&config.modules, glob)?
        } else {
            ModuleGraph::default()
        };

        let interface_artifact = |name: &str| {
            layout
                .interfaces_dir
                .join(format!("{}.{}", name, toolchain.interface_extension()))
        };

        // Phase 2
        let mut interfaces = Vec::new();
        for unit in &graph.interfaces {
            let module = unit.name();
            let input = CompileInput {
                source: unit.source_path.clone(),
                output: interface_artifact(module.as_str()),
                module_files: unit
                    .dependencies
                    .iter()
                    .map(|d| interface_artifact(d.as_str()))
                    .collect(),
            };
            let argv = toolchain.precompile_command(&input).into_argv();
            tracing::debug!("precompile {}: {}", module, argv.join(" "));

            interfaces.push(input.output.clone());
            steps.push(BuildStep::PrecompileInterface(CompileStep {
                module,
                source: input.source,
                output: input.output,
                argv,
            }));
        }

        // Phase 3
        let mut objects = Vec::new();
        for unit in &graph.implementations {
            let module = unit.name();
            let input = CompileInput {
                source: unit.source_path.clone(),
                output: layout
                    .implementations_dir
                    .join(format!("{}.{}", module, toolchain.object_extension())),
                module_files: unit
                    .dependencies
                    .iter()
                    .map(|d| interface_artifact(d.as_str()))
                    .collect(),
            };
            let argv = toolchain.compile_command(&input).into_argv();
            tracing::debug!("compile {}: {}", unit.source_path.display(), argv.join(" "));

            objects.push(input.output.clone());
            steps.push(BuildStep::CompileImplementation(CompileStep {
                module,
                source: input.source,
                output: input.output,
                argv,
            }));
        }

        // Phase 4
        let target = config.target(ctx.mode);
        let output = layout
            .output_dir
            .join(format!("{}{}", target.name, ctx.platform.exe_extension()));
        let link = LinkInput {
            output: output.clone(),
            extra_args: target.extra_args.clone(),
            sources: target_sources(target, glob)?,
            interfaces,
            objects,
            prebuilt_module_path: modules.then(|| layout.interfaces_dir.clone()),
        };
        let argv = toolchain.link_command(&link).into_argv();
        tracing::debug!("link {}: {}", output.display(), argv.join(" "));

        let link_step = LinkStep { output, argv };
        steps.push(match ctx.mode {
            BuildMode::Executable => BuildStep::LinkExecutable(link_step),
            BuildMode::Tests => BuildStep::LinkTests(link_step),
        });

        Ok(BuildPlan {
            mode: ctx.mode,
            steps,
        })
    }

    /// Number of compiler invocations before the link.
    pub fn compile_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| {
                matches!(
                    s.phase(),
                    Phase::PrecompileInterfaces | Phase::CompileImplementations
                )
            })
            .count()
    }

    /// Number of link invocations.
    pub fn link_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.phase() == Phase::LinkFinal)
            .count()
    }

    /// Number of steps that run an external command.
    pub fn command_count(&self) -> usize {
        self.steps.iter().filter(|s| s.argv().is_some()).count()
    }

    /// Path of the binary the plan links.
    pub fn output(&self) -> Option<&Path> {
        self.steps.iter().rev().find_map(|s| match s {
            BuildStep::LinkExecutable(step) | BuildStep::LinkTests(step) => {
                Some(step.output.as_path())
            }
            _ => None,
        })
    }

    /// Whether the phases never go backwards.
    pub fn is_phase_ordered(&self) -> bool {
        self.steps.windows(2).all(|w| w[0].phase() <= w[1].phase())
    }
}

fn ensure_dir(path: &Path) -> BuildStep {
    BuildStep::EnsureDirectory(DirectoryStep {
        path: path.to_path_buf(),
    })
}

/// Ordinary sources of the link target, patterns expanded.
fn target_sources(
    target: &TargetConfig,
    glob: &dyn FileGlob,
) -> Result<Vec<PathBuf>, BuildError> {
    let mut sources = Vec::new();
    for source in &target.sources {
        let path = target.sources_base_path.join(source);
        if !source.contains(['*', '?']) {
            sources.push(path);
            continue;
        }
        let matches = glob.expand(&path).map_err(|e| BuildError::Glob {
            pattern: path.display().to_string(),
            message: format!("{:#}", e),
        })?;
        if matches.is_empty() {
            tracing::warn!("`{}` matched no sources", path.display());
        }
        sources.extend(matches);
    }
    Ok(sources)
}
