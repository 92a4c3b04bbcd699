//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// modbuild - a build front end for C++ projects using modules
#[derive(Parser)]
#[command(name = "modbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use this configuration file instead of searching for modbuild.conf
    #[arg(long, global = true, env = "MODBUILD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the project executable
    Build(BuildArgs),

    /// Build the test executable
    Test(BuildArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Emit build plan as JSON (no build)
    #[arg(long)]
    pub plan: bool,

    /// Do not run the produced binary, even if the config asks for it
    #[arg(long)]
    pub no_run: bool,
}
