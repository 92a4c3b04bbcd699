//! modbuild CLI - build C++ projects made of modules

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use modbuild::builder::BuildError;
use modbuild::parser::ConfigError;
use modbuild::util::context::ConfigNotFound;
use modbuild::util::diagnostic::emit;
use modbuild::util::GlobalContext;

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("modbuild=debug")
    } else {
        EnvFilter::new("modbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let ctx = match commands::global_context(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            report(&e, !cli.no_color, None);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&ctx, cli.command) {
        let config_path = ctx.find_config().ok();
        report(&e, ctx.color(), config_path.as_deref());
        std::process::exit(1);
    }
}

fn run(ctx: &GlobalContext, command: Commands) -> Result<()> {
    match command {
        Commands::Build(args) => commands::build::execute(ctx, args),
        Commands::Test(args) => commands::test::execute(ctx, args),
    }
}

/// Render typed errors as diagnostics, anything else as a plain chain.
///
/// Configuration errors point at the file they were found in.
fn report(err: &anyhow::Error, color: bool, config_path: Option<&Path>) {
    if let Some(e) = err.downcast_ref::<ConfigError>() {
        let mut diag = e.to_diagnostic();
        if let Some(path) = config_path {
            diag = diag.with_location(path);
        }
        emit(&diag, color);
    } else if let Some(e) = err.downcast_ref::<BuildError>() {
        emit(&e.to_diagnostic(), color);
    } else if let Some(e) = err.downcast_ref::<ConfigNotFound>() {
        emit(&e.to_diagnostic(), color);
    } else {
        eprintln!("error: {:#}", err);
    }
}
