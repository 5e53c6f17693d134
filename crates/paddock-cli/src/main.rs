//! Paddock CLI: browser tests and sprite tools for the driving game
//!
//! ## Usage
//!
//! ```bash
//! paddock drive                      # Hold the throttle, assert the HUD reacts
//! paddock smoke                      # Load the page, save a screenshot
//! paddock crop                       # Crop sprites to their opaque pixels
//! paddock rotate                     # Apply the cropper's rotation hints
//! paddock fix-variants carSpecs.js   # Clear two-digit variant codes
//! paddock config --paths             # Show the effective configuration
//! ```

use clap::Parser;
use paddock::PaddockConfig;
use paddock_cli::{handlers, logging, Cli, CliConfig, CliError, CliResult, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    logging::init(config.verbosity, config.log_format)?;
    let project = load_project(&cli)?;

    match cli.command {
        Commands::Drive(ref args) => handlers::execute_drive(&project, &config, args),
        Commands::Smoke(ref args) => handlers::execute_smoke(&project, &config, args),
        Commands::Crop(ref args) => handlers::execute_crop(&project, &config, args).map(drop),
        Commands::Rotate(ref args) => handlers::execute_rotate(&project, &config, args).map(drop),
        Commands::FixVariants(ref args) => {
            handlers::execute_fix_variants(&project, &config, args).map(drop)
        }
        Commands::Config(ref args) => handlers::execute_config(&project, &config, args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.clone().into())
        .with_output(cli.format)
        .with_log_format(cli.log_format)
}

fn load_project(cli: &Cli) -> CliResult<PaddockConfig> {
    let cwd = std::env::current_dir()
        .map_err(|e| CliError::setup(format!("cannot read working directory: {e}")))?;
    let mut project = PaddockConfig::discover(cli.config_file.as_deref(), &cwd)?;
    if let Some(ref root) = cli.root {
        project.root.clone_from(root);
    }
    tracing::debug!(root = %project.root.display(), "project configuration loaded");
    Ok(project)
}
