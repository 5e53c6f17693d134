//! Paddock CLI Library
//!
//! Command-line front end for the Paddock browser tests and sprite tools.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    BrowserArgs, Cli, ColorArg, Commands, ConfigArgs, CropArgs, DriveArgs, FixVariantsArgs,
    RotateArgs, SmokeArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::LogFormat;
pub use output::{print_json, OutputFormat, ProgressReporter};
