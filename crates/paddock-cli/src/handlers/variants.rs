//! Fix-variants command handler

use crate::commands::FixVariantsArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{print_json, OutputFormat};
use paddock::{PaddockConfig, VariantFixReport, VariantFixer};
use serde::Serialize;
use std::path::PathBuf;

/// JSON view of a fixer run
#[derive(Debug, Serialize)]
struct FixSummary<'a> {
    input: &'a PathBuf,
    output: &'a PathBuf,
    replacements: usize,
}

/// Execute the fix-variants command
pub fn execute_fix_variants(
    config: &PaddockConfig,
    cli: &CliConfig,
    args: &FixVariantsArgs,
) -> CliResult<VariantFixReport> {
    let input = args.file.clone().unwrap_or_else(|| config.data_path());
    if !input.is_file() {
        return Err(CliError::invalid_argument(format!(
            "data file not found: {}",
            input.display()
        )));
    }

    let report = VariantFixer::new()?.fix_file(&input)?;

    if cli.output == OutputFormat::Json {
        print_json(&FixSummary {
            input: &input,
            output: &report.output,
            replacements: report.replacements,
        })?;
    } else {
        cli.reporter().success(&format!(
            "Cleared {} variant field(s) in {}",
            report.replacements,
            input.display()
        ));
        println!("Wrote {}", report.output.display());
    }
    Ok(report)
}
