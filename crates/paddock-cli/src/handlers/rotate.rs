//! Rotate command handler

use crate::commands::RotateArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_json, OutputFormat};
use paddock::sprite::{RotateReport, SpriteRotator};
use paddock::PaddockConfig;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// JSON view of one rotator entry
#[derive(Debug, Serialize)]
struct OutcomeView<'a> {
    name: &'a str,
    degrees: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<String>,
}

/// JSON view of a rotator run
#[derive(Debug, Serialize)]
struct RotateSummary<'a> {
    metadata_path: &'a PathBuf,
    processed: usize,
    skipped: usize,
    outcomes: Vec<OutcomeView<'a>>,
}

/// Execute the rotate command
pub fn execute_rotate(
    config: &PaddockConfig,
    cli: &CliConfig,
    args: &RotateArgs,
) -> CliResult<RotateReport> {
    let mut config = config.clone();
    args.apply(&mut config);

    let reporter = cli.reporter();
    let started = Instant::now();
    let report = SpriteRotator::new(config.rotate_options()).run()?;

    if cli.output == OutputFormat::Json {
        print_json(&summarize(&report))?;
    } else {
        reporter.header("Rotate");
        reporter.info(&format!("Metadata: {}", report.metadata_path.display()));
        reporter.summary(
            "rotate",
            report.processed_count(),
            report.skipped_count(),
            started.elapsed(),
        );
        println!(
            "processed={}, skipped={}",
            report.processed_count(),
            report.skipped_count()
        );
    }
    Ok(report)
}

fn summarize(report: &RotateReport) -> RotateSummary<'_> {
    RotateSummary {
        metadata_path: &report.metadata_path,
        processed: report.processed_count(),
        skipped: report.skipped_count(),
        outcomes: report
            .outcomes
            .iter()
            .map(|o| OutcomeView {
                name: &o.name,
                degrees: o.degrees,
                output: o.result.as_ref().ok(),
                skipped: o.result.as_ref().err().map(ToString::to_string),
            })
            .collect(),
    }
}
