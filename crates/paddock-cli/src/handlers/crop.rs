//! Crop command handler

use crate::commands::CropArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_json, OutputFormat};
use paddock::sprite::{list_sprites, CropReport, SpriteCropper};
use paddock::PaddockConfig;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// JSON view of a crop run
#[derive(Debug, Serialize)]
struct CropSummary<'a> {
    processed: &'a [String],
    skipped: &'a [(String, String)],
    output_dir: &'a PathBuf,
    metadata_path: &'a PathBuf,
}

/// Execute the crop command
pub fn execute_crop(config: &PaddockConfig, cli: &CliConfig, args: &CropArgs) -> CliResult<CropReport> {
    let mut config = config.clone();
    args.apply(&mut config);
    let options = config.crop_options();

    let mut reporter = cli.reporter();
    let total = list_sprites(&options.sprites_dir).map_or(0, |s| s.len());
    reporter.start_progress(total as u64, "cropping");

    let started = Instant::now();
    // Skips are already logged by the cropper at warn level
    let report = SpriteCropper::new(options).run_with(|name, _| reporter.tick(name));
    reporter.finish();
    let report = report?;

    if cli.output == OutputFormat::Json {
        print_json(&CropSummary {
            processed: &report.metadata.processed,
            skipped: &report.metadata.skipped,
            output_dir: &report.output_dir,
            metadata_path: &report.metadata_path,
        })?;
    } else {
        reporter.header("Crop");
        reporter.summary(
            "crop",
            report.processed_count(),
            report.skipped_count(),
            started.elapsed(),
        );
        reporter.info(&format!("Cropped sprites: {}", report.output_dir.display()));
        reporter.info(&format!("Metadata: {}", report.metadata_path.display()));
        println!(
            "processed={}, skipped={}",
            report.processed_count(),
            report.skipped_count()
        );
    }
    Ok(report)
}
