//! Config command handler

use crate::commands::ConfigArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_json, OutputFormat};
use paddock::PaddockConfig;
use serde::Serialize;
use std::path::PathBuf;

/// Every path a tool would touch
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Game page
    pub page: PathBuf,
    /// Screenshot directory
    pub artifacts: PathBuf,
    /// Source sprites
    pub sprites: PathBuf,
    /// Cropper output
    pub cropped: PathBuf,
    /// Rotator output
    pub rotated: PathBuf,
    /// Cropper metadata
    pub metadata: PathBuf,
    /// Rotator metadata search order
    pub metadata_search: Vec<PathBuf>,
    /// Car data file
    pub data_file: PathBuf,
}

impl ResolvedPaths {
    /// Resolve every path in `config`
    #[must_use]
    pub fn from_config(config: &PaddockConfig) -> Self {
        Self {
            page: config.page_path(),
            artifacts: config.artifacts_path(),
            sprites: config.sprites_path(),
            cropped: config.cropped_path(),
            rotated: config.rotated_path(),
            metadata: config.metadata_output(),
            metadata_search: config.metadata_search(),
            data_file: config.data_path(),
        }
    }
}

/// Execute the config command
pub fn execute_config(config: &PaddockConfig, cli: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    let shown = if args.default {
        PaddockConfig::default()
    } else {
        config.clone()
    };

    if cli.output == OutputFormat::Json {
        #[derive(Serialize)]
        struct View<'a> {
            config: &'a PaddockConfig,
            #[serde(skip_serializing_if = "Option::is_none")]
            paths: Option<ResolvedPaths>,
        }
        let paths = args.paths.then(|| ResolvedPaths::from_config(&shown));
        return print_json(&View {
            config: &shown,
            paths,
        });
    }

    print!("{}", shown.to_yaml()?);
    if args.paths {
        print_paths(&ResolvedPaths::from_config(&shown));
    }
    Ok(())
}

fn print_paths(paths: &ResolvedPaths) {
    println!();
    println!("# resolved paths");
    println!("#   page:      {}", paths.page.display());
    println!("#   artifacts: {}", paths.artifacts.display());
    println!("#   sprites:   {}", paths.sprites.display());
    println!("#   cropped:   {}", paths.cropped.display());
    println!("#   rotated:   {}", paths.rotated.display());
    println!("#   metadata:  {}", paths.metadata.display());
    for candidate in &paths.metadata_search {
        println!("#   search:    {}", candidate.display());
    }
    println!("#   data file: {}", paths.data_file.display());
}
