//! CLI command definitions using clap

use crate::logging::LogFormat;
use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use paddock::PaddockConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Paddock: browser tests and sprite tools for the driving game
#[derive(Parser, Debug)]
#[command(name = "paddock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Result format on stdout
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value = "compact", global = true)]
    pub log_format: LogFormat,

    /// Config file (default: ./paddock.yaml when present)
    #[arg(long = "config", global = true, value_parser = absolute_path)]
    pub config_file: Option<PathBuf>,

    /// Project root, overriding the config file
    #[arg(long, global = true, value_parser = absolute_path)]
    pub root: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the car and check that the HUD reacts
    Drive(DriveArgs),

    /// Load the game page and take a screenshot
    Smoke(SmokeArgs),

    /// Crop sprites to their opaque pixels and suggest rotations
    Crop(CropArgs),

    /// Apply the cropper's rotation suggestions
    Rotate(RotateArgs),

    /// Clear two-digit variant codes in the car data file
    FixVariants(FixVariantsArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Resolve a relative CLI path against the working directory
fn absolute_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        return Ok(path);
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|e| format!("cannot resolve {value}: {e}"))
}

/// Options shared by the browser scenarios
#[derive(Args, Debug, Clone, Default)]
pub struct BrowserArgs {
    /// Game page to open
    #[arg(long, value_parser = absolute_path)]
    pub page: Option<PathBuf>,

    /// Screenshot directory
    #[arg(long, value_parser = absolute_path)]
    pub artifacts: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the Chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Chromium binary to launch
    #[arg(long)]
    pub chromium: Option<String>,

    /// Seconds to wait for the viewport element
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl BrowserArgs {
    /// Fold the flags into `config`
    pub fn apply(&self, config: &mut PaddockConfig) {
        if let Some(ref page) = self.page {
            config.page.clone_from(page);
        }
        if let Some(ref artifacts) = self.artifacts {
            config.artifacts_dir.clone_from(artifacts);
        }
        if self.headed {
            config.browser.headless = false;
        }
        if self.no_sandbox {
            config.browser.sandbox = false;
        }
        if let Some(ref chromium) = self.chromium {
            config.browser.chromium_path = Some(chromium.clone());
        }
    }

    /// Selector wait budget
    #[must_use]
    pub const fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Arguments for the drive command
#[derive(Parser, Debug)]
pub struct DriveArgs {
    /// Browser options
    #[command(flatten)]
    pub browser: BrowserArgs,
}

/// Arguments for the smoke command
#[derive(Parser, Debug)]
pub struct SmokeArgs {
    /// Browser options
    #[command(flatten)]
    pub browser: BrowserArgs,
}

/// Arguments for the crop command
#[derive(Parser, Debug, Default)]
pub struct CropArgs {
    /// Directory of source sprites
    #[arg(long, value_parser = absolute_path)]
    pub sprites: Option<PathBuf>,

    /// Directory for cropped sprites
    #[arg(short, long, value_parser = absolute_path)]
    pub output: Option<PathBuf>,

    /// Metadata file to write
    #[arg(long, value_parser = absolute_path)]
    pub metadata: Option<PathBuf>,

    /// Transparent margin in pixels
    #[arg(long)]
    pub padding: Option<u32>,
}

impl CropArgs {
    /// Fold the flags into `config`
    pub fn apply(&self, config: &mut PaddockConfig) {
        if let Some(ref sprites) = self.sprites {
            config.sprites_dir.clone_from(sprites);
        }
        if let Some(ref output) = self.output {
            config.cropped_dir = Some(output.clone());
        }
        if let Some(ref metadata) = self.metadata {
            config.metadata_path = Some(metadata.clone());
        }
        if let Some(padding) = self.padding {
            config.padding = padding;
        }
    }
}

/// Arguments for the rotate command
#[derive(Parser, Debug, Default)]
pub struct RotateArgs {
    /// Directory of source sprites
    #[arg(long, value_parser = absolute_path)]
    pub sprites: Option<PathBuf>,

    /// Directory of cropped sprites
    #[arg(long, value_parser = absolute_path)]
    pub cropped: Option<PathBuf>,

    /// Metadata file to try (repeatable, first existing wins)
    #[arg(long, value_parser = absolute_path)]
    pub metadata: Vec<PathBuf>,

    /// Directory for rotated sprites
    #[arg(short, long, value_parser = absolute_path)]
    pub output: Option<PathBuf>,
}

impl RotateArgs {
    /// Fold the flags into `config`
    pub fn apply(&self, config: &mut PaddockConfig) {
        if let Some(ref sprites) = self.sprites {
            config.sprites_dir.clone_from(sprites);
        }
        if let Some(ref cropped) = self.cropped {
            config.cropped_dir = Some(cropped.clone());
        }
        if !self.metadata.is_empty() {
            config.metadata_candidates.clone_from(&self.metadata);
        }
        if let Some(ref output) = self.output {
            config.rotated_dir = Some(output.clone());
        }
    }
}

/// Arguments for the fix-variants command
#[derive(Parser, Debug, Default)]
pub struct FixVariantsArgs {
    /// Data file to fix (default: `data_file` from the config)
    #[arg(value_parser = absolute_path)]
    pub file: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug, Default)]
pub struct ConfigArgs {
    /// Print the built-in defaults instead of the effective config
    #[arg(long)]
    pub default: bool,

    /// Also list every resolved path
    #[arg(long)]
    pub paths: bool,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::path::Path;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_drive_command() {
            let cli = Cli::parse_from(["paddock", "drive"]);
            if let Commands::Drive(args) = cli.command {
                assert!(args.browser.page.is_none());
                assert_eq!(args.browser.timeout, 30);
            } else {
                panic!("expected Drive command");
            }
        }

        #[test]
        fn test_parse_smoke_with_browser_flags() {
            let cli = Cli::parse_from([
                "paddock",
                "smoke",
                "--headed",
                "--no-sandbox",
                "--chromium",
                "/usr/bin/chromium",
            ]);
            if let Commands::Smoke(args) = cli.command {
                assert!(args.browser.headed);
                assert!(args.browser.no_sandbox);
                assert_eq!(args.browser.chromium.as_deref(), Some("/usr/bin/chromium"));
            } else {
                panic!("expected Smoke command");
            }
        }

        #[test]
        fn test_relative_paths_become_absolute() {
            let cli = Cli::parse_from(["paddock", "crop", "--sprites", "art/cars"]);
            if let Commands::Crop(args) = cli.command {
                let sprites = args.sprites.unwrap();
                assert!(sprites.is_absolute());
                assert!(sprites.ends_with("art/cars"));
            } else {
                panic!("expected Crop command");
            }
        }

        #[test]
        fn test_parse_rotate_repeated_metadata() {
            let cli = Cli::parse_from([
                "paddock",
                "rotate",
                "--metadata",
                "/a.json",
                "--metadata",
                "/b.json",
            ]);
            if let Commands::Rotate(args) = cli.command {
                assert_eq!(
                    args.metadata,
                    vec![PathBuf::from("/a.json"), PathBuf::from("/b.json")]
                );
            } else {
                panic!("expected Rotate command");
            }
        }

        #[test]
        fn test_parse_fix_variants() {
            let cli = Cli::parse_from(["paddock", "fix-variants", "/game/carSpecs.js"]);
            if let Commands::FixVariants(args) = cli.command {
                assert_eq!(args.file, Some(PathBuf::from("/game/carSpecs.js")));
            } else {
                panic!("expected FixVariants command");
            }
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::parse_from([
                "paddock", "config", "-vv", "--format", "json", "--color", "never",
            ]);
            assert_eq!(cli.verbose, 2);
            assert_eq!(cli.format, OutputFormat::Json);
            assert!(matches!(cli.color, ColorArg::Never));
            assert_eq!(cli.log_format, LogFormat::Compact);
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["paddock"]).is_err());
        }
    }

    mod apply_tests {
        use super::*;

        #[test]
        fn test_browser_args_apply() {
            let mut config = PaddockConfig::default();
            BrowserArgs {
                page: Some(PathBuf::from("/game/index.html")),
                headed: true,
                no_sandbox: true,
                ..BrowserArgs::default()
            }
            .apply(&mut config);

            assert_eq!(config.page_path(), Path::new("/game/index.html"));
            assert!(!config.browser.headless);
            assert!(!config.browser.sandbox);
            assert_eq!(config.artifacts_dir, PaddockConfig::default().artifacts_dir);
        }

        #[test]
        fn test_crop_args_apply() {
            let mut config = PaddockConfig::default();
            CropArgs {
                output: Some(PathBuf::from("/out")),
                padding: Some(0),
                ..CropArgs::default()
            }
            .apply(&mut config);

            assert_eq!(config.cropped_path(), Path::new("/out"));
            assert_eq!(config.padding, 0);
        }

        #[test]
        fn test_rotate_args_apply() {
            let mut config = PaddockConfig::default().with_root("/game");
            RotateArgs {
                metadata: vec![PathBuf::from("/m.json")],
                ..RotateArgs::default()
            }
            .apply(&mut config);

            assert_eq!(config.metadata_search(), vec![PathBuf::from("/m.json")]);
            assert_eq!(
                config.rotated_path(),
                Path::new("/game/assets/Car Sprites/cropped/rotated")
            );
        }
    }
}
