//! Project configuration (`paddock.yaml`).
//!
//! Every key is optional. Relative paths resolve against `root`, and a
//! relative `root` resolves against the directory holding the config file.
//!
//! ```yaml
//! root: .
//! page: index.html
//! sprites_dir: assets/Car Sprites
//! padding: 2
//! browser:
//!   headless: true
//!   sandbox: false
//! ```

use crate::browser::BrowserConfig;
use crate::result::{PaddockError, PaddockResult};
use crate::sprite::{CropOptions, RotateOptions, DEFAULT_PADDING, METADATA_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "paddock.yaml";

/// Paddock project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddockConfig {
    /// Project root; base for every other relative path
    pub root: PathBuf,
    /// Game page opened by the browser tests
    pub page: PathBuf,
    /// Where screenshots go
    pub artifacts_dir: PathBuf,
    /// Source sprites
    pub sprites_dir: PathBuf,
    /// Cropper output (default `<sprites_dir>/cropped`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cropped_dir: Option<PathBuf>,
    /// Rotator output (default `<cropped_dir>/rotated`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotated_dir: Option<PathBuf>,
    /// Metadata written by the cropper (default `<sprites_dir>/sprite_metadata.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_path: Option<PathBuf>,
    /// Metadata locations the rotator probes, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metadata_candidates: Vec<PathBuf>,
    /// Transparent margin kept around cropped sprites
    pub padding: u32,
    /// Car data file for the variant fixer
    pub data_file: PathBuf,
    /// Browser settings
    pub browser: BrowserConfig,
}

impl Default for PaddockConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            page: PathBuf::from("index.html"),
            artifacts_dir: PathBuf::from("tests/artifacts"),
            sprites_dir: PathBuf::from("assets/Car Sprites"),
            cropped_dir: None,
            rotated_dir: None,
            metadata_path: None,
            metadata_candidates: Vec::new(),
            padding: DEFAULT_PADDING,
            data_file: PathBuf::from("carSpecs.js"),
            browser: BrowserConfig::default(),
        }
    }
}

impl PaddockConfig {
    /// Load a config file
    ///
    /// # Errors
    ///
    /// Unreadable file, invalid YAML, or invalid values.
    pub fn load(path: &Path) -> PaddockResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PaddockError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config: Self = serde_yaml_ng::from_str(&content)?;

        if config.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.root = dir.join(&config.root);
            }
        }
        config.validate()?;
        debug!(path = %path.display(), root = %config.root.display(), "loaded config");
        Ok(config)
    }

    /// Load `explicit` if given, else `cwd/paddock.yaml` if present, else defaults
    ///
    /// # Errors
    ///
    /// An explicit path that cannot be loaded, or a discovered file that is invalid.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> PaddockResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = cwd.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default().with_root(cwd))
        }
    }

    /// Reject values no tool can work with
    ///
    /// # Errors
    ///
    /// [`PaddockError::Config`] describing the first bad value.
    pub fn validate(&self) -> PaddockResult<()> {
        if self.browser.viewport_width == 0 || self.browser.viewport_height == 0 {
            return Err(PaddockError::config("browser viewport must be non-zero"));
        }
        if self.page.as_os_str().is_empty() {
            return Err(PaddockError::config("page must not be empty"));
        }
        Ok(())
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// Serialization failure.
    pub fn to_yaml(&self) -> PaddockResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Replace the project root
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Game page path
    #[must_use]
    pub fn page_path(&self) -> PathBuf {
        self.resolve(&self.page)
    }

    /// Screenshot directory
    #[must_use]
    pub fn artifacts_path(&self) -> PathBuf {
        self.resolve(&self.artifacts_dir)
    }

    /// Source sprite directory
    #[must_use]
    pub fn sprites_path(&self) -> PathBuf {
        self.resolve(&self.sprites_dir)
    }

    /// Cropper output directory
    #[must_use]
    pub fn cropped_path(&self) -> PathBuf {
        match &self.cropped_dir {
            Some(dir) => self.resolve(dir),
            None => self.sprites_path().join("cropped"),
        }
    }

    /// Rotator output directory
    #[must_use]
    pub fn rotated_path(&self) -> PathBuf {
        match &self.rotated_dir {
            Some(dir) => self.resolve(dir),
            None => self.cropped_path().join("rotated"),
        }
    }

    /// Where the cropper writes its metadata
    #[must_use]
    pub fn metadata_output(&self) -> PathBuf {
        match &self.metadata_path {
            Some(path) => self.resolve(path),
            None => self.sprites_path().join(METADATA_FILE),
        }
    }

    /// Metadata locations the rotator probes
    #[must_use]
    pub fn metadata_search(&self) -> Vec<PathBuf> {
        if self.metadata_candidates.is_empty() {
            vec![
                self.cropped_path().join(METADATA_FILE),
                self.sprites_path().join(METADATA_FILE),
            ]
        } else {
            self.metadata_candidates
                .iter()
                .map(|p| self.resolve(p))
                .collect()
        }
    }

    /// Car data file path
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.resolve(&self.data_file)
    }

    /// Cropper settings derived from this config
    #[must_use]
    pub fn crop_options(&self) -> CropOptions {
        CropOptions::new(self.sprites_path())
            .with_output_dir(self.cropped_path())
            .with_metadata_path(self.metadata_output())
            .with_root(&self.root)
            .with_padding(self.padding)
    }

    /// Rotator settings derived from this config
    #[must_use]
    pub fn rotate_options(&self) -> RotateOptions {
        RotateOptions::new(self.sprites_path())
            .with_metadata_candidates(self.metadata_search())
            .with_root(&self.root)
            .with_cropped_dir(self.cropped_path())
            .with_rotated_dir(self.rotated_path())
    }
}
