//! Alpha-channel auto-cropper.

use super::bbox::{alpha_bbox, suggest_rotation, BoundingBox};
use super::metadata::{SpriteEntry, SpriteMetadata, METADATA_FILE};
use super::{file_name, list_sprites, SkipReason};
use crate::result::{PaddockError, PaddockResult};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Transparent margin kept around the opaque content
pub const DEFAULT_PADDING: u32 = 2;

/// Cropper configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropOptions {
    /// Directory scanned for `*.png`
    pub sprites_dir: PathBuf,
    /// Where cropped copies go
    pub output_dir: PathBuf,
    /// Where the metadata record goes
    pub metadata_path: PathBuf,
    /// Base that `out_path` entries are made relative to
    pub root: PathBuf,
    /// Margin around the alpha bounding box
    pub padding: u32,
}

impl CropOptions {
    /// Defaults for a sprites directory: `cropped/` output, metadata beside
    /// the sprites, paths relative to the current directory
    #[must_use]
    pub fn new(sprites_dir: impl Into<PathBuf>) -> Self {
        let sprites_dir = sprites_dir.into();
        Self {
            output_dir: sprites_dir.join("cropped"),
            metadata_path: sprites_dir.join(METADATA_FILE),
            root: PathBuf::from("."),
            padding: DEFAULT_PADDING,
            sprites_dir,
        }
    }

    /// Set the output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the metadata path
    #[must_use]
    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = path.into();
        self
    }

    /// Set the project root
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the padding
    #[must_use]
    pub const fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }
}

/// A sprite cut down to its padded alpha bounding box
#[derive(Debug, Clone)]
pub struct CroppedSprite {
    /// Cropped pixels
    pub image: RgbaImage,
    /// `(width, height)` of the source
    pub original_size: (u32, u32),
    /// Padded crop rectangle in source coordinates
    pub crop_bbox: BoundingBox,
    /// Suggested clockwise rotation
    pub rotation: i32,
}

impl CroppedSprite {
    /// `(width, height)` after cropping
    #[must_use]
    pub fn cropped_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Outcome of a cropper run
#[derive(Debug, Clone)]
pub struct CropReport {
    /// The record that was written
    pub metadata: SpriteMetadata,
    /// Where cropped sprites were written
    pub output_dir: PathBuf,
    /// Where the record was written
    pub metadata_path: PathBuf,
}

impl CropReport {
    /// Number of sprites cropped
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.metadata.processed.len()
    }

    /// Number of sprites skipped
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.metadata.skipped.len()
    }
}

/// Batch auto-cropper
#[derive(Debug, Clone)]
pub struct SpriteCropper {
    options: CropOptions,
}

impl SpriteCropper {
    /// Create a cropper
    #[must_use]
    pub const fn new(options: CropOptions) -> Self {
        Self { options }
    }

    /// Cropper configuration
    #[must_use]
    pub const fn options(&self) -> &CropOptions {
        &self.options
    }

    /// Crop one image to its padded alpha bounding box
    ///
    /// `None` when the image has no visible pixel.
    #[must_use]
    pub fn crop(&self, image: &DynamicImage) -> Option<CroppedSprite> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let bbox = alpha_bbox(&rgba)?.padded(self.options.padding, width, height);

        let cropped = image::imageops::crop_imm(
            &rgba,
            bbox.left,
            bbox.upper,
            bbox.width(),
            bbox.height(),
        )
        .to_image();

        Some(CroppedSprite {
            rotation: suggest_rotation(cropped.width(), cropped.height()),
            image: cropped,
            original_size: (width, height),
            crop_bbox: bbox,
        })
    }

    /// Crop every sprite and write the metadata record
    ///
    /// # Errors
    ///
    /// Only for batch-level faults: unreadable sprites directory, output
    /// directory that cannot be created, or a metadata write failure.
    pub fn run(&self) -> PaddockResult<CropReport> {
        self.run_with(|_, _| {})
    }

    /// Like [`Self::run`], calling `on_sprite` after each file
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub fn run_with<F>(&self, mut on_sprite: F) -> PaddockResult<CropReport>
    where
        F: FnMut(&str, Result<&SpriteEntry, &SkipReason>),
    {
        let sprites = list_sprites(&self.options.sprites_dir).map_err(|e| {
            PaddockError::config(format!(
                "cannot read sprites directory {}: {e}",
                self.options.sprites_dir.display()
            ))
        })?;
        std::fs::create_dir_all(&self.options.output_dir)?;

        let mut metadata = SpriteMetadata::new();
        for path in &sprites {
            let name = file_name(path);
            match self.process(path, &name) {
                Ok(entry) => {
                    info!(
                        sprite = %name,
                        size = ?entry.cropped_size,
                        rotation = entry.rotation_suggestion_degrees,
                        "cropped"
                    );
                    on_sprite(&name, Ok(&entry));
                    metadata.record_processed(name, entry);
                }
                Err(reason) => {
                    warn!(sprite = %name, %reason, "skipped");
                    on_sprite(&name, Err(&reason));
                    metadata.record_skipped(name, reason);
                }
            }
        }

        metadata.save(&self.options.metadata_path)?;
        info!(
            processed = metadata.processed.len(),
            skipped = metadata.skipped.len(),
            metadata = %self.options.metadata_path.display(),
            "crop complete"
        );

        Ok(CropReport {
            metadata,
            output_dir: self.options.output_dir.clone(),
            metadata_path: self.options.metadata_path.clone(),
        })
    }

    fn process(&self, path: &Path, name: &str) -> Result<SpriteEntry, SkipReason> {
        let image = image::open(path).map_err(|e| SkipReason::OpenFailed(e.to_string()))?;
        let sprite = self.crop(&image).ok_or(SkipReason::EmptyAlpha)?;

        let out_path = self.options.output_dir.join(name);
        sprite
            .image
            .save_with_format(&out_path, ImageFormat::Png)
            .map_err(|e| SkipReason::SaveFailed(e.to_string()))?;

        Ok(SpriteEntry {
            original_size: sprite.original_size,
            cropped_size: sprite.cropped_size(),
            crop_bbox: sprite.crop_bbox,
            rotation_suggestion_degrees: sprite.rotation,
            out_path: Some(self.relative_to_root(&out_path)),
        })
    }

    fn relative_to_root(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.options.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}
