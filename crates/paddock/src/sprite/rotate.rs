//! Apply the cropper's rotation suggestions.
//!
//! Suggestions are clockwise degrees. Quarter turns are exact pixel
//! permutations, so rerunning the rotator reproduces its outputs byte for
//! byte. Other angles go through a nearest-neighbour inverse mapping onto an
//! expanded, transparent canvas.

use super::metadata::{SpriteMetadata, METADATA_FILE};
use super::{SkipReason, SpriteEntry};
use crate::result::{PaddockError, PaddockResult};
use image::{imageops, ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Rotator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotateOptions {
    /// Metadata locations, probed in order
    pub metadata_candidates: Vec<PathBuf>,
    /// Base for relative `out_path` entries
    pub root: PathBuf,
    /// Cropper output directory (first fallback source)
    pub cropped_dir: PathBuf,
    /// Original sprites directory (last fallback source)
    pub sprites_dir: PathBuf,
    /// Where rotated copies go
    pub rotated_dir: PathBuf,
}

impl RotateOptions {
    /// Defaults for a sprites directory: metadata probed in `cropped/` then
    /// beside the sprites, output to `cropped/rotated/`
    #[must_use]
    pub fn new(sprites_dir: impl Into<PathBuf>) -> Self {
        let sprites_dir = sprites_dir.into();
        let cropped_dir = sprites_dir.join("cropped");
        Self {
            metadata_candidates: vec![
                cropped_dir.join(METADATA_FILE),
                sprites_dir.join(METADATA_FILE),
            ],
            root: PathBuf::from("."),
            rotated_dir: cropped_dir.join("rotated"),
            cropped_dir,
            sprites_dir,
        }
    }

    /// Replace the metadata candidates
    #[must_use]
    pub fn with_metadata_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.metadata_candidates = candidates;
        self
    }

    /// Set the project root
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the cropped directory
    #[must_use]
    pub fn with_cropped_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cropped_dir = dir.into();
        self
    }

    /// Set the output directory
    #[must_use]
    pub fn with_rotated_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.rotated_dir = dir.into();
        self
    }
}

/// First existing metadata file among `candidates`
///
/// # Errors
///
/// [`PaddockError::MetadataNotFound`] when none exist.
pub fn locate_metadata(candidates: &[PathBuf]) -> PaddockResult<PathBuf> {
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| PaddockError::MetadataNotFound {
            searched: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Canvas size that holds a `width`×`height` image turned by `degrees`
#[must_use]
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let normalized = degrees.rem_euclid(360.0);
    let near = |target: f64| (normalized - target).abs() < 0.001;

    if near(0.0) || near(360.0) || near(180.0) {
        return (width, height);
    }
    if near(90.0) || near(270.0) {
        return (height, width);
    }

    let (sin, cos) = degrees.to_radians().sin_cos();
    let (w, h) = (f64::from(width), f64::from(height));
    let new_w = (w * cos.abs() + h * sin.abs()).round() as u32;
    let new_h = (w * sin.abs() + h * cos.abs()).round() as u32;
    (new_w.max(1), new_h.max(1))
}

/// Rotate clockwise by `degrees`, expanding the frame so nothing is clipped
#[must_use]
pub fn rotate_clockwise(image: &RgbaImage, degrees: i32) -> RgbaImage {
    match degrees.rem_euclid(360) {
        0 => image.clone(),
        90 => imageops::rotate90(image),
        180 => imageops::rotate180(image),
        270 => imageops::rotate270(image),
        other => rotate_any(image, f64::from(other)),
    }
}

fn rotate_any(image: &RgbaImage, degrees: f64) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (out_w, out_h) = rotated_bounds(width, height, degrees);
    let (sin, cos) = degrees.to_radians().sin_cos();

    let (src_cx, src_cy) = (f64::from(width) / 2.0, f64::from(height) / 2.0);
    let (dst_cx, dst_cy) = (f64::from(out_w) / 2.0, f64::from(out_h) / 2.0);

    let mut out = RgbaImage::new(out_w, out_h);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let dx = f64::from(x) + 0.5 - dst_cx;
        let dy = f64::from(y) + 0.5 - dst_cy;
        // Inverse of a clockwise turn with y pointing down
        let sx = dx * cos + dy * sin + src_cx;
        let sy = -dx * sin + dy * cos + src_cy;
        if sx >= 0.0 && sy >= 0.0 && sx < f64::from(width) && sy < f64::from(height) {
            *pixel = *image.get_pixel(sx as u32, sy as u32);
        }
    }
    out
}

/// What happened to one metadata entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotateOutcome {
    /// Sprite file name
    pub name: String,
    /// Suggested clockwise degrees
    pub degrees: i32,
    /// Written path, or why nothing was written
    pub result: Result<PathBuf, SkipReason>,
}

/// Outcome of a rotator run
#[derive(Debug, Clone)]
pub struct RotateReport {
    /// Metadata file that was used
    pub metadata_path: PathBuf,
    /// One outcome per metadata entry, sorted by name
    pub outcomes: Vec<RotateOutcome>,
}

impl RotateReport {
    /// Number of sprites written
    #[must_use]
    pub fn processed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of entries skipped for any reason
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.processed_count()
    }
}

/// Batch rotator
#[derive(Debug, Clone)]
pub struct SpriteRotator {
    options: RotateOptions,
}

impl SpriteRotator {
    /// Create a rotator
    #[must_use]
    pub const fn new(options: RotateOptions) -> Self {
        Self { options }
    }

    /// Rotator configuration
    #[must_use]
    pub const fn options(&self) -> &RotateOptions {
        &self.options
    }

    /// Rotate every sprite with a non-trivial suggestion
    ///
    /// # Errors
    ///
    /// Missing or unreadable metadata, or an output directory that cannot
    /// be created. Per-sprite failures are reported in the outcomes.
    pub fn run(&self) -> PaddockResult<RotateReport> {
        self.run_with(|_| {})
    }

    /// Like [`Self::run`], calling `on_sprite` after each entry
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub fn run_with<F>(&self, mut on_sprite: F) -> PaddockResult<RotateReport>
    where
        F: FnMut(&RotateOutcome),
    {
        let metadata_path = locate_metadata(&self.options.metadata_candidates)?;
        let metadata = SpriteMetadata::load(&metadata_path)?;
        std::fs::create_dir_all(&self.options.rotated_dir)?;
        info!(metadata = %metadata_path.display(), entries = metadata.meta.len(), "rotating");

        let mut outcomes = Vec::with_capacity(metadata.meta.len());
        for (name, entry) in &metadata.meta {
            let outcome = RotateOutcome {
                name: name.clone(),
                degrees: entry.rotation_suggestion_degrees,
                result: self.process(name, entry),
            };
            match &outcome.result {
                Ok(path) => info!(
                    sprite = %name,
                    degrees = outcome.degrees,
                    out = %path.display(),
                    "rotated clockwise"
                ),
                Err(reason) => warn!(sprite = %name, %reason, "skipped"),
            }
            on_sprite(&outcome);
            outcomes.push(outcome);
        }

        Ok(RotateReport {
            metadata_path,
            outcomes,
        })
    }

    /// Where to read a sprite from: recorded output, then the cropped
    /// directory, then the original
    #[must_use]
    pub fn resolve_source(&self, name: &str, entry: &SpriteEntry) -> Option<PathBuf> {
        let recorded = entry.out_path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.options.root.join(p)
            }
        });

        recorded
            .into_iter()
            .chain([
                self.options.cropped_dir.join(name),
                self.options.sprites_dir.join(name),
            ])
            .find(|p| p.is_file())
    }

    fn process(&self, name: &str, entry: &SpriteEntry) -> Result<PathBuf, SkipReason> {
        let source = self
            .resolve_source(name, entry)
            .ok_or(SkipReason::SourceMissing)?;

        let degrees = entry.rotation_suggestion_degrees;
        if degrees.rem_euclid(360) == 0 {
            return Err(SkipReason::NoRotation);
        }

        let image = image::open(&source)
            .map_err(|e| SkipReason::RotateFailed(e.to_string()))?
            .into_rgba8();
        let rotated = rotate_clockwise(&image, degrees);

        let out = self.options.rotated_dir.join(name);
        write_png(&rotated, &out).map_err(|e| SkipReason::SaveFailed(e.to_string()))?;
        Ok(out)
    }
}

fn write_png(image: &RgbaImage, path: &Path) -> image::ImageResult<()> {
    image.save_with_format(path, ImageFormat::Png)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sprite::{BoundingBox, CropOptions, SpriteCropper};
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    /// 3 wide, 2 tall, red marker top-left, blue elsewhere
    fn marker_image() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(3, 2, BLUE);
        img.put_pixel(0, 0, RED);
        img
    }

    mod direction_tests {
        use super::*;

        #[test]
        fn test_quarter_turn_is_clockwise() {
            let rotated = rotate_clockwise(&marker_image(), 90);
            assert_eq!(rotated.dimensions(), (2, 3));
            // Top-left corner ends up top-right after a clockwise turn
            assert_eq!(*rotated.get_pixel(1, 0), RED);
            assert_eq!(*rotated.get_pixel(0, 0), BLUE);
        }

        #[test]
        fn test_negative_quarter_turn_is_counter_clockwise() {
            let rotated = rotate_clockwise(&marker_image(), -90);
            assert_eq!(rotated.dimensions(), (2, 3));
            // Top-left corner ends up bottom-left
            assert_eq!(*rotated.get_pixel(0, 2), RED);
        }

        #[test]
        fn test_half_turn() {
            let rotated = rotate_clockwise(&marker_image(), 180);
            assert_eq!(rotated.dimensions(), (3, 2));
            assert_eq!(*rotated.get_pixel(2, 1), RED);
        }

        #[test]
        fn test_full_turns_are_identity() {
            let img = marker_image();
            assert_eq!(rotate_clockwise(&img, 0), img);
            assert_eq!(rotate_clockwise(&img, 360), img);
            assert_eq!(rotate_clockwise(&img, -720), img);
        }

        #[test]
        fn test_arbitrary_angle_matches_quarter_turn_direction() {
            // An 89 degree turn should land the marker near the top-right
            let mut img = RgbaImage::from_pixel(20, 10, BLUE);
            for y in 0..3 {
                for x in 0..3 {
                    img.put_pixel(x, y, RED);
                }
            }
            let rotated = rotate_clockwise(&img, 89);
            let (w, _) = rotated.dimensions();
            assert_eq!(*rotated.get_pixel(w - 2, 1), RED);
            assert_ne!(*rotated.get_pixel(1, 1), RED);
        }

        #[test]
        fn test_arbitrary_angle_expands_frame() {
            let img = RgbaImage::from_pixel(10, 10, BLUE);
            let rotated = rotate_clockwise(&img, 45);
            assert_eq!(rotated.dimensions(), (14, 14));
            assert_eq!(*rotated.get_pixel(7, 7), BLUE);
            // Corners of the expanded canvas stay transparent
            assert_eq!(rotated.get_pixel(0, 0)[3], 0);
        }
    }

    mod bounds_tests {
        use super::*;

        #[test]
        fn test_rotated_bounds() {
            assert_eq!(rotated_bounds(100, 50, 0.0), (100, 50));
            assert_eq!(rotated_bounds(100, 50, 90.0), (50, 100));
            assert_eq!(rotated_bounds(100, 50, -90.0), (50, 100));
            assert_eq!(rotated_bounds(100, 50, 180.0), (100, 50));
            assert_eq!(rotated_bounds(100, 50, 720.0), (100, 50));
            assert_eq!(rotated_bounds(10, 10, 45.0), (14, 14));
        }
    }

    mod locate_tests {
        use super::*;

        #[test]
        fn test_first_existing_candidate_wins() {
            let dir = tempfile::tempdir().unwrap();
            let first = dir.path().join("a.json");
            let second = dir.path().join("b.json");
            std::fs::write(&second, "{}").unwrap();

            let found = locate_metadata(&[first.clone(), second.clone()]).unwrap();
            assert_eq!(found, second);

            std::fs::write(&first, "{}").unwrap();
            assert_eq!(locate_metadata(&[first.clone(), second]).unwrap(), first);
        }

        #[test]
        fn test_no_candidate_is_fatal() {
            let dir = tempfile::tempdir().unwrap();
            let missing = dir.path().join("missing.json");
            let err = locate_metadata(&[missing]).unwrap_err();
            assert!(matches!(err, PaddockError::MetadataNotFound { ref searched } if searched.contains("missing.json")));
        }
    }

    mod batch_tests {
        use super::*;

        /// Crop a tall and a wide sprite, returning rotator options
        fn cropped_fixture(dir: &Path) -> RotateOptions {
            let sprites = dir.join("sprites");
            std::fs::create_dir_all(&sprites).unwrap();

            let mut tall = RgbaImage::new(16, 40);
            for y in 5..35 {
                for x in 4..12 {
                    tall.put_pixel(x, y, BLUE);
                }
            }
            tall.put_pixel(4, 5, RED);
            tall.save(sprites.join("tall.png")).unwrap();

            let mut wide = RgbaImage::new(40, 16);
            for y in 4..12 {
                for x in 5..35 {
                    wide.put_pixel(x, y, BLUE);
                }
            }
            wide.save(sprites.join("wide.png")).unwrap();

            SpriteCropper::new(CropOptions::new(&sprites).with_root(dir))
                .run()
                .unwrap();

            RotateOptions::new(&sprites).with_root(dir)
        }

        #[test]
        fn test_rotates_only_suggested_sprites() {
            let dir = tempfile::tempdir().unwrap();
            let options = cropped_fixture(dir.path());

            let report = SpriteRotator::new(options.clone()).run().unwrap();
            assert_eq!(report.metadata_path, options.sprites_dir.join(METADATA_FILE));
            assert_eq!(report.processed_count(), 1);
            assert_eq!(report.skipped_count(), 1);

            let tall = &report.outcomes[0];
            assert_eq!(tall.name, "tall.png");
            assert_eq!(tall.degrees, 90);
            let out = tall.result.as_ref().unwrap();
            assert_eq!(out, &options.rotated_dir.join("tall.png"));

            // Cropped tall sprite is 12x34; rotated it becomes 34x12
            let rotated = image::open(out).unwrap().into_rgba8();
            assert_eq!(rotated.dimensions(), (34, 12));
            // Marker sat at the top-left of the opaque region
            assert_eq!(*rotated.get_pixel(31, 2), RED);

            assert_eq!(report.outcomes[1].result, Err(SkipReason::NoRotation));
            assert!(!options.rotated_dir.join("wide.png").exists());
        }

        #[test]
        fn test_rerun_is_byte_identical() {
            let dir = tempfile::tempdir().unwrap();
            let options = cropped_fixture(dir.path());
            let out = options.rotated_dir.join("tall.png");

            SpriteRotator::new(options.clone()).run().unwrap();
            let first = std::fs::read(&out).unwrap();
            SpriteRotator::new(options).run().unwrap();
            let second = std::fs::read(&out).unwrap();
            assert_eq!(first, second);
        }

        #[test]
        fn test_falls_back_to_original_sprite() {
            let dir = tempfile::tempdir().unwrap();
            let options = cropped_fixture(dir.path());
            std::fs::remove_dir_all(&options.cropped_dir).unwrap();

            let report = SpriteRotator::new(options.clone()).run().unwrap();
            let out = report.outcomes[0].result.as_ref().unwrap();
            // The uncropped 16x40 original, turned
            let rotated = image::open(out).unwrap();
            assert_eq!((rotated.width(), rotated.height()), (40, 16));
        }

        #[test]
        fn test_missing_source_is_skipped() {
            let dir = tempfile::tempdir().unwrap();
            let sprites = dir.path().join("sprites");
            let mut meta = SpriteMetadata::new();
            meta.record_processed(
                "ghost.png",
                SpriteEntry {
                    original_size: (4, 4),
                    cropped_size: (2, 4),
                    crop_bbox: BoundingBox::new(1, 0, 3, 4),
                    rotation_suggestion_degrees: 90,
                    out_path: Some(PathBuf::from("sprites/cropped/ghost.png")),
                },
            );
            meta.save(&sprites.join(METADATA_FILE)).unwrap();

            let report = SpriteRotator::new(RotateOptions::new(&sprites).with_root(dir.path()))
                .run()
                .unwrap();
            assert_eq!(report.outcomes[0].result, Err(SkipReason::SourceMissing));
        }

        #[test]
        fn test_corrupt_source_is_skipped() {
            let dir = tempfile::tempdir().unwrap();
            let options = cropped_fixture(dir.path());
            std::fs::write(options.cropped_dir.join("tall.png"), b"garbage").unwrap();

            let report = SpriteRotator::new(options).run().unwrap();
            assert!(matches!(
                report.outcomes[0].result,
                Err(SkipReason::RotateFailed(_))
            ));
        }

        #[test]
        fn test_recorded_out_path_wins_over_cropped_dir() {
            let dir = tempfile::tempdir().unwrap();
            let options = cropped_fixture(dir.path());

            // Same name in the cropped dir, but the recorded path points elsewhere
            let elsewhere = dir.path().join("staging").join("tall.png");
            std::fs::create_dir_all(elsewhere.parent().unwrap()).unwrap();
            RgbaImage::from_pixel(6, 10, RED).save(&elsewhere).unwrap();

            let mut meta = SpriteMetadata::load(&options.sprites_dir.join(METADATA_FILE)).unwrap();
            meta.meta.get_mut("tall.png").unwrap().out_path =
                Some(PathBuf::from("staging/tall.png"));
            meta.save(&options.sprites_dir.join(METADATA_FILE)).unwrap();

            let rotator = SpriteRotator::new(options.clone());
            let entry = &meta.meta["tall.png"];
            assert!(options.cropped_dir.join("tall.png").is_file());
            assert_eq!(rotator.resolve_source("tall.png", entry), Some(elsewhere));

            let report = rotator.run().unwrap();
            let rotated = image::open(report.outcomes[0].result.as_ref().unwrap())
                .unwrap()
                .into_rgba8();
            assert_eq!(rotated.dimensions(), (10, 6));
            assert!(rotated.pixels().all(|p| *p == RED));
        }

        #[test]
        fn test_null_suggestion_is_skipped_not_fatal() {
            let dir = tempfile::tempdir().unwrap();
            let options = cropped_fixture(dir.path());
            let path = options.sprites_dir.join(METADATA_FILE);

            let mut json: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            json["meta"]["wide.png"]["rotation_suggestion_degrees"] = serde_json::Value::Null;
            std::fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

            let report = SpriteRotator::new(options).run().unwrap();
            assert_eq!(report.outcomes.len(), 2);
            assert!(report.outcomes[0].result.is_ok());
            assert_eq!(report.outcomes[1].name, "wide.png");
            assert_eq!(report.outcomes[1].degrees, 0);
            assert_eq!(report.outcomes[1].result, Err(SkipReason::NoRotation));
        }

        #[test]
        fn test_save_failure_is_skipped() {
            let dir = tempfile::tempdir().unwrap();
            let options = cropped_fixture(dir.path());
            std::fs::create_dir_all(options.rotated_dir.join("tall.png")).unwrap();

            let report = SpriteRotator::new(options).run().unwrap();
            assert_eq!(report.outcomes.len(), 2);
            assert!(matches!(
                report.outcomes[0].result,
                Err(SkipReason::SaveFailed(_))
            ));
            assert_eq!(report.outcomes[1].result, Err(SkipReason::NoRotation));
        }

        #[test]
        fn test_missing_metadata_is_fatal() {
            let dir = tempfile::tempdir().unwrap();
            let options = RotateOptions::new(dir.path().join("sprites"));
            let err = SpriteRotator::new(options).run().unwrap_err();
            assert!(matches!(err, PaddockError::MetadataNotFound { .. }));
        }
    }
}
