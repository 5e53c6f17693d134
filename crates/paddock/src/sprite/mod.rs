//! Sprite preprocessing: alpha auto-crop and rotation.
//!
//! The cropper writes a [`SpriteMetadata`] file that the rotator later reads.
//! Per-file problems never abort a batch; they surface as [`SkipReason`]s.

mod bbox;
mod crop;
mod metadata;
mod rotate;

pub use bbox::{alpha_bbox, suggest_rotation, BoundingBox, ROTATION_ASPECT};
pub use crop::{CropOptions, CropReport, CroppedSprite, SpriteCropper, DEFAULT_PADDING};
pub use metadata::{SpriteEntry, SpriteMetadata, METADATA_FILE};
pub use rotate::{
    locate_metadata, rotate_clockwise, rotated_bounds, RotateOptions, RotateOutcome,
    RotateReport, SpriteRotator,
};

use std::fmt;
use std::path::{Path, PathBuf};

/// Why a sprite was left out of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No pixel with alpha > 0
    EmptyAlpha,
    /// Could not decode the source image
    OpenFailed(String),
    /// Could not write the output image
    SaveFailed(String),
    /// Neither the cropped nor the original image exists
    SourceMissing,
    /// Suggested rotation is a multiple of 360
    NoRotation,
    /// Rotating the image failed
    RotateFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAlpha => write!(f, "empty alpha"),
            Self::OpenFailed(e) => write!(f, "open-failed: {e}"),
            Self::SaveFailed(e) => write!(f, "save-failed: {e}"),
            Self::SourceMissing => write!(f, "source not found"),
            Self::NoRotation => write!(f, "no rotation suggested"),
            Self::RotateFailed(e) => write!(f, "rotate-failed: {e}"),
        }
    }
}

/// PNG files directly inside `dir`, sorted by file name
///
/// The extension match is case-insensitive; subdirectories are ignored.
pub fn list_sprites(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut sprites = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png {
            sprites.push(path);
        }
    }
    sprites.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(sprites)
}

/// File name as an owned string (lossy)
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_strings() {
        assert_eq!(SkipReason::EmptyAlpha.to_string(), "empty alpha");
        assert_eq!(
            SkipReason::OpenFailed("bad header".into()).to_string(),
            "open-failed: bad header"
        );
        assert_eq!(
            SkipReason::SaveFailed("disk full".into()).to_string(),
            "save-failed: disk full"
        );
    }

    #[test]
    fn test_list_sprites_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.PNG", "notes.txt", "c.png"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("cropped.png")).unwrap();

        let names: Vec<String> = list_sprites(dir.path())
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.png", "c.png"]);
    }
}
