//! The `sprite_metadata.json` record shared by the cropper and the rotator.

use super::bbox::BoundingBox;
use crate::result::PaddockResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default metadata file name
pub const METADATA_FILE: &str = "sprite_metadata.json";

/// How one sprite was cropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteEntry {
    /// `(width, height)` before cropping
    pub original_size: (u32, u32),
    /// `(width, height)` after cropping
    pub cropped_size: (u32, u32),
    /// Crop rectangle in original image coordinates
    pub crop_bbox: BoundingBox,
    /// Suggested clockwise rotation in degrees (`null` reads as 0)
    #[serde(default, deserialize_with = "null_as_zero")]
    pub rotation_suggestion_degrees: i32,
    /// Cropped output, relative to the project root
    #[serde(default)]
    pub out_path: Option<PathBuf>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i32>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Result of one cropper run
///
/// Invariants: every key of `meta` is listed in `processed`, and no file
/// name appears in both `processed` and `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteMetadata {
    /// Sprites successfully cropped, in processing order
    #[serde(default)]
    pub processed: Vec<String>,
    /// `(file name, reason)` for every sprite left out
    #[serde(default)]
    pub skipped: Vec<(String, String)>,
    /// Per-sprite crop details
    #[serde(default)]
    pub meta: BTreeMap<String, SpriteEntry>,
}

impl SpriteMetadata {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully cropped sprite
    pub fn record_processed(&mut self, name: impl Into<String>, entry: SpriteEntry) {
        let name = name.into();
        self.processed.push(name.clone());
        self.meta.insert(name, entry);
    }

    /// Record a sprite that was left out
    pub fn record_skipped(&mut self, name: impl Into<String>, reason: impl ToString) {
        self.skipped.push((name.into(), reason.to_string()));
    }

    /// Reason a sprite was skipped, if it was
    #[must_use]
    pub fn skip_reason(&self, name: &str) -> Option<&str> {
        self.skipped
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, reason)| reason.as_str())
    }

    /// Check both record invariants
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let meta_listed = self.meta.keys().all(|k| self.processed.contains(k));
        let disjoint = self
            .skipped
            .iter()
            .all(|(name, _)| !self.processed.contains(name));
        meta_listed && disjoint
    }

    /// Read a metadata file
    ///
    /// # Errors
    ///
    /// I/O failure or invalid JSON.
    pub fn load(path: &Path) -> PaddockResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the metadata file (pretty JSON), creating parent directories
    ///
    /// # Errors
    ///
    /// I/O failure.
    pub fn save(&self, path: &Path) -> PaddockResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry() -> SpriteEntry {
        SpriteEntry {
            original_size: (64, 64),
            cropped_size: (20, 30),
            crop_bbox: BoundingBox::new(10, 5, 30, 35),
            rotation_suggestion_degrees: 90,
            out_path: Some(PathBuf::from("assets/Car Sprites/cropped/car.png")),
        }
    }

    #[test]
    fn test_record_keeps_invariants() {
        let mut meta = SpriteMetadata::new();
        meta.record_processed("car.png", entry());
        meta.record_skipped("ghost.png", "empty alpha");

        assert!(meta.is_consistent());
        assert_eq!(meta.skip_reason("ghost.png"), Some("empty alpha"));
        assert_eq!(meta.skip_reason("car.png"), None);
    }

    #[test]
    fn test_inconsistent_when_processed_and_skipped() {
        let mut meta = SpriteMetadata::new();
        meta.record_processed("car.png", entry());
        meta.record_skipped("car.png", "save-failed: nope");
        assert!(!meta.is_consistent());
    }

    #[test]
    fn test_json_layout() {
        let mut meta = SpriteMetadata::new();
        meta.record_processed("car.png", entry());
        meta.record_skipped("ghost.png", "empty alpha");

        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["processed"], serde_json::json!(["car.png"]));
        assert_eq!(
            value["skipped"],
            serde_json::json!([["ghost.png", "empty alpha"]])
        );
        let car = &value["meta"]["car.png"];
        assert_eq!(car["original_size"], serde_json::json!([64, 64]));
        assert_eq!(car["cropped_size"], serde_json::json!([20, 30]));
        assert_eq!(car["crop_bbox"], serde_json::json!([10, 5, 30, 35]));
        assert_eq!(car["rotation_suggestion_degrees"], 90);
        assert_eq!(car["out_path"], "assets/Car Sprites/cropped/car.png");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(METADATA_FILE);

        let mut meta = SpriteMetadata::new();
        meta.record_processed("car.png", entry());
        meta.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  \"processed\""));
        assert_eq!(SpriteMetadata::load(&path).unwrap(), meta);
    }

    #[test]
    fn test_null_or_missing_suggestion_reads_as_zero() {
        let json = r#"{
            "processed": ["a.png", "b.png"],
            "meta": {
                "a.png": {"original_size": [4, 4], "cropped_size": [2, 2],
                          "crop_bbox": [0, 0, 2, 2], "rotation_suggestion_degrees": null},
                "b.png": {"original_size": [4, 4], "cropped_size": [2, 2],
                          "crop_bbox": [0, 0, 2, 2]}
            }
        }"#;
        let meta: SpriteMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.meta["a.png"].rotation_suggestion_degrees, 0);
        assert_eq!(meta.meta["b.png"].rotation_suggestion_degrees, 0);
        assert!(meta.meta["a.png"].out_path.is_none());
    }

    #[test]
    fn test_load_tolerates_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(METADATA_FILE);
        std::fs::write(&path, "{}").unwrap();

        let meta = SpriteMetadata::load(&path).unwrap();
        assert!(meta.meta.is_empty());
        assert!(meta.processed.is_empty());
    }
}
