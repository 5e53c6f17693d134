//! Alpha bounding boxes and the orientation heuristic.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Height/width ratio above which a sprite is assumed to be lying sideways
pub const ROTATION_ASPECT: f64 = 1.2;

/// Pixel rectangle with exclusive right/lower edges
///
/// Serializes as `[left, upper, right, lower]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct BoundingBox {
    /// First column inside the box
    pub left: u32,
    /// First row inside the box
    pub upper: u32,
    /// First column past the box
    pub right: u32,
    /// First row past the box
    pub lower: u32,
}

impl BoundingBox {
    /// Create a bounding box
    #[must_use]
    pub const fn new(left: u32, upper: u32, right: u32, lower: u32) -> Self {
        Self {
            left,
            upper,
            right,
            lower,
        }
    }

    /// Box width
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Box height
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.lower.saturating_sub(self.upper)
    }

    /// Grow by `padding` on every side, clamped to a `width`×`height` image
    #[must_use]
    pub fn padded(&self, padding: u32, width: u32, height: u32) -> Self {
        Self {
            left: self.left.saturating_sub(padding),
            upper: self.upper.saturating_sub(padding),
            right: self.right.saturating_add(padding).min(width),
            lower: self.lower.saturating_add(padding).min(height),
        }
    }
}

impl From<[u32; 4]> for BoundingBox {
    fn from([left, upper, right, lower]: [u32; 4]) -> Self {
        Self::new(left, upper, right, lower)
    }
}

impl From<BoundingBox> for [u32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.left, b.upper, b.right, b.lower]
    }
}

/// Smallest box containing every pixel with alpha > 0
///
/// `None` for a fully transparent (or empty) image.
#[must_use]
pub fn alpha_bbox(image: &RgbaImage) -> Option<BoundingBox> {
    let mut bbox: Option<BoundingBox> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bbox = Some(match bbox {
            None => BoundingBox::new(x, y, x + 1, y + 1),
            Some(b) => BoundingBox::new(
                b.left.min(x),
                b.upper.min(y),
                b.right.max(x + 1),
                b.lower.max(y + 1),
            ),
        });
    }

    bbox
}

/// Suggested clockwise rotation for a cropped sprite: 90 or 0
///
/// 90 only when height is strictly greater than `ROTATION_ASPECT` × width.
#[must_use]
pub fn suggest_rotation(width: u32, height: u32) -> i32 {
    // h > 1.2 * w  <=>  5h > 6w, kept in integers so the boundary is exact
    if 5 * u64::from(height) > 6 * u64::from(width) {
        90
    } else {
        0
    }
}
