//! HUD readout parsing and movement checks.
//!
//! The game renders two text readouts: speed as a bare float and position as
//! `"<x>, <y>"`. Parsing is strict: anything else is an assertion failure.

use crate::result::{PaddockError, PaddockResult};
use serde::{Deserialize, Serialize};

/// Minimum per-axis displacement that counts as movement
pub const MOVEMENT_THRESHOLD: f64 = 1.0;

/// Parse the speed readout
///
/// # Errors
///
/// [`PaddockError::ReadoutMissing`] for empty text,
/// [`PaddockError::ReadoutNotNumeric`] for anything that is not a float.
pub fn parse_speed(selector: &str, text: &str) -> PaddockResult<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PaddockError::ReadoutMissing {
            selector: selector.to_string(),
        });
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| PaddockError::ReadoutNotNumeric {
            value: text.to_string(),
        })
}

/// A world position read from the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Position {
    /// Create a position
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse `"<float>, <float>"`
    ///
    /// # Errors
    ///
    /// [`PaddockError::PositionMalformed`] unless the text is exactly two
    /// comma-separated floats.
    pub fn parse(text: &str) -> PaddockResult<Self> {
        let malformed = || PaddockError::PositionMalformed {
            value: text.to_string(),
        };

        let mut parts = text.split(',');
        let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };

        let x = x.trim().parse::<f64>().map_err(|_| malformed())?;
        let y = y.trim().parse::<f64>().map_err(|_| malformed())?;
        Ok(Self { x, y })
    }

    /// Per-axis displacement from `origin`
    #[must_use]
    pub fn delta(&self, origin: &Self) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// Whether either axis moved by at least `threshold`
    #[must_use]
    pub fn moved_from(&self, origin: &Self, threshold: f64) -> bool {
        let (dx, dy) = self.delta(origin);
        dx.abs() >= threshold || dy.abs() >= threshold
    }
}

/// Fail unless the vehicle shows some sign of movement
///
/// Movement means a positive speed OR a displacement of at least
/// [`MOVEMENT_THRESHOLD`] on either axis.
///
/// # Errors
///
/// [`PaddockError::NoMovement`] when speed <= 0 and both axes moved less
/// than the threshold.
pub fn assert_moved(speed: f64, initial: &Position, during: &Position) -> PaddockResult<()> {
    if speed <= 0.0 && !during.moved_from(initial, MOVEMENT_THRESHOLD) {
        let (dx, dy) = during.delta(initial);
        return Err(PaddockError::NoMovement { speed, dx, dy });
    }
    Ok(())
}
