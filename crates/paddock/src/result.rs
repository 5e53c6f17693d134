//! Result and error types for Paddock.
//!
//! Everything in [`PaddockError`] ends the current tool run. Per-sprite
//! failures inside a batch are not errors: they are recorded as
//! [`crate::sprite::SkipReason`] values and the batch keeps going.

use thiserror::Error;

/// Result type for Paddock operations
pub type PaddockResult<T> = Result<T, PaddockError>;

/// Errors that can occur in Paddock
#[derive(Debug, Error)]
pub enum PaddockError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Selector never appeared
    #[error("Timed out after {ms}ms waiting for {selector}")]
    Timeout {
        /// Selector that was awaited
        selector: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    InputError {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    ScreenshotError {
        /// Error message
        message: String,
    },

    /// The speed readout was empty
    #[error("Speed readout missing ({selector})")]
    ReadoutMissing {
        /// Selector of the readout element
        selector: String,
    },

    /// The speed readout did not parse as a number
    #[error("Speed readout not numeric: {value:?}")]
    ReadoutNotNumeric {
        /// Raw readout text
        value: String,
    },

    /// The position readout was not `"<float>, <float>"`
    #[error("Position readout malformed: {value:?}")]
    PositionMalformed {
        /// Raw readout text
        value: String,
    },

    /// Neither speed nor position indicated movement
    #[error("Vehicle failed to move during the test (speed {speed}, dx {dx:.3}, dy {dy:.3})")]
    NoMovement {
        /// Speed read while the throttle was held
        speed: f64,
        /// Horizontal position delta
        dx: f64,
        /// Vertical position delta
        dy: f64,
    },

    /// None of the configured metadata locations exist
    #[error("metadata file not found (searched: {searched})")]
    MetadataNotFound {
        /// Comma-separated list of the paths that were probed
        searched: String,
    },

    /// Image processing error (decode, encode, transform)
    #[error("Image processing failed: {message}")]
    ImageProcessing {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Feature compiled out
    #[error("{feature} support not enabled. Rebuild with --features {feature}")]
    FeatureDisabled {
        /// Cargo feature name
        feature: &'static str,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl PaddockError {
    /// True for drive-test readout failures (as opposed to infrastructure faults)
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(
            self,
            Self::ReadoutMissing { .. }
                | Self::ReadoutNotNumeric { .. }
                | Self::PositionMalformed { .. }
                | Self::NoMovement { .. }
        )
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an image processing error
    #[must_use]
    pub fn image(message: impl Into<String>) -> Self {
        Self::ImageProcessing {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for PaddockError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageProcessing {
            message: err.to_string(),
        }
    }
}
