//! Paddock: test and asset tooling for a browser driving game
//!
//! Two browser scenarios check that the game page works. The drive test
//! holds the throttle and asserts that the HUD reacts, and the smoke test
//! loads the page and takes a screenshot. The offline tools prepare car
//! sprites: an alpha auto-cropper, a rotator that applies the cropper's
//! orientation hints, and a fixer for the variant fields in the car data file.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    PADDOCK Architecture                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐         │
//! │   │ Scenario   │    │ PageDriver │    │ Headless   │         │
//! │   │ (drive,    │───►│ (CDP or    │───►│ Browser    │         │
//! │   │  smoke)    │    │  mock)     │    │ (chromium) │         │
//! │   └────────────┘    └────────────┘    └────────────┘         │
//! │                                                               │
//! │   ┌────────────┐    sprite_metadata.json    ┌────────────┐   │
//! │   │ Cropper    │───────────────────────────►│ Rotator    │   │
//! │   └────────────┘                            └────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use paddock::prelude::*;
//!
//! let config = PaddockConfig::default();
//! let report = SpriteCropper::new(config.crop_options()).run()?;
//! println!("cropped {} sprites", report.processed_count());
//! # Ok::<(), PaddockError>(())
//! ```

#![warn(missing_docs)]

mod browser;
mod config;
mod driver;
mod event;
mod readout;
mod result;

/// Drive and smoke scenarios
pub mod scenario;

/// Sprite cropping and rotation
pub mod sprite;

/// Variant field fixer for the car data file
pub mod variant;

pub use browser::{Browser, BrowserConfig, Page};
pub use config::{PaddockConfig, CONFIG_FILE};
pub use driver::{page_url, MockDriver, MockVehicle, PageDriver};
pub use event::{KeyDefinition, KeyInput};
pub use readout::{assert_moved, parse_speed, Position, MOVEMENT_THRESHOLD};
pub use result::{PaddockError, PaddockResult};
pub use scenario::{DriveReport, DriveScenario, SmokeReport, SmokeScenario};
pub use sprite::{SkipReason, SpriteCropper, SpriteMetadata, SpriteRotator};
pub use variant::{VariantFixReport, VariantFixer};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::browser::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::event::*;
    pub use super::readout::*;
    pub use super::result::*;
    pub use super::scenario::*;
    pub use super::sprite::*;
    pub use super::variant::*;
}
