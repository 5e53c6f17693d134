//! Browser scenarios run against the game page.
//!
//! - [`DriveScenario`]: holds the driving keys and asserts the HUD reacts
//! - [`SmokeScenario`]: loads the page and captures a screenshot
//!
//! Both close the page whether or not the scenario body succeeded.

mod drive;
mod smoke;

pub use drive::{DriveReport, DriveScenario, DRIVE_SCREENSHOT};
pub use smoke::{SmokeReport, SmokeScenario, SMOKE_SCREENSHOT};

use crate::driver::PageDriver;
use crate::result::PaddockResult;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Selector of the interactive game surface
pub const VIEWPORT_SELECTOR: &str = "#viewport";
/// Selector of the speed readout
pub const SPEED_SELECTOR: &str = "#stat-speed";
/// Selector of the position readout
pub const POSITION_SELECTOR: &str = "#stat-position";
/// How long to wait for the viewport element before giving up
pub const DEFAULT_SELECTOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Screenshot the page and write it to `path`, creating parent directories
async fn capture<D: PageDriver + ?Sized>(driver: &mut D, path: &Path) -> PaddockResult<()> {
    let png = driver.screenshot().await?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, png)?;
    info!(path = %path.display(), "screenshot written");
    Ok(())
}

/// Close the page, preferring the scenario's own error over a close error
async fn finish<D: PageDriver + ?Sized, T>(
    driver: &mut D,
    outcome: PaddockResult<T>,
) -> PaddockResult<T> {
    let closed = driver.close().await;
    let value = outcome?;
    closed?;
    Ok(value)
}
