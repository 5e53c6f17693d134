//! Drive test: hold the throttle, strafe, brake, and check the HUD moved.

use super::{
    capture, finish, DEFAULT_SELECTOR_TIMEOUT, POSITION_SELECTOR, SPEED_SELECTOR,
    VIEWPORT_SELECTOR,
};
use crate::driver::PageDriver;
use crate::readout::{assert_moved, parse_speed, Position};
use crate::result::PaddockResult;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// File name of the drive screenshot inside the artifacts directory
pub const DRIVE_SCREENSHOT: &str = "drive-test.png";

/// Drive test script
///
/// Defaults reproduce the game's control scheme: `KeyW` throttle, `KeyD`
/// strafe, `Space` handbrake.
#[derive(Debug, Clone)]
pub struct DriveScenario {
    /// Interactive surface to focus
    pub viewport_selector: String,
    /// Speed readout
    pub speed_selector: String,
    /// Position readout
    pub position_selector: String,
    /// Throttle key (DOM code)
    pub forward_key: String,
    /// Strafe key (DOM code)
    pub strafe_key: String,
    /// Handbrake key (DOM code)
    pub brake_key: String,
    /// Viewport appearance timeout
    pub selector_timeout: Duration,
    /// Settle time after the viewport appears
    pub settle: Duration,
    /// How long the throttle is held before the readouts are sampled
    pub throttle_hold: Duration,
    /// How long the strafe key is held
    pub strafe_hold: Duration,
    /// Pause after releasing the keys
    pub release_wait: Duration,
    /// Pause after the handbrake
    pub brake_wait: Duration,
    /// Where the screenshot goes
    pub screenshot_path: PathBuf,
}

impl DriveScenario {
    /// Create the standard drive test writing into `artifacts_dir`
    #[must_use]
    pub fn new(artifacts_dir: impl AsRef<Path>) -> Self {
        Self {
            viewport_selector: VIEWPORT_SELECTOR.to_string(),
            speed_selector: SPEED_SELECTOR.to_string(),
            position_selector: POSITION_SELECTOR.to_string(),
            forward_key: "KeyW".to_string(),
            strafe_key: "KeyD".to_string(),
            brake_key: "Space".to_string(),
            selector_timeout: DEFAULT_SELECTOR_TIMEOUT,
            settle: Duration::from_millis(1200),
            throttle_hold: Duration::from_millis(1500),
            strafe_hold: Duration::from_millis(900),
            release_wait: Duration::from_millis(400),
            brake_wait: Duration::from_millis(400),
            screenshot_path: artifacts_dir.as_ref().join(DRIVE_SCREENSHOT),
        }
    }

    /// Override the viewport timeout
    #[must_use]
    pub const fn with_selector_timeout(mut self, timeout: Duration) -> Self {
        self.selector_timeout = timeout;
        self
    }

    /// Run against `driver`, then close it
    ///
    /// # Errors
    ///
    /// Any page fault, or the first failing readout assertion. Nothing is
    /// retried.
    pub async fn run<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        url: &str,
    ) -> PaddockResult<DriveReport> {
        let outcome = self.execute(driver, url).await;
        finish(driver, outcome).await
    }

    async fn execute<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        url: &str,
    ) -> PaddockResult<DriveReport> {
        info!(url, "drive test starting");
        driver.goto(url).await?;
        driver
            .wait_for_selector(&self.viewport_selector, self.selector_timeout)
            .await?;
        driver.wait_for_timeout(self.settle).await?;

        driver.click(&self.viewport_selector).await?;
        let initial_text = driver.inner_text(&self.position_selector).await?;

        driver.key_down(&self.forward_key).await?;
        driver.wait_for_timeout(self.throttle_hold).await?;
        let speed_text = driver.inner_text(&self.speed_selector).await?;
        let during_text = driver.inner_text(&self.position_selector).await?;
        debug!(speed = %speed_text, position = %during_text, "readouts under throttle");

        driver.key_down(&self.strafe_key).await?;
        driver.wait_for_timeout(self.strafe_hold).await?;
        driver.key_up(&self.strafe_key).await?;
        driver.key_up(&self.forward_key).await?;
        driver.wait_for_timeout(self.release_wait).await?;
        driver.press(&self.brake_key).await?;
        driver.wait_for_timeout(self.brake_wait).await?;

        let speed = parse_speed(&self.speed_selector, &speed_text)?;
        let during = Position::parse(&during_text)?;
        let initial = Position::parse(&initial_text)?;
        assert_moved(speed, &initial, &during)?;

        capture(driver, &self.screenshot_path).await?;
        info!(speed, x = during.x, y = during.y, "drive test passed");

        Ok(DriveReport {
            speed,
            initial,
            during,
            screenshot: self.screenshot_path.clone(),
        })
    }
}

/// What the drive test observed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveReport {
    /// Speed read while the throttle was held
    pub speed: f64,
    /// Position before any input
    pub initial: Position,
    /// Position while the throttle was held
    pub during: Position,
    /// Screenshot location
    pub screenshot: PathBuf,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockVehicle};
    use crate::result::PaddockError;

    #[tokio::test]
    async fn test_moving_vehicle_passes_and_writes_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = DriveScenario::new(dir.path().join("artifacts"));
        let mut driver = MockDriver::game_page();

        let report = scenario.run(&mut driver, "file:///index.html").await.unwrap();

        assert!(report.speed > 0.0);
        assert!(report.during.moved_from(&report.initial, 1.0));
        assert!(report.screenshot.exists());
        assert!(image::open(&report.screenshot).is_ok());
        assert!(driver.was_called("close"));
    }

    #[tokio::test]
    async fn test_static_page_raises_no_movement() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = DriveScenario::new(dir.path());
        let mut driver = MockDriver::static_page("0", "4.00, 4.00");

        let err = scenario.run(&mut driver, "file:///index.html").await.unwrap_err();

        assert!(matches!(err, PaddockError::NoMovement { .. }));
        assert!(!dir.path().join(DRIVE_SCREENSHOT).exists());
        assert!(driver.was_called("close"));
    }

    #[tokio::test]
    async fn test_position_change_alone_is_enough() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = DriveScenario::new(dir.path());
        // Speed reads zero but the vehicle coasts from a running start
        let vehicle = MockVehicle {
            speed: 5.0,
            acceleration: 0.0,
            ..MockVehicle::default()
        };
        let mut driver = MockDriver::game_page()
            .with_vehicle(vehicle)
            .with_element("#stat-speed", "0");
        driver.speed_selector = "#unused".to_string();

        let report = scenario.run(&mut driver, "file:///index.html").await.unwrap();
        assert_eq!(report.speed, 0.0);
        assert!(report.during.x >= 7.0);
    }

    #[tokio::test]
    async fn test_empty_speed_readout() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = DriveScenario::new(dir.path());
        let mut driver = MockDriver::static_page("", "0, 0");

        let err = scenario.run(&mut driver, "file:///x.html").await.unwrap_err();
        assert!(matches!(err, PaddockError::ReadoutMissing { .. }));
    }

    #[tokio::test]
    async fn test_non_numeric_speed_readout() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = DriveScenario::new(dir.path());
        let mut driver = MockDriver::static_page("fast", "0, 0");

        let err = scenario.run(&mut driver, "file:///x.html").await.unwrap_err();
        assert!(matches!(err, PaddockError::ReadoutNotNumeric { .. }));
    }

    #[tokio::test]
    async fn test_malformed_position_readout() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = DriveScenario::new(dir.path());
        let mut driver = MockDriver::static_page("3.0", "somewhere");

        let err = scenario.run(&mut driver, "file:///x.html").await.unwrap_err();
        assert!(matches!(err, PaddockError::PositionMalformed { .. }));
    }

    #[tokio::test]
    async fn test_missing_viewport_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let scenario =
            DriveScenario::new(dir.path()).with_selector_timeout(Duration::from_millis(10));
        let mut driver = MockDriver::game_page().without_element("#viewport");

        let err = scenario.run(&mut driver, "file:///x.html").await.unwrap_err();
        assert!(matches!(err, PaddockError::Timeout { ms: 10, .. }));
        assert!(driver.was_called("close"));
    }

    #[tokio::test]
    async fn test_input_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = DriveScenario::new(dir.path());
        let mut driver = MockDriver::game_page();
        scenario.run(&mut driver, "file:///x.html").await.unwrap();

        let inputs: Vec<&str> = driver
            .history()
            .iter()
            .map(String::as_str)
            .filter(|c| {
                c.starts_with("key_")
                    || c.starts_with("press")
                    || c.starts_with("wait:")
                    || c.starts_with("click")
            })
            .collect();
        assert_eq!(
            inputs,
            vec![
                "wait:1200",
                "click:#viewport",
                "key_down:KeyW",
                "wait:1500",
                "key_down:KeyD",
                "wait:900",
                "key_up:KeyD",
                "key_up:KeyW",
                "wait:400",
                "press:Space",
                "wait:400",
            ]
        );
        assert!(driver.held_keys().is_empty());
    }
}
