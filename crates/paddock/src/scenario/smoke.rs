//! Smoke test: the page loads, renders, and can be captured.

use super::{capture, finish, DEFAULT_SELECTOR_TIMEOUT, VIEWPORT_SELECTOR};
use crate::driver::PageDriver;
use crate::result::PaddockResult;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// File name of the smoke screenshot inside the artifacts directory
pub const SMOKE_SCREENSHOT: &str = "game-screen.png";

/// Smoke test script
#[derive(Debug, Clone)]
pub struct SmokeScenario {
    /// Element that must exist
    pub viewport_selector: String,
    /// Viewport appearance timeout
    pub selector_timeout: Duration,
    /// Settle time before the capture
    pub settle: Duration,
    /// Where the screenshot goes
    pub screenshot_path: PathBuf,
}

impl SmokeScenario {
    /// Create the standard smoke test writing into `artifacts_dir`
    #[must_use]
    pub fn new(artifacts_dir: impl AsRef<Path>) -> Self {
        Self {
            viewport_selector: VIEWPORT_SELECTOR.to_string(),
            selector_timeout: DEFAULT_SELECTOR_TIMEOUT,
            settle: Duration::from_millis(2000),
            screenshot_path: artifacts_dir.as_ref().join(SMOKE_SCREENSHOT),
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
    /// Navigation, a missing viewport element, or a failed capture.
    pub async fn run<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        url: &str,
    ) -> PaddockResult<SmokeReport> {
        let outcome = self.execute(driver, url).await;
        finish(driver, outcome).await
    }

    async fn execute<D: PageDriver + ?Sized>(
        &self,
        driver: &mut D,
        url: &str,
    ) -> PaddockResult<SmokeReport> {
        info!(url, "smoke test starting");
        driver.goto(url).await?;
        driver
            .wait_for_selector(&self.viewport_selector, self.selector_timeout)
            .await?;
        driver.wait_for_timeout(self.settle).await?;
        capture(driver, &self.screenshot_path).await?;

        Ok(SmokeReport {
            screenshot: self.screenshot_path.clone(),
        })
    }
}

/// Result of a smoke run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmokeReport {
    /// Screenshot location
    pub screenshot: PathBuf,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use crate::result::PaddockError;

    #[tokio::test]
    async fn test_smoke_captures_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let scenario = SmokeScenario::new(dir.path().join("artifacts"));
        let mut driver = MockDriver::new().with_element("#viewport", "");

        let report = scenario.run(&mut driver, "file:///index.html").await.unwrap();

        assert_eq!(
            report.screenshot,
            dir.path().join("artifacts").join(SMOKE_SCREENSHOT)
        );
        assert!(report.screenshot.exists());
        assert_eq!(
            driver.history(),
            &[
                "goto:file:///index.html",
                "wait_for_selector:#viewport",
                "wait:2000",
                "screenshot",
                "close",
            ]
        );
    }

    #[tokio::test]
    async fn test_smoke_without_viewport_fails() {
        let dir = tempfile::tempdir().unwrap();
        let scenario =
            SmokeScenario::new(dir.path()).with_selector_timeout(Duration::from_millis(5));
        let mut driver = MockDriver::new();

        let err = scenario.run(&mut driver, "file:///index.html").await.unwrap_err();
        assert!(matches!(err, PaddockError::Timeout { .. }));
        assert!(!dir.path().join(SMOKE_SCREENSHOT).exists());
        assert!(driver.was_called("close"));
    }
}
