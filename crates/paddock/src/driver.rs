//! PageDriver - the browser automation seam the scenarios run against.
//!
//! ```text
//! ┌──────────────────────┐      ┌─────────────────────────┐
//! │  DriveScenario       │      │  browser::Page (CDP)    │
//! │  SmokeScenario       │─────►│  MockDriver (tests)     │
//! └──────────────────────┘      └─────────────────────────┘
//! ```
//!
//! Scenarios only ever see the trait, so the full drive/smoke flow is
//! exercised in unit tests against [`MockDriver`] without a Chromium binary.

use crate::event::KeyInput;
use crate::result::{PaddockError, PaddockResult};
use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

/// Abstract page driver for browser automation
#[async_trait]
pub trait PageDriver: Send {
    /// Navigate to URL
    async fn goto(&mut self, url: &str) -> PaddockResult<()>;

    /// Wait until an element matching `selector` exists
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> PaddockResult<()>;

    /// Click the first element matching `selector`
    async fn click(&mut self, selector: &str) -> PaddockResult<()>;

    /// Rendered text of the first element matching `selector`
    async fn inner_text(&mut self, selector: &str) -> PaddockResult<String>;

    /// Dispatch a keyboard event to the focused element
    async fn dispatch_key(&mut self, input: KeyInput) -> PaddockResult<()>;

    /// Capture the viewport as PNG bytes
    async fn screenshot(&mut self) -> PaddockResult<Vec<u8>>;

    /// Release the page
    async fn close(&mut self) -> PaddockResult<()>;

    /// Hold a key down
    async fn key_down(&mut self, code: &str) -> PaddockResult<()> {
        self.dispatch_key(KeyInput::down(code)).await
    }

    /// Release a held key
    async fn key_up(&mut self, code: &str) -> PaddockResult<()> {
        self.dispatch_key(KeyInput::up(code)).await
    }

    /// Press and release a key
    async fn press(&mut self, code: &str) -> PaddockResult<()> {
        self.dispatch_key(KeyInput::press(code)).await
    }

    /// Fixed-duration wait
    async fn wait_for_timeout(&mut self, duration: Duration) -> PaddockResult<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }
}

/// Build a `file://` URL for a local page
///
/// The path is canonicalized first, so it must exist.
pub fn page_url(path: &Path) -> PaddockResult<String> {
    let absolute = path.canonicalize().map_err(|e| PaddockError::NavigationError {
        url: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut raw = absolute.to_string_lossy().replace('\\', "/");
    if let Some(stripped) = raw.strip_prefix("//?/") {
        raw = stripped.to_string();
    }
    if !raw.starts_with('/') {
        raw.insert(0, '/');
    }

    let mut url = String::from("file://");
    for c in raw.chars() {
        match c {
            ' ' => url.push_str("%20"),
            '%' => url.push_str("%25"),
            '#' => url.push_str("%23"),
            '?' => url.push_str("%3F"),
            _ => url.push(c),
        }
    }
    Ok(url)
}

/// Toy vehicle model behind the mock HUD readouts
#[derive(Debug, Clone, PartialEq)]
pub struct MockVehicle {
    /// World X
    pub x: f64,
    /// World Y
    pub y: f64,
    /// Current speed (units per second)
    pub speed: f64,
    /// Speed gained per second of throttle
    pub acceleration: f64,
    /// Key that accelerates
    pub throttle_key: String,
    /// Key that strafes
    pub strafe_key: String,
    /// Key that stops the vehicle
    pub brake_key: String,
}

impl Default for MockVehicle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            speed: 0.0,
            acceleration: 12.0,
            throttle_key: "KeyW".to_string(),
            strafe_key: "KeyD".to_string(),
            brake_key: "Space".to_string(),
        }
    }
}

impl MockVehicle {
    fn advance(&mut self, held: &BTreeSet<String>, elapsed: Duration) {
        let dt = elapsed.as_secs_f64();
        if held.contains(&self.throttle_key) {
            self.speed += self.acceleration * dt;
        }
        self.x += self.speed * dt;
        if held.contains(&self.strafe_key) {
            self.y += self.speed * dt * 0.5;
        }
    }
}

/// Mock driver for unit testing
///
/// Models a page as a map from selector to text. With a [`MockVehicle`]
/// attached, the speed and position readouts are derived from held keys and
/// elapsed (virtual) wait time, so no real time passes in tests.
#[derive(Debug)]
pub struct MockDriver {
    /// Current URL
    pub current_url: String,
    /// Elements present on the page and their text
    pub elements: BTreeMap<String, String>,
    /// Call history for verification
    pub call_history: Vec<String>,
    /// Vehicle driving the readouts, if any
    pub vehicle: Option<MockVehicle>,
    /// Selector of the speed readout
    pub speed_selector: String,
    /// Selector of the position readout
    pub position_selector: String,
    /// Screenshot dimensions
    pub viewport: (u32, u32),
    held: BTreeSet<String>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self {
            current_url: String::new(),
            elements: BTreeMap::new(),
            call_history: Vec::new(),
            vehicle: None,
            speed_selector: "#stat-speed".to_string(),
            position_selector: "#stat-position".to_string(),
            viewport: (1280, 720),
            held: BTreeSet::new(),
        }
    }
}

impl MockDriver {
    /// Create an empty mock page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page whose HUD reacts to the driving keys
    #[must_use]
    pub fn game_page() -> Self {
        Self::new()
            .with_element("#viewport", "")
            .with_element("#stat-speed", "0.0")
            .with_element("#stat-position", "0.00, 0.00")
            .with_vehicle(MockVehicle::default())
    }

    /// A page whose HUD never changes
    #[must_use]
    pub fn static_page(speed: &str, position: &str) -> Self {
        Self::new()
            .with_element("#viewport", "")
            .with_element("#stat-speed", speed)
            .with_element("#stat-position", position)
    }

    /// Add or replace an element
    #[must_use]
    pub fn with_element(mut self, selector: &str, text: &str) -> Self {
        self.elements.insert(selector.to_string(), text.to_string());
        self
    }

    /// Remove an element
    #[must_use]
    pub fn without_element(mut self, selector: &str) -> Self {
        self.elements.remove(selector);
        self
    }

    /// Attach a vehicle model
    #[must_use]
    pub fn with_vehicle(mut self, vehicle: MockVehicle) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    /// Keys currently held
    #[must_use]
    pub fn held_keys(&self) -> Vec<&str> {
        self.held.iter().map(String::as_str).collect()
    }

    fn readout(&self, selector: &str) -> Option<String> {
        let vehicle = self.vehicle.as_ref()?;
        if selector == self.speed_selector {
            Some(format!("{:.1}", vehicle.speed))
        } else if selector == self.position_selector {
            Some(format!("{:.2}, {:.2}", vehicle.x, vehicle.y))
        } else {
            None
        }
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn goto(&mut self, url: &str) -> PaddockResult<()> {
        self.call_history.push(format!("goto:{url}"));
        self.current_url = url.to_string();
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> PaddockResult<()> {
        self.call_history.push(format!("wait_for_selector:{selector}"));
        if self.elements.contains_key(selector) {
            Ok(())
        } else {
            Err(PaddockError::Timeout {
                selector: selector.to_string(),
                ms: timeout.as_millis() as u64,
            })
        }
    }

    async fn click(&mut self, selector: &str) -> PaddockResult<()> {
        self.call_history.push(format!("click:{selector}"));
        if self.elements.contains_key(selector) {
            Ok(())
        } else {
            Err(PaddockError::PageError {
                message: format!("no element matches {selector}"),
            })
        }
    }

    async fn inner_text(&mut self, selector: &str) -> PaddockResult<String> {
        self.call_history.push(format!("inner_text:{selector}"));
        if !self.elements.contains_key(selector) {
            return Err(PaddockError::PageError {
                message: format!("no element matches {selector}"),
            });
        }
        Ok(self
            .readout(selector)
            .or_else(|| self.elements.get(selector).cloned())
            .unwrap_or_default())
    }

    async fn dispatch_key(&mut self, input: KeyInput) -> PaddockResult<()> {
        match &input {
            KeyInput::Down { code } => {
                self.call_history.push(format!("key_down:{code}"));
                self.held.insert(code.clone());
            }
            KeyInput::Up { code } => {
                self.call_history.push(format!("key_up:{code}"));
                self.held.remove(code);
            }
            KeyInput::Press { code } => {
                self.call_history.push(format!("press:{code}"));
                if let Some(vehicle) = self.vehicle.as_mut() {
                    if *code == vehicle.brake_key {
                        vehicle.speed = 0.0;
                    }
                }
            }
        }
        Ok(())
    }

    async fn screenshot(&mut self) -> PaddockResult<Vec<u8>> {
        self.call_history.push("screenshot".to_string());
        let (width, height) = self.viewport;
        let frame = RgbaImage::from_pixel(width, height, Rgba([24, 24, 32, 255]));
        let mut bytes = Vec::new();
        frame.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    async fn close(&mut self) -> PaddockResult<()> {
        self.call_history.push("close".to_string());
        self.held.clear();
        Ok(())
    }

    async fn wait_for_timeout(&mut self, duration: Duration) -> PaddockResult<()> {
        self.call_history
            .push(format!("wait:{}", duration.as_millis()));
        if let Some(vehicle) = self.vehicle.as_mut() {
            vehicle.advance(&self.held, duration);
        }
        Ok(())
    }
}
