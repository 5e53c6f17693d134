//! Browser control for headless testing.
//!
//! When compiled with the `browser` feature, this uses chromiumoxide to drive
//! a real Chromium over the Chrome `DevTools` Protocol. Without the feature,
//! [`Browser::launch`] fails with [`PaddockError::FeatureDisabled`].

use crate::result::{PaddockError, PaddockResult};
use serde::{Deserialize, Serialize};

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserConfig, PaddockError, PaddockResult};
    use crate::driver::PageDriver;
    use crate::event::{KeyDefinition, KeyInput};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::input::{
        DispatchKeyEventParams, DispatchKeyEventType,
    };
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::handler::viewport::Viewport;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::time::{Duration, Instant};
    use tracing::debug;

    const SELECTOR_POLL: Duration = Duration::from_millis(50);

    /// Browser instance with real CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: CdpBrowser,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance with real CDP
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> PaddockResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height)
                .viewport(Viewport {
                    width: config.viewport_width,
                    height: config.viewport_height,
                    ..Viewport::default()
                });

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| PaddockError::BrowserLaunchError { message: e })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                PaddockError::BrowserLaunchError {
                    message: e.to_string(),
                }
            })?;

            // Spawn handler task
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            debug!(
                width = config.viewport_width,
                height = config.viewport_height,
                headless = config.headless,
                "browser launched"
            );

            Ok(Self {
                config,
                inner: browser,
                handle,
            })
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Returns error if page cannot be created
        pub async fn new_page(&self) -> PaddockResult<Page> {
            let cdp_page =
                self.inner
                    .new_page("about:blank")
                    .await
                    .map_err(|e| PaddockError::PageError {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                url: String::from("about:blank"),
                inner: cdp_page,
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser and reap the process
        ///
        /// # Errors
        ///
        /// Returns error if the browser does not shut down cleanly
        pub async fn close(mut self) -> PaddockResult<()> {
            self.inner
                .close()
                .await
                .map_err(|e| PaddockError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
            let _ = self.inner.wait().await;
            self.handle.abort();
            Ok(())
        }
    }

    /// A browser page with real CDP connection
    #[derive(Debug)]
    pub struct Page {
        /// Current URL
        pub url: String,
        inner: CdpPage,
    }

    impl Page {
        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }

        async fn send_key(&self, def: &KeyDefinition, down: bool) -> PaddockResult<()> {
            let kind = if down {
                DispatchKeyEventType::KeyDown
            } else {
                DispatchKeyEventType::KeyUp
            };

            let mut builder = DispatchKeyEventParams::builder()
                .r#type(kind)
                .key(def.key.clone())
                .code(def.code.clone())
                .windows_virtual_key_code(def.key_code)
                .native_virtual_key_code(def.key_code);

            if down {
                if let Some(ref text) = def.text {
                    builder = builder.text(text.clone());
                }
            }

            let params = builder.build().map_err(|e| PaddockError::InputError {
                message: e.to_string(),
            })?;

            self.inner
                .execute(params)
                .await
                .map_err(|e| PaddockError::InputError {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    #[async_trait]
    impl PageDriver for Page {
        async fn goto(&mut self, url: &str) -> PaddockResult<()> {
            debug!(url, "goto");
            self.inner
                .goto(url)
                .await
                .map_err(|e| PaddockError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            self.url = url.to_string();
            Ok(())
        }

        async fn wait_for_selector(
            &mut self,
            selector: &str,
            timeout: Duration,
        ) -> PaddockResult<()> {
            let deadline = Instant::now() + timeout;
            loop {
                if self.inner.find_element(selector).await.is_ok() {
                    debug!(selector, "selector ready");
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    return Err(PaddockError::Timeout {
                        selector: selector.to_string(),
                        ms: timeout.as_millis() as u64,
                    });
                }
                tokio::time::sleep(SELECTOR_POLL).await;
            }
        }

        async fn click(&mut self, selector: &str) -> PaddockResult<()> {
            debug!(selector, "click");
            let element =
                self.inner
                    .find_element(selector)
                    .await
                    .map_err(|e| PaddockError::PageError {
                        message: format!("{selector}: {e}"),
                    })?;
            element
                .click()
                .await
                .map_err(|e| PaddockError::InputError {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn inner_text(&mut self, selector: &str) -> PaddockResult<String> {
            let element =
                self.inner
                    .find_element(selector)
                    .await
                    .map_err(|e| PaddockError::PageError {
                        message: format!("{selector}: {e}"),
                    })?;
            let text = element
                .inner_text()
                .await
                .map_err(|e| PaddockError::PageError {
                    message: e.to_string(),
                })?;
            Ok(text.unwrap_or_default())
        }

        async fn dispatch_key(&mut self, input: KeyInput) -> PaddockResult<()> {
            let def =
                KeyDefinition::from_code(input.code()).ok_or_else(|| PaddockError::InputError {
                    message: format!("unknown key code: {}", input.code()),
                })?;
            debug!(?input, "key");

            match input {
                KeyInput::Down { .. } => self.send_key(&def, true).await,
                KeyInput::Up { .. } => self.send_key(&def, false).await,
                KeyInput::Press { .. } => {
                    self.send_key(&def, true).await?;
                    self.send_key(&def, false).await
                }
            }
        }

        async fn screenshot(&mut self) -> PaddockResult<Vec<u8>> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let screenshot =
                self.inner
                    .execute(params)
                    .await
                    .map_err(|e| PaddockError::ScreenshotError {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| PaddockError::ScreenshotError {
                    message: e.to_string(),
                })
        }

        async fn close(&mut self) -> PaddockResult<()> {
            self.inner
                .clone()
                .close()
                .await
                .map_err(|e| PaddockError::PageError {
                    message: e.to_string(),
                })
        }
    }
}

// ============================================================================
// Stub Implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod stub {
    use super::{BrowserConfig, PaddockError, PaddockResult};
    use crate::driver::PageDriver;
    use crate::event::KeyInput;
    use async_trait::async_trait;
    use std::time::Duration;

    const DISABLED: PaddockError = PaddockError::FeatureDisabled { feature: "browser" };

    /// Browser placeholder; launching always fails
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Always fails: the crate was built without the `browser` feature
        ///
        /// # Errors
        ///
        /// Always returns [`PaddockError::FeatureDisabled`]
        pub async fn launch(config: BrowserConfig) -> PaddockResult<Self> {
            let _ = config;
            Err(DISABLED)
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Always returns [`PaddockError::FeatureDisabled`]
        pub async fn new_page(&self) -> PaddockResult<Page> {
            Err(DISABLED)
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        ///
        /// # Errors
        ///
        /// Never fails
        pub async fn close(self) -> PaddockResult<()> {
            Ok(())
        }
    }

    /// Page placeholder
    #[derive(Debug)]
    pub struct Page {
        /// Current URL
        pub url: String,
    }

    impl Page {
        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }
    }

    #[async_trait]
    impl PageDriver for Page {
        async fn goto(&mut self, _url: &str) -> PaddockResult<()> {
            Err(DISABLED)
        }

        async fn wait_for_selector(
            &mut self,
            _selector: &str,
            _timeout: Duration,
        ) -> PaddockResult<()> {
            Err(DISABLED)
        }

        async fn click(&mut self, _selector: &str) -> PaddockResult<()> {
            Err(DISABLED)
        }

        async fn inner_text(&mut self, _selector: &str) -> PaddockResult<String> {
            Err(DISABLED)
        }

        async fn dispatch_key(&mut self, _input: KeyInput) -> PaddockResult<()> {
            Err(DISABLED)
        }

        async fn screenshot(&mut self) -> PaddockResult<Vec<u8>> {
            Err(DISABLED)
        }

        async fn close(&mut self) -> PaddockResult<()> {
            Ok(())
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use stub::{Browser, Page};
