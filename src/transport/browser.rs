use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{PageBody, PageTransport};
use crate::config::BrowserConfig;
use crate::models::TransportKind;
use crate::utils::error::AppError;
use crate::Result;

/// Renders pages in a headless Chrome instance owned by this transport.
pub struct BrowserTransport {
    browser: Mutex<Option<Arc<Browser>>>,
    config: BrowserConfig,
    user_agent: String,
    min_content_chars: usize,
}

impl BrowserTransport {
    pub fn launch(config: BrowserConfig, user_agent: &str, min_content_chars: usize) -> Result<Self> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false) // Often needed in containerized environments
            .window_size(Some((1920, 1080)))
            .idle_browser_timeout(Duration::from_secs(config.navigation_timeout_secs * 4))
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-extensions"),
                OsStr::new("--blink-settings=imagesEnabled=false"),
            ])
            .build()
            .map_err(|e| AppError::Browser(format!("Failed to create launch options: {}", e)))?;

        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Browser(format!("Failed to launch browser: {}", e)))?;

        info!("Headless browser initialized");
        Ok(Self {
            browser: Mutex::new(Some(Arc::new(browser))),
            config,
            user_agent: user_agent.to_string(),
            min_content_chars,
        })
    }

    fn handle(&self) -> Result<Arc<Browser>> {
        self.browser
            .lock()
            .map_err(|_| AppError::Browser("Browser handle lock poisoned".to_string()))?
            .clone()
            .ok_or_else(|| AppError::Browser("Browser already shut down".to_string()))
    }

    fn render(
        browser: &Browser,
        url: &str,
        config: &BrowserConfig,
        user_agent: &str,
    ) -> Result<String> {
        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Browser(format!("Failed to create tab: {}", e)))?;

        let rendered = (|| {
            tab.set_user_agent(user_agent, None, None)
                .map_err(|e| AppError::Browser(format!("Failed to set user agent: {}", e)))?;

            tab.navigate_to(url)
                .map_err(|e| AppError::Browser(format!("Navigation failed: {}", e)))?;
            tab.wait_until_navigated()
                .map_err(|e| AppError::Browser(format!("Page load failed: {}", e)))?;

            tab.wait_for_element_with_custom_timeout(
                &config.wait_selector,
                Duration::from_secs(config.navigation_timeout_secs),
            )
            .map_err(|e| {
                AppError::Browser(format!(
                    "Wait for selector '{}' failed: {}",
                    config.wait_selector, e
                ))
            })?;

            // Give client-side rendering time to fill in listings
            std::thread::sleep(Duration::from_millis(config.settle_ms));

            tab.get_content()
                .map_err(|e| AppError::Browser(format!("Failed to get page content: {}", e)))
        })();

        // Close tab to free resources
        let _ = tab.close(true);
        rendered
    }
}

#[async_trait]
impl PageTransport for BrowserTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Browser
    }

    async fn fetch(&self, url: &str) -> Result<PageBody> {
        let browser = self.handle()?;
        let config = self.config.clone();
        let user_agent = self.user_agent.clone();
        let target = url.to_string();

        debug!(url, "Rendering page with headless browser");
        let html = tokio::task::spawn_blocking(move || {
            Self::render(&browser, &target, &config, &user_agent)
        })
        .await
        .map_err(|e| AppError::Browser(format!("Render task failed: {}", e)))??;

        let length = html.trim().chars().count();
        if length <= self.min_content_chars {
            warn!(url, length, "Headless browser returned insufficient content");
            return Err(AppError::Browser(format!(
                "Insufficient content from {} ({} characters)",
                url, length
            )));
        }

        info!(url, length, "Fetched page via headless browser");
        Ok(PageBody {
            text: html,
            attempts: 1,
        })
    }

    fn shutdown(&self) -> Result<()> {
        let mut guard = self
            .browser
            .lock()
            .map_err(|_| AppError::Browser("Browser handle lock poisoned".to_string()))?;
        if guard.take().is_some() {
            info!("Headless browser closed");
        }
        Ok(())
    }
}

impl Drop for BrowserTransport {
    fn drop(&mut self) {
        if let Err(e) = PageTransport::shutdown(self) {
            warn!("Error closing headless browser: {}", e);
        }
    }
}
