//! WebDriver-protocol backend
//!
//! Wraps a thirtyfour session. Elements found by steps are kept in an
//! internal table and exposed to the runner as opaque handles; the table
//! lives for the whole session, matching the lifetime of a journey.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thirtyfour::prelude::*;
use thirtyfour::{DesiredCapabilities, WebElement};

use crate::common::config::WebDriverConfig;
use crate::common::{Error, Result};

use super::{Driver, ElementHandle, Rect};

/// Driver backend speaking the WebDriver protocol via thirtyfour
pub struct WebDriverBackend {
    driver: WebDriver,
    elements: Mutex<HashMap<u64, WebElement>>,
    next_handle: AtomicU64,
}

impl WebDriverBackend {
    /// Connect to a WebDriver endpoint using the configured browser
    pub async fn connect(config: &WebDriverConfig) -> Result<Self> {
        let url = config.url.as_str();
        let session = match config.browser.to_ascii_lowercase().as_str() {
            "firefox" => WebDriver::new(url, DesiredCapabilities::firefox()).await,
            "edge" => WebDriver::new(url, DesiredCapabilities::edge()).await,
            "safari" => WebDriver::new(url, DesiredCapabilities::safari()).await,
            _ => WebDriver::new(url, DesiredCapabilities::chrome()).await,
        };

        let driver = session.map_err(|e| Error::SessionStart {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            driver,
            elements: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        })
    }

    /// End the WebDriver session
    pub async fn quit(&self) -> Result<()> {
        self.driver.clone().quit().await.map_err(Error::driver)
    }

    fn store(&self, element: WebElement) -> ElementHandle {
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.elements
            .lock()
            .expect("element table poisoned")
            .insert(id, element);
        ElementHandle(id)
    }

    fn get(&self, handle: ElementHandle) -> Result<WebElement> {
        self.elements
            .lock()
            .expect("element table poisoned")
            .get(&handle.0)
            .cloned()
            .ok_or(Error::StaleElement(handle.0))
    }
}

#[async_trait]
impl Driver for WebDriverBackend {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await.map_err(Error::driver)
    }

    async fn title(&self) -> Result<String> {
        self.driver.title().await.map_err(Error::driver)
    }

    async fn current_url(&self) -> Result<String> {
        self.driver
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(Error::driver)
    }

    async fn find(&self, css: &str) -> Result<ElementHandle> {
        let element = self
            .driver
            .find(By::Css(css))
            .await
            .map_err(Error::driver)?;
        Ok(self.store(element))
    }

    async fn click(&self, element: ElementHandle) -> Result<()> {
        self.get(element)?.click().await.map_err(Error::driver)
    }

    async fn text(&self, element: ElementHandle) -> Result<String> {
        self.get(element)?.text().await.map_err(Error::driver)
    }

    async fn execute(&self, script: &str) -> Result<Value> {
        let ret = self
            .driver
            .execute(script, Vec::new())
            .await
            .map_err(Error::driver)?;
        Ok(ret.json().clone())
    }

    async fn set_implicit_timeout(&self, timeout: Duration) -> Result<()> {
        self.driver
            .set_implicit_wait_timeout(timeout)
            .await
            .map_err(Error::driver)
    }

    async fn viewport(&self) -> Result<Rect> {
        let rect = self.driver.get_window_rect().await.map_err(Error::driver)?;
        Ok(Rect {
            width: rect.width as u32,
            height: rect.height as u32,
        })
    }

    async fn set_viewport(&self, rect: Rect) -> Result<()> {
        let current = self.driver.get_window_rect().await.map_err(Error::driver)?;
        self.driver
            .set_window_rect(current.x as u32, current.y as u32, rect.width, rect.height)
            .await
            .map_err(Error::driver)
    }
}
