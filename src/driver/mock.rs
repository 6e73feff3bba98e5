//! Scripted in-memory driver for tests and dry runs
//!
//! Plays back a fixed page state and records every call, so tests can
//! assert on the exact driver traffic a journey produced. The default
//! state simulates a permissive desktop browser: every selector resolves,
//! clicks succeed and assertions only fail when the seeded state says so.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::common::{Error, Result};

use super::{Driver, ElementHandle, Rect};

/// A recorded driver call
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Navigate(String),
    Title,
    CurrentUrl,
    Find(String),
    Click(u64),
    Text(u64),
    Execute(String),
    SetImplicitTimeout(Duration),
    Viewport,
    SetViewport(Rect),
}

struct PageState {
    title: String,
    url: String,
    viewport: Rect,
    device: Value,
    element_text: HashMap<String, String>,
    missing: HashSet<String>,
    script_result: Value,
    handles: HashMap<u64, String>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            title: String::new(),
            url: "about:blank".to_string(),
            viewport: Rect::new(1366, 768),
            device: json!({
                "userAgent": "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/120.0.6099.18 Safari/537.36",
                "width": 1366,
                "height": 768,
            }),
            element_text: HashMap::new(),
            missing: HashSet::new(),
            script_result: Value::Null,
            handles: HashMap::new(),
        }
    }
}

/// In-memory driver with scripted page state and call recording
#[derive(Default)]
pub struct MockDriver {
    state: Mutex<PageState>,
    calls: Mutex<Vec<DriverCall>>,
    next_handle: AtomicU64,
}

impl MockDriver {
    /// Set the title reported for the current page
    pub fn with_title<S: Into<String>>(self, title: S) -> Self {
        self.state.lock().unwrap().title = title.into();
        self
    }

    /// Set the URL reported for the current page
    pub fn with_url<S: Into<String>>(self, url: S) -> Self {
        self.state.lock().unwrap().url = url.into();
        self
    }

    /// Set the current viewport size
    pub fn with_viewport(self, rect: Rect) -> Self {
        self.state.lock().unwrap().viewport = rect;
        self
    }

    /// Set the device signals reported by the in-page detection script
    pub fn with_device<S: Into<String>>(self, user_agent: S, width: u32, height: u32) -> Self {
        self.state.lock().unwrap().device = json!({
            "userAgent": user_agent.into(),
            "width": width,
            "height": height,
        });
        self
    }

    /// Register the visible text for a selector
    pub fn with_element_text<S: Into<String>, T: Into<String>>(self, css: S, text: T) -> Self {
        self.state
            .lock()
            .unwrap()
            .element_text
            .insert(css.into(), text.into());
        self
    }

    /// Make a selector fail to resolve, as if the element never appeared
    pub fn with_missing_element<S: Into<String>>(self, css: S) -> Self {
        self.state.lock().unwrap().missing.insert(css.into());
        self
    }

    /// Set the result returned for non-detection scripts
    pub fn with_script_result(self, result: Value) -> Self {
        self.state.lock().unwrap().script_result = result;
        self
    }

    /// All driver calls recorded so far, in order
    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: DriverCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.record(DriverCall::Navigate(url.to_string()));
        self.state.lock().unwrap().url = url.to_string();
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        self.record(DriverCall::Title);
        Ok(self.state.lock().unwrap().title.clone())
    }

    async fn current_url(&self) -> Result<String> {
        self.record(DriverCall::CurrentUrl);
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn find(&self, css: &str) -> Result<ElementHandle> {
        self.record(DriverCall::Find(css.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.missing.contains(css) {
            return Err(Error::Driver(format!(
                "no such element: unable to locate element {css:?}"
            )));
        }
        let id = self.next_handle.fetch_add(1, Ordering::SeqCst);
        state.handles.insert(id, css.to_string());
        Ok(ElementHandle(id))
    }

    async fn click(&self, element: ElementHandle) -> Result<()> {
        self.record(DriverCall::Click(element.0));
        let state = self.state.lock().unwrap();
        if state.handles.contains_key(&element.0) {
            Ok(())
        } else {
            Err(Error::StaleElement(element.0))
        }
    }

    async fn text(&self, element: ElementHandle) -> Result<String> {
        self.record(DriverCall::Text(element.0));
        let state = self.state.lock().unwrap();
        let css = state
            .handles
            .get(&element.0)
            .ok_or(Error::StaleElement(element.0))?;
        Ok(state.element_text.get(css).cloned().unwrap_or_default())
    }

    async fn execute(&self, script: &str) -> Result<Value> {
        self.record(DriverCall::Execute(script.to_string()));
        let state = self.state.lock().unwrap();
        if script.contains("userAgent") {
            Ok(state.device.clone())
        } else {
            Ok(state.script_result.clone())
        }
    }

    async fn set_implicit_timeout(&self, timeout: Duration) -> Result<()> {
        self.record(DriverCall::SetImplicitTimeout(timeout));
        Ok(())
    }

    async fn viewport(&self) -> Result<Rect> {
        self.record(DriverCall::Viewport);
        Ok(self.state.lock().unwrap().viewport)
    }

    async fn set_viewport(&self, rect: Rect) -> Result<()> {
        self.record(DriverCall::SetViewport(rect));
        self.state.lock().unwrap().viewport = rect;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_and_click_round_trip() {
        let driver = MockDriver::default();
        let handle = driver.find("p > a").await.unwrap();
        driver.click(handle).await.unwrap();
        assert_eq!(
            driver.calls(),
            vec![
                DriverCall::Find("p > a".to_string()),
                DriverCall::Click(handle.id()),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_element_fails_find() {
        let driver = MockDriver::default().with_missing_element("#gone");
        let err = driver.find("#gone").await.unwrap_err();
        assert!(err.to_string().contains("no such element"));
    }

    #[tokio::test]
    async fn test_device_script_returns_seeded_report() {
        let driver = MockDriver::default().with_device("Android phone", 390, 844);
        let report = driver
            .execute("return { userAgent: window.navigator.userAgent }")
            .await
            .unwrap();
        assert_eq!(report["userAgent"], "Android phone");
        assert_eq!(report["width"], 390);
    }
}
