//! Browser driver abstraction
//!
//! The runner consumes a small, object-safe slice of the WebDriver surface:
//! navigation, element lookup and interaction, in-page script execution,
//! implicit wait and viewport control. Two backends implement it: a
//! WebDriver-protocol client for real checks and an in-memory mock for
//! tests and dry runs.

pub mod mock;
pub mod webdriver;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::common::Result;

/// Opaque reference to an element held by a driver backend
///
/// Backends map handles to their native element references internally, so
/// handles can be carried between steps without tying step code to a
/// particular automation client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub(crate) u64);

impl ElementHandle {
    /// Numeric id of this handle
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element #{}", self.0)
    }
}

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// The browser-automation capabilities the journey runner consumes
///
/// Every call is fallible; failures surface as ordinary step failures and
/// are classified only by the failing step's severity.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate the browser to the given URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Title of the current page
    async fn title(&self) -> Result<String>;

    /// URL of the current page
    async fn current_url(&self) -> Result<String>;

    /// Find the first element matching a CSS selector
    async fn find(&self, css: &str) -> Result<ElementHandle>;

    /// Click a previously found element
    async fn click(&self, element: ElementHandle) -> Result<()>;

    /// Visible text of a previously found element
    async fn text(&self, element: ElementHandle) -> Result<String>;

    /// Execute a script in the page and return its result
    async fn execute(&self, script: &str) -> Result<Value>;

    /// Set the driver's implicit element-wait timeout
    async fn set_implicit_timeout(&self, timeout: Duration) -> Result<()>;

    /// Current viewport size
    async fn viewport(&self) -> Result<Rect>;

    /// Resize the viewport
    async fn set_viewport(&self, rect: Rect) -> Result<()>;
}
