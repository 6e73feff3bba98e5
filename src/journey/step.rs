//! Step descriptors
//!
//! Each step performs one browser interaction and asserts its outcome.
//! The value a step returns is handed to the next step as its input; a
//! failed step hands the next step nothing.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::Deserialize;

use crate::common::Result;
use crate::driver::{Driver, ElementHandle};

/// Failure classification for a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Failure ends the journey immediately
    #[default]
    Hard,
    /// The journey continues but is reported as failed
    Soft,
    /// Failure is logged and otherwise ignored
    Optional,
}

/// Value handed from one step to the next
#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    /// An element found by a previous step
    Element(ElementHandle),
    /// Arbitrary text, e.g. extracted from the page
    Text(String),
    /// A script result
    Json(serde_json::Value),
}

impl StepValue {
    /// The carried element handle, if this value is one
    pub fn as_element(&self) -> Option<ElementHandle> {
        match self {
            StepValue::Element(handle) => Some(*handle),
            _ => None,
        }
    }
}

/// Boxed asynchronous step action
pub type StepFn = Box<
    dyn Fn(Arc<dyn Driver>, Option<StepValue>) -> BoxFuture<'static, Result<Option<StepValue>>>
        + Send
        + Sync,
>;

/// A single journey step
pub struct Step {
    pub(crate) severity: Severity,
    pub(crate) description: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) debug_label: Option<String>,
    pub(crate) action: StepFn,
}

impl Step {
    /// Create a step from an async action
    ///
    /// The action receives the driver and the value returned by the
    /// previous step, and returns the value to carry forward:
    ///
    /// ```ignore
    /// Step::new(|driver, _input| Box::pin(async move {
    ///     driver.navigate("https://www.example.com/").await?;
    ///     Ok(None)
    /// }))
    /// ```
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(Arc<dyn Driver>, Option<StepValue>) -> BoxFuture<'static, Result<Option<StepValue>>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            severity: Severity::default(),
            description: None,
            category: None,
            debug_label: None,
            action: Box::new(action),
        }
    }

    /// Set the failure classification (default: hard)
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the human-readable label used in log lines
    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Group this step under a category; unset inherits the previous step's
    pub fn category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Text describing the step's logic, logged on failure when the
    /// matching debug toggle is enabled
    pub fn debug_label<S: Into<String>>(mut self, label: S) -> Self {
        self.debug_label = Some(label.into());
        self
    }
}
