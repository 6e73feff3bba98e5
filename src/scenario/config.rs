//! Scenario file types
//!
//! Defines the data structures for deserializing YAML scenarios.

use serde::Deserialize;
use std::path::Path;

use crate::common::{Error, Result};
use crate::journey::Severity;

/// A complete journey scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct Scenario {
    /// Name of the journey
    pub name: String,
    /// Optional description of what the journey verifies
    pub description: Option<String>,
    /// The ordered steps to execute
    pub steps: Vec<StepSpec>,
}

/// A single scenario step
#[derive(Deserialize, Debug)]
pub struct StepSpec {
    /// Failure classification (default: hard)
    #[serde(default)]
    pub severity: Severity,

    /// Human-readable label used in log lines
    pub description: Option<String>,

    /// Category grouping; unset inherits the previous step's
    pub category: Option<String>,

    /// The browser action to perform
    #[serde(flatten)]
    pub action: ActionSpec,
}

/// The browser action performed by a scenario step
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionSpec {
    /// Load a URL
    Navigate { url: String },

    /// Assert on the current page title
    AssertTitle {
        #[serde(default)]
        equals: Option<String>,
        #[serde(default)]
        contains: Option<String>,
    },

    /// Assert on the current page URL
    AssertUrl {
        #[serde(default)]
        equals: Option<String>,
        #[serde(default)]
        contains: Option<String>,
    },

    /// Find an element; its handle is carried to the next step
    Find { selector: String },

    /// Click a fresh selector, or the carried element when none is given
    Click {
        #[serde(default)]
        selector: Option<String>,
    },

    /// Assert on the visible text of an element
    AssertText {
        selector: String,
        #[serde(default)]
        equals: Option<String>,
        #[serde(default)]
        contains: Option<String>,
    },

    /// Run a script in the page; its JSON result is carried forward
    Execute { script: String },
}

impl Scenario {
    /// Load a scenario from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| Error::ScenarioParse(e.to_string()))
    }
}
