//! Error types for the journey runner
//!
//! Step actions fail with either an assertion error (an expectation about
//! the page was not met) or a driver error (the underlying automation call
//! failed). The runner does not distinguish the two; only the step's
//! declared severity decides what happens next.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the journey runner
#[derive(Error, Debug)]
pub enum Error {
    // === Driver Errors ===
    #[error("Could not start a WebDriver session at {url}: {reason}")]
    SessionStart { url: String, reason: String },

    #[error("Driver call failed: {0}")]
    Driver(String),

    #[error("Element handle {0} is no longer held by the driver")]
    StaleElement(u64),

    // === Step Errors ===
    #[error("Assertion failed: {0}")]
    Assertion(String),

    // === Journey Errors ===
    #[error(
        "Journey failed: There {} {count} soft step failure{}.",
        was_were(.count),
        plural_s(.count)
    )]
    JourneyFailed { count: usize },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid scenario file: {0}")]
    ScenarioParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn was_were(count: &usize) -> &'static str {
    if *count == 1 {
        "was"
    } else {
        "were"
    }
}

fn plural_s(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

impl Error {
    /// Create an assertion error with a descriptive message
    pub fn assertion<S: Into<String>>(message: S) -> Self {
        Self::Assertion(message.into())
    }

    /// Create a driver error from any displayable failure
    pub fn driver<E: std::fmt::Display>(error: E) -> Self {
        Self::Driver(error.to_string())
    }
}
