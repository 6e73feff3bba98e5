//! Synthetic journey runner - scripted-browser monitoring checks
//!
//! This library executes an ordered list of browser steps against a
//! WebDriver endpoint, classifying step failures as hard, soft or optional
//! and logging per-step timing.

pub mod cli;
pub mod commands;
pub mod common;
pub mod driver;
pub mod journey;
pub mod scenario;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use driver::{Driver, ElementHandle, Rect};
pub use journey::{
    AttributeSink, JourneyReport, RecordingAttributeSink, Runner, Severity, SoftFailure, Step,
    StepValue,
};
