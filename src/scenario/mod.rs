//! Declarative journey scenarios
//!
//! YAML scenario files describe a journey as a list of browser actions
//! with optional assertions, severities and categories; `compile` turns
//! them into runner steps.

pub mod compile;
pub mod config;

pub use compile::compile;
pub use config::{ActionSpec, Scenario, StepSpec};
