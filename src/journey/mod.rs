//! Journey execution
//!
//! A journey is an ordered list of steps run against a browser driver.
//! The runner applies the one-time environment setup, executes every step
//! in order with timing and category numbering, and classifies failures by
//! each step's declared severity.

mod environment;
pub mod report;
pub mod runner;
pub mod step;

pub use report::{AttributeSink, LogAttributeSink, RecordingAttributeSink};
pub use runner::{JourneyReport, Runner, SoftFailure};
pub use step::{Severity, Step, StepValue};
