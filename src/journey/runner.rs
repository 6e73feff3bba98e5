//! Step execution loop
//!
//! Runs a journey: one-time environment setup, then every step in list
//! order with timing, category numbering and three-tier failure
//! classification. Steps execute strictly one at a time; a step may await
//! nested driver operations, but the runner only observes its final
//! settlement before moving on.

use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use tracing::{error, info, warn};

use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::driver::Driver;

use super::environment;
use super::report::{
    join_sequence, AttributeSink, LogAttributeSink, ATTR_HARD_FAILURE_DESCRIPTION,
    ATTR_HARD_FAILURE_STEP, ATTR_OPTIONAL_FAILURE_STEPS, ATTR_SOFT_FAILURE_STEPS,
};
use super::step::{Severity, Step, StepValue};

/// Sentinel category assigned when the first step does not declare one
const DEFAULT_CATEGORY: &str = "none";

const SEPARATOR: &str = "------------------------------";

/// Record of a failed SOFT step
#[derive(Debug, Clone)]
pub struct SoftFailure {
    /// 1-based step number in the journey
    pub sequence: usize,
    /// The step's log label
    pub label: String,
    /// The error message the action failed with
    pub reason: String,
}

/// What a completed journey leaves behind
///
/// Only produced when no HARD step failed and no SOFT failure escalated
/// the verdict; purely informational display state.
#[derive(Debug)]
pub struct JourneyReport {
    /// Number of steps executed
    pub steps: usize,
    /// Categories in first-seen order with their final step counts
    pub categories: IndexMap<String, usize>,
    /// Sequence numbers of failed OPTIONAL steps
    pub optional_failures: Vec<usize>,
}

/// Mutable state scoped to one journey execution
#[derive(Default)]
struct RunState {
    sequence: usize,
    categories: IndexMap<String, usize>,
    previous_category: Option<String>,
    carried: Option<StepValue>,
    soft_failures: Vec<SoftFailure>,
    optional_failures: Vec<usize>,
}

/// Resolved display header for one step
struct StepHeader {
    sequence: usize,
    category: String,
    category_step: usize,
    description: String,
}

impl StepHeader {
    fn label(&self, total: usize) -> String {
        format!(
            "Step {} of {}: [{}: {}]: {}",
            self.sequence, total, self.category, self.category_step, self.description
        )
    }
}

impl RunState {
    /// Advance to the next step: bump the sequence number, resolve the
    /// description and category, and update the category counter
    fn begin_step(&mut self, step: &Step) -> StepHeader {
        self.sequence += 1;

        let description = step
            .description
            .clone()
            .unwrap_or_else(|| format!("No description provided for step {}", self.sequence));

        // Inherit the previous step's resolved category when none is given;
        // the carry-forward updates unconditionally, even when inherited.
        let category = step
            .category
            .clone()
            .or_else(|| self.previous_category.clone())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        self.previous_category = Some(category.clone());

        let counter = self.categories.entry(category.clone()).or_insert(0);
        *counter += 1;
        let category_step = *counter;

        StepHeader {
            sequence: self.sequence,
            category,
            category_step,
            description,
        }
    }
}

/// Executes journeys against a driver
pub struct Runner {
    driver: Arc<dyn Driver>,
    config: Config,
    attributes: Option<Arc<dyn AttributeSink>>,
}

impl Runner {
    /// Create a runner; the attribute sink is wired up when enabled in
    /// the configuration
    pub fn new(driver: Arc<dyn Driver>, config: Config) -> Self {
        let attributes: Option<Arc<dyn AttributeSink>> = if config.attributes.enabled {
            Some(Arc::new(LogAttributeSink))
        } else {
            None
        };
        Self {
            driver,
            config,
            attributes,
        }
    }

    /// Replace the attribute sink, e.g. with a recording sink in tests
    pub fn with_attribute_sink(mut self, sink: Arc<dyn AttributeSink>) -> Self {
        self.attributes = Some(sink);
        self
    }

    /// Run the journey to completion
    ///
    /// Returns the first HARD step failure unchanged, or
    /// [`Error::JourneyFailed`] when at least one SOFT step failed.
    pub async fn run(&self, steps: Vec<Step>) -> Result<JourneyReport> {
        let epoch = Instant::now();
        let total = steps.len();

        environment::configure(self.driver.as_ref(), &self.config).await?;

        info!("===========[ JOURNEY START ]===========");
        let mut state = RunState::default();

        for step in &steps {
            let started = epoch.elapsed().as_millis() as u64;
            let header = state.begin_step(step);
            let label = header.label(total);

            info!("START  {label}  ->  started: {started}ms");

            match (step.action)(Arc::clone(&self.driver), state.carried.take()).await {
                Ok(value) => {
                    state.carried = value;
                }
                Err(err) => {
                    // carried is already cleared by the take() above; the
                    // failed action's result never reaches the next step
                    match step.severity {
                        Severity::Soft => {
                            error!(
                                "ERROR! {label}\n  \u{255a}\u{2550}\u{2550}> This is a SOFT step \
                                 error so processing of further steps will continue but the \
                                 journey will be failed."
                            );
                            error!("Error message:\n{err}");
                            if self.config.debug.soft {
                                log_debug_label(step);
                            }
                            state.soft_failures.push(SoftFailure {
                                sequence: header.sequence,
                                label: label.clone(),
                                reason: err.to_string(),
                            });
                        }
                        Severity::Optional => {
                            error!(
                                "ERROR! {label}\n  \u{255a}\u{2550}\u{2550}> This is an OPTIONAL \
                                 step so this error will not fail the journey."
                            );
                            error!("Error message:\n{err}");
                            if self.config.debug.optional {
                                log_debug_label(step);
                            }
                            state.optional_failures.push(header.sequence);
                        }
                        Severity::Hard => {
                            error!(
                                "ERROR! {label}\n  \u{255a}\u{2550}\u{2550}> This is a HARD step \
                                 error so processing of further steps will cease and the journey \
                                 will be failed."
                            );
                            error!("Error message:\n{err}");
                            if self.config.debug.hard {
                                log_debug_label(step);
                            }
                            self.record_hard_failure(&state, &header).await;
                            if !state.soft_failures.is_empty() {
                                error!(
                                    "There were also {} soft step failure{}:",
                                    state.soft_failures.len(),
                                    plural(state.soft_failures.len())
                                );
                                log_soft_failures(&state.soft_failures);
                            }
                            return Err(err);
                        }
                    }
                }
            }

            let ended = epoch.elapsed().as_millis() as u64;
            info!(
                "FINISH {label}  ->  ended: {ended}ms, elapsed: {}ms\n",
                ended - started
            );
        }

        info!("============[ JOURNEY END ]============");

        if !state.soft_failures.is_empty() {
            let count = state.soft_failures.len();
            error!("Journey failed: {count} soft failure{} detected:", plural(count));
            log_soft_failures(&state.soft_failures);
            let sequences: Vec<usize> =
                state.soft_failures.iter().map(|f| f.sequence).collect();
            self.record_attribute(ATTR_SOFT_FAILURE_STEPS, &join_sequence(&sequences))
                .await;
            return Err(Error::JourneyFailed { count });
        }

        Ok(JourneyReport {
            steps: state.sequence,
            categories: state.categories,
            optional_failures: state.optional_failures,
        })
    }

    /// Best-effort attribute recording of everything known at the point a
    /// HARD failure terminates the run
    async fn record_hard_failure(&self, state: &RunState, header: &StepHeader) {
        self.record_attribute(ATTR_HARD_FAILURE_STEP, &header.sequence.to_string())
            .await;
        self.record_attribute(ATTR_HARD_FAILURE_DESCRIPTION, &header.description)
            .await;
        if !state.soft_failures.is_empty() {
            let sequences: Vec<usize> =
                state.soft_failures.iter().map(|f| f.sequence).collect();
            self.record_attribute(ATTR_SOFT_FAILURE_STEPS, &join_sequence(&sequences))
                .await;
        }
        if !state.optional_failures.is_empty() {
            self.record_attribute(
                ATTR_OPTIONAL_FAILURE_STEPS,
                &join_sequence(&state.optional_failures),
            )
            .await;
        }
    }

    async fn record_attribute(&self, key: &str, value: &str) {
        if let Some(sink) = &self.attributes {
            if let Err(e) = sink.set_attribute(key, value).await {
                warn!("Could not record run attribute {key}: {e}");
            }
        }
    }
}

fn log_debug_label(step: &Step) {
    if let Some(label) = &step.debug_label {
        error!("Step logic: {label}");
    }
}

fn log_soft_failures(failures: &[SoftFailure]) {
    for failure in failures {
        error!("{SEPARATOR}");
        error!("{}", failure.label);
        error!("message: {}", failure.reason);
    }
    error!("{SEPARATOR}");
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(category: Option<&str>) -> Step {
        let mut step = Step::new(|_driver, _input| Box::pin(async { Ok(None) }));
        if let Some(category) = category {
            step = step.category(category);
        }
        step
    }

    #[test]
    fn test_category_inheritance_and_counters() {
        let steps = [
            step(Some("A")),
            step(Some("A")),
            step(None),
            step(Some("B")),
            step(None),
        ];

        let mut state = RunState::default();
        let headers: Vec<StepHeader> =
            steps.iter().map(|s| state.begin_step(s)).collect();

        let categories: Vec<&str> = headers.iter().map(|h| h.category.as_str()).collect();
        assert_eq!(categories, ["A", "A", "A", "B", "B"]);

        let counters: Vec<usize> = headers.iter().map(|h| h.category_step).collect();
        assert_eq!(counters, [1, 2, 3, 1, 2]);

        assert_eq!(state.categories.get("A"), Some(&3));
        assert_eq!(state.categories.get("B"), Some(&2));
    }

    #[test]
    fn test_first_step_without_category_gets_sentinel() {
        let mut state = RunState::default();
        let header = state.begin_step(&step(None));
        assert_eq!(header.category, "none");

        // The sentinel is inherited like any other resolved category.
        let header = state.begin_step(&step(None));
        assert_eq!(header.category, "none");
        assert_eq!(header.category_step, 2);
    }

    #[test]
    fn test_description_placeholder_uses_sequence_number() {
        let mut state = RunState::default();
        state.begin_step(&step(Some("A")));
        let header = state.begin_step(&step(None));
        assert_eq!(header.description, "No description provided for step 2");
    }

    #[test]
    fn test_label_format() {
        let mut state = RunState::default();
        let header = state.begin_step(&step(Some("Checkout")).description("open cart"));
        assert_eq!(
            header.label(4),
            "Step 1 of 4: [Checkout: 1]: open cart"
        );
    }

    #[test]
    fn test_sequence_is_strictly_increasing_from_one() {
        let mut state = RunState::default();
        for expected in 1..=5 {
            let header = state.begin_step(&step(Some("A")));
            assert_eq!(header.sequence, expected);
        }
    }
}
