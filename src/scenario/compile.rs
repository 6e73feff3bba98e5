//! Compiles scenario steps into runner steps
//!
//! Each scenario action becomes a step action closure over the driver;
//! severity, description and category carry over unchanged, and every
//! step gets a generated debug label describing its logic.

use crate::common::{Error, Result};
use crate::journey::{Step, StepValue};

use super::config::{ActionSpec, Scenario, StepSpec};

/// Build the runner steps for a scenario
pub fn compile(scenario: &Scenario) -> Vec<Step> {
    scenario.steps.iter().map(build_step).collect()
}

fn build_step(spec: &StepSpec) -> Step {
    let mut step = action_step(&spec.action).severity(spec.severity);
    if let Some(description) = &spec.description {
        step = step.description(description.clone());
    }
    if let Some(category) = &spec.category {
        step = step.category(category.clone());
    }
    step
}

fn action_step(action: &ActionSpec) -> Step {
    match action {
        ActionSpec::Navigate { url } => {
            let label = format!("navigate {url}");
            let url = url.clone();
            Step::new(move |driver, _input| {
                let url = url.clone();
                Box::pin(async move {
                    driver.navigate(&url).await?;
                    Ok(None)
                })
            })
            .debug_label(label)
        }

        ActionSpec::AssertTitle { equals, contains } => {
            let label = match_label("assert_title", equals, contains);
            let equals = equals.clone();
            let contains = contains.clone();
            Step::new(move |driver, _input| {
                let equals = equals.clone();
                let contains = contains.clone();
                Box::pin(async move {
                    let title = driver.title().await?;
                    check_match("page title", &title, equals.as_deref(), contains.as_deref())?;
                    Ok(None)
                })
            })
            .debug_label(label)
        }

        ActionSpec::AssertUrl { equals, contains } => {
            let label = match_label("assert_url", equals, contains);
            let equals = equals.clone();
            let contains = contains.clone();
            Step::new(move |driver, _input| {
                let equals = equals.clone();
                let contains = contains.clone();
                Box::pin(async move {
                    let url = driver.current_url().await?;
                    check_match("page URL", &url, equals.as_deref(), contains.as_deref())?;
                    Ok(None)
                })
            })
            .debug_label(label)
        }

        ActionSpec::Find { selector } => {
            let label = format!("find {selector}");
            let selector = selector.clone();
            Step::new(move |driver, _input| {
                let selector = selector.clone();
                Box::pin(async move {
                    let handle = driver.find(&selector).await?;
                    Ok(Some(StepValue::Element(handle)))
                })
            })
            .debug_label(label)
        }

        ActionSpec::Click { selector } => {
            let label = match selector {
                Some(css) => format!("click {css}"),
                None => "click the carried element".to_string(),
            };
            let selector = selector.clone();
            Step::new(move |driver, input| {
                let selector = selector.clone();
                Box::pin(async move {
                    let handle = match &selector {
                        Some(css) => driver.find(css).await?,
                        None => input
                            .as_ref()
                            .and_then(StepValue::as_element)
                            .ok_or_else(|| {
                                Error::assertion(
                                    "no carried element to click; give the step a selector \
                                     or precede it with a find",
                                )
                            })?,
                    };
                    driver.click(handle).await?;
                    Ok(None)
                })
            })
            .debug_label(label)
        }

        ActionSpec::AssertText {
            selector,
            equals,
            contains,
        } => {
            let label = match_label(&format!("assert_text {selector}"), equals, contains);
            let selector = selector.clone();
            let equals = equals.clone();
            let contains = contains.clone();
            Step::new(move |driver, _input| {
                let selector = selector.clone();
                let equals = equals.clone();
                let contains = contains.clone();
                Box::pin(async move {
                    let handle = driver.find(&selector).await?;
                    let text = driver.text(handle).await?;
                    check_match(
                        &format!("text of {selector}"),
                        &text,
                        equals.as_deref(),
                        contains.as_deref(),
                    )?;
                    Ok(None)
                })
            })
            .debug_label(label)
        }

        ActionSpec::Execute { script } => {
            let label = format!("execute {script}");
            let script = script.clone();
            Step::new(move |driver, _input| {
                let script = script.clone();
                Box::pin(async move {
                    let result = driver.execute(&script).await?;
                    Ok(Some(StepValue::Json(result)))
                })
            })
            .debug_label(label)
        }
    }
}

fn check_match(
    subject: &str,
    actual: &str,
    equals: Option<&str>,
    contains: Option<&str>,
) -> Result<()> {
    if let Some(expected) = equals {
        if actual != expected {
            return Err(Error::assertion(format!(
                "{subject} was {actual:?}, expected {expected:?}"
            )));
        }
    }
    if let Some(fragment) = contains {
        if !actual.contains(fragment) {
            return Err(Error::assertion(format!(
                "{subject} was {actual:?}, expected it to contain {fragment:?}"
            )));
        }
    }
    Ok(())
}

fn match_label(kind: &str, equals: &Option<String>, contains: &Option<String>) -> String {
    match (equals, contains) {
        (Some(expected), _) => format!("{kind} equals {expected:?}"),
        (None, Some(fragment)) => format!("{kind} contains {fragment:?}"),
        (None, None) => kind.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_match_equals() {
        assert!(check_match("title", "Example Domain", Some("Example Domain"), None).is_ok());
        let err = check_match("title", "Not Found", Some("Example Domain"), None).unwrap_err();
        assert!(err.to_string().contains("Example Domain"));
    }

    #[test]
    fn test_check_match_contains() {
        assert!(check_match("URL", "https://www.iana.org/help", None, Some("iana.org")).is_ok());
        assert!(check_match("URL", "https://example.com/", None, Some("iana.org")).is_err());
    }

    #[test]
    fn test_check_match_both_must_hold() {
        let err = check_match("title", "Example Domain", Some("Example Domain"), Some("IANA"))
            .unwrap_err();
        assert!(err.to_string().contains("contain"));
    }

    #[test]
    fn test_compile_preserves_step_count() {
        let scenario: Scenario = serde_yaml::from_str(
            r#"
            name: Smoke
            steps:
              - action: navigate
                url: https://www.example.com/
              - action: assert_title
                equals: Example Domain
              - action: find
                selector: p > a
            "#,
        )
        .unwrap();
        assert_eq!(compile(&scenario).len(), 3);
    }
}
